pub mod printcode;

pub use printcode::*;
