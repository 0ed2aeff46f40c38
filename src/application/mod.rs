pub mod mission_runner;

pub use mission_runner::*;
