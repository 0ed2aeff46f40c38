pub mod logger;
pub mod mission;

pub use logger::*;
pub use mission::*;
