pub mod parser;
pub mod plan;
pub mod ports;
pub mod supervisor;
pub mod synchronizer;

pub use parser::*;
pub use plan::*;
pub use ports::*;
pub use supervisor::*;
pub use synchronizer::*;
