pub mod buffered_logger;
pub mod file_logger;
pub mod noop_logger;
pub mod simulator;
pub mod tracing_logger;

pub use buffered_logger::init_buffered_logger;
pub use file_logger::FileLogger;
pub use noop_logger::init_noop_logger;
pub use simulator::{SimulatedExtruder, SimulatedFlightController};
pub use tracing_logger::init_tracing_logger;
