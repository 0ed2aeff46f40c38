use chrono::Utc;
use log::{error as log_error, info as log_info, warn as log_warn};

use crate::domains::logger::DomainLogger;

/// File-backed adapter using `fast_log` for file writing and rotation.
pub struct FileLogger;

impl FileLogger {
    /// Initialize the fast_log file logger. `path` is the file used by
    /// fast_log's rolling file appender. Call once per process.
    pub fn init(path: &str) -> Result<(), Box<dyn std::error::Error>> {
        fast_log::init(
            fast_log::config::Config::new()
                .console()
                .file(path)
                .level(log::LevelFilter::Info),
        )?;
        Ok(())
    }
}

impl DomainLogger for FileLogger {
    fn info(&self, msg: &str) {
        log_info!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log_warn!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log_error!("{} - {}", Utc::now().to_rfc3339(), msg);
    }
}
