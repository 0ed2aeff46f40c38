use crate::domains::logger::DomainLogger;
use std::sync::Arc;
use tracing::{error, info, warn};

struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) {
        info!("{}", msg);
    }
    fn warn(&self, msg: &str) {
        warn!("{}", msg);
    }
    fn error(&self, msg: &str) {
        error!("{}", msg);
    }
}

/// DomainLogger routed through the process-wide `tracing` subscriber, so
/// mission logs share the binary's formatting and filtering.
pub fn init_tracing_logger() -> Arc<dyn DomainLogger> {
    Arc::new(TracingBridge {})
}
