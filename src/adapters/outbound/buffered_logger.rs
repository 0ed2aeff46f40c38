use crate::domains::logger::DomainLogger;
use std::sync::Arc;
use tokio::sync::mpsc;

enum Level {
    Info,
    Warn,
    Error,
}

struct LogMessage {
    level: Level,
    msg: String,
}

/// Non-blocking buffered logger. Messages are forwarded to the provided
/// `bridge` from a background task; `capacity` bounds the channel, and
/// messages are dropped rather than blocking the mission loops when full.
pub fn init_buffered_logger(
    bridge: Arc<dyn DomainLogger>,
    capacity: usize,
) -> Arc<dyn DomainLogger> {
    let (tx, mut rx) = mpsc::channel::<LogMessage>(capacity);

    let bridge_task = bridge.clone();
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg.level {
                Level::Info => bridge_task.info(&msg.msg),
                Level::Warn => bridge_task.warn(&msg.msg),
                Level::Error => bridge_task.error(&msg.msg),
            }
        }
    });

    struct BufferedLogger {
        sender: mpsc::Sender<LogMessage>,
    }

    impl BufferedLogger {
        fn push(&self, level: Level, msg: &str) {
            let _ = self.sender.try_send(LogMessage {
                level,
                msg: msg.to_string(),
            });
        }
    }

    impl DomainLogger for BufferedLogger {
        fn info(&self, msg: &str) {
            self.push(Level::Info, msg);
        }

        fn warn(&self, msg: &str) {
            self.push(Level::Warn, msg);
        }

        fn error(&self, msg: &str) {
            self.push(Level::Error, msg);
        }
    }

    Arc::new(BufferedLogger { sender: tx })
}
