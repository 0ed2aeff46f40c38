use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::common::{DomainError, DomainResult};
use crate::domains::logger::DynLogger;

/// Handle to a cancellable task supervised during flight. Cancellation goes
/// through the token, never `JoinHandle::abort`, so the task can release its
/// resources before exiting.
pub struct AuxiliaryTask {
    name: String,
    cancel: CancellationToken,
    handle: JoinHandle<DomainResult<()>>,
}

impl AuxiliaryTask {
    pub fn new(
        name: impl Into<String>,
        cancel: CancellationToken,
        handle: JoinHandle<DomainResult<()>>,
    ) -> Self {
        Self {
            name: name.into(),
            cancel,
            handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requests cancellation. Safe to call repeatedly or after the task has
    /// already completed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Awaits completion, swallowing the cancelled outcome but propagating
    /// any failure the task itself ended with.
    pub async fn join(self) -> DomainResult<()> {
        match self.handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => Ok(()),
            Err(join_err) => Err(DomainError::Protocol(format!(
                "task '{}' aborted abnormally: {}",
                self.name, join_err
            ))),
        }
    }
}

/// Watches the in-air feed for the landing edge and shuts auxiliary work
/// down once the vehicle is back on the ground. The supervisor is the sole
/// cancellation source; nothing cancels it.
pub struct FlightSupervisor {
    logger: DynLogger,
}

impl FlightSupervisor {
    pub fn new(logger: DynLogger) -> Self {
        Self { logger }
    }

    /// Runs until the vehicle has been airborne at least once and then
    /// touches down again. On that landing edge every auxiliary task is
    /// cancelled and joined before this returns; earlier `false` readings on
    /// the ground are not a landing. A feed that closes before the landing
    /// edge is a protocol violation in any state.
    pub async fn run(
        &self,
        mut in_air: mpsc::Receiver<bool>,
        tasks: Vec<AuxiliaryTask>,
    ) -> DomainResult<()> {
        let mut was_in_air = false;

        loop {
            match in_air.recv().await {
                Some(true) => {
                    if !was_in_air {
                        self.logger.info("Vehicle airborne");
                    }
                    was_in_air = true;
                }
                Some(false) if was_in_air => {
                    self.logger.info("Vehicle landed, stopping auxiliary tasks");
                    return self.shutdown(tasks).await;
                }
                // Still on the ground waiting for liftoff.
                Some(false) => {}
                None => {
                    let _ = self.shutdown(tasks).await;
                    return Err(DomainError::Protocol(
                        "in-air feed closed before landing was observed".to_string(),
                    ));
                }
            }
        }
    }

    async fn shutdown(&self, tasks: Vec<AuxiliaryTask>) -> DomainResult<()> {
        let mut outcome = Ok(());
        for task in tasks {
            let name = task.name().to_string();
            task.cancel();
            if let Err(err) = task.join().await {
                self.logger
                    .error(&format!("Auxiliary task '{}' failed: {}", name, err));
                // First failure wins; later ones are still logged above.
                if outcome.is_ok() {
                    outcome = Err(err);
                }
            }
        }
        outcome
    }
}
