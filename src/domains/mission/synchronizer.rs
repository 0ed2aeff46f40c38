use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::plan::{ActuatorSchedule, ProgressEvent};
use super::ports::ActuatorDriver;
use crate::common::DomainResult;
use crate::domains::logger::DynLogger;

/// Keeps the extruder in lockstep with mission progress: for every progress
/// event, looks up the scheduled state for the reported waypoint index and
/// commands the actuator only when the desired state differs from the last
/// successfully commanded one.
pub struct ExtruderSynchronizer {
    schedule: Arc<ActuatorSchedule>,
    actuator: Arc<dyn ActuatorDriver>,
    logger: DynLogger,
}

impl ExtruderSynchronizer {
    pub fn new(
        schedule: Arc<ActuatorSchedule>,
        actuator: Arc<dyn ActuatorDriver>,
        logger: DynLogger,
    ) -> Self {
        Self {
            schedule,
            actuator,
            logger,
        }
    }

    /// Spawns the synchronizer task. The task ends when the progress feed
    /// closes or `cancel` fires. Cancellation is only observed at the
    /// feed-await point, so a pending actuator command always resolves
    /// before the task exits.
    pub fn spawn(
        self,
        mut progress: mpsc::Receiver<ProgressEvent>,
        cancel: CancellationToken,
    ) -> JoinHandle<DomainResult<()>> {
        tokio::spawn(async move { self.run(&mut progress, cancel).await })
    }

    async fn run(
        &self,
        progress: &mut mpsc::Receiver<ProgressEvent>,
        cancel: CancellationToken,
    ) -> DomainResult<()> {
        let mut extruding = false;

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                event = progress.recv() => match event {
                    Some(event) => event,
                    None => return Ok(()),
                },
            };

            self.logger.info(&format!(
                "Executing instruction {}/{}",
                event.current, event.total
            ));

            let desired = match self.schedule.get(event.current) {
                Some(state) => state,
                None => {
                    // Controllers may report a tick past the final waypoint;
                    // fold it onto the trailing idle entry.
                    self.logger.warn(&format!(
                        "Progress index {} past schedule end ({} entries), clamping to idle state",
                        event.current,
                        self.schedule.len()
                    ));
                    self.schedule.trailing()
                }
            };

            if desired != extruding {
                match self.actuator.set_state(desired).await {
                    Ok(()) => extruding = desired,
                    // The tracked state stays unchanged, so the next differing
                    // event retries the command. The vehicle keeps flying.
                    Err(err) => self
                        .logger
                        .error(&format!("Extruder command failed, flight continues: {}", err)),
                }
            }
        }
    }
}
