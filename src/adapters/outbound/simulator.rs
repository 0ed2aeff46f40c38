use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use crate::common::{ActuatorError, DomainError, DomainResult};
use crate::domains::logger::DynLogger;
use crate::domains::mission::{ActuatorDriver, FlightController, MissionPlan, ProgressEvent};

/// In-process flight controller simulator. Once a mission is started it
/// replays the uploaded plan as a scripted progress feed, bracketed by an
/// in-air feed that reports airborne until the simulated return-to-launch
/// completes. One post-mission progress tick (`current == total`) is emitted
/// before touchdown, matching what real autopilots do.
pub struct SimulatedFlightController {
    step: Duration,
    feed_capacity: usize,
    state: Mutex<SimState>,
}

#[derive(Default)]
struct SimState {
    plan: Option<MissionPlan>,
    armed: bool,
    rtl_after_mission: bool,
    progress_tx: Option<mpsc::Sender<ProgressEvent>>,
    in_air_tx: Option<mpsc::Sender<bool>>,
}

impl SimulatedFlightController {
    /// `step` is the simulated time per waypoint leg.
    pub fn new(step: Duration, feed_capacity: usize) -> Self {
        Self {
            step,
            feed_capacity,
            state: Mutex::new(SimState::default()),
        }
    }
}

#[async_trait]
impl FlightController for SimulatedFlightController {
    async fn clear_mission(&self) -> DomainResult<()> {
        self.state.lock().await.plan = None;
        Ok(())
    }

    async fn set_return_to_launch_after_mission(&self, enabled: bool) -> DomainResult<()> {
        self.state.lock().await.rtl_after_mission = enabled;
        Ok(())
    }

    async fn upload_mission(&self, plan: &MissionPlan) -> DomainResult<()> {
        if plan.is_empty() {
            return Err(DomainError::FlightController(
                "refusing to upload an empty mission".to_string(),
            ));
        }
        self.state.lock().await.plan = Some(plan.clone());
        Ok(())
    }

    async fn arm(&self) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        if state.armed {
            return Err(DomainError::FlightController(
                "vehicle is already armed".to_string(),
            ));
        }
        state.armed = true;
        Ok(())
    }

    async fn takeoff(&self) -> DomainResult<()> {
        let state = self.state.lock().await;
        if !state.armed {
            return Err(DomainError::FlightController(
                "takeoff requires an armed vehicle".to_string(),
            ));
        }
        Ok(())
    }

    async fn start_mission(&self) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        if !state.armed {
            return Err(DomainError::FlightController(
                "cannot start mission while disarmed".to_string(),
            ));
        }
        let plan = state
            .plan
            .clone()
            .ok_or_else(|| DomainError::FlightController("no mission uploaded".to_string()))?;
        let progress_tx = state.progress_tx.take().ok_or_else(|| {
            DomainError::FlightController("no mission-progress subscriber".to_string())
        })?;
        let in_air_tx = state
            .in_air_tx
            .take()
            .ok_or_else(|| DomainError::FlightController("no in-air subscriber".to_string()))?;

        let step = self.step;
        tokio::spawn(async move {
            let total = plan.len();
            let _ = in_air_tx.send(true).await;
            for current in 0..total {
                tokio::time::sleep(step).await;
                if progress_tx.send(ProgressEvent { current, total }).await.is_err() {
                    break;
                }
            }
            // Post-mission tick while returning to launch.
            let _ = progress_tx.send(ProgressEvent { current: total, total }).await;
            tokio::time::sleep(step).await;
            let _ = in_air_tx.send(false).await;
        });
        Ok(())
    }

    async fn land(&self) -> DomainResult<()> {
        Ok(())
    }

    async fn disarm(&self) -> DomainResult<()> {
        self.state.lock().await.armed = false;
        Ok(())
    }

    async fn mission_progress(&self) -> DomainResult<mpsc::Receiver<ProgressEvent>> {
        let (tx, rx) = mpsc::channel(self.feed_capacity);
        self.state.lock().await.progress_tx = Some(tx);
        Ok(rx)
    }

    async fn in_air(&self) -> DomainResult<mpsc::Receiver<bool>> {
        let (tx, rx) = mpsc::channel(self.feed_capacity);
        self.state.lock().await.in_air_tx = Some(tx);
        Ok(rx)
    }
}

/// Extruder stand-in that records every command it accepts. Commands can be
/// made to fail for exercising the degraded-continue policy.
pub struct SimulatedExtruder {
    logger: DynLogger,
    commands: Mutex<Vec<bool>>,
    failing: AtomicBool,
}

impl SimulatedExtruder {
    pub fn new(logger: DynLogger) -> Self {
        Self {
            logger,
            commands: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// While `true`, every command is rejected.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Commands accepted so far, in order.
    pub async fn commands(&self) -> Vec<bool> {
        self.commands.lock().await.clone()
    }
}

#[async_trait]
impl ActuatorDriver for SimulatedExtruder {
    async fn set_state(&self, active: bool) -> Result<(), ActuatorError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ActuatorError::CommandRejected {
                reason: "simulated rejection".to_string(),
            });
        }
        self.commands.lock().await.push(active);
        self.logger
            .info(&format!("Extruder is {}", if active { "on" } else { "off" }));
        Ok(())
    }
}
