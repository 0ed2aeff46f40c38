use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::common::{DomainError, MissionError};
use crate::config::MissionConfig;
use crate::domains::logger::DynLogger;
use crate::domains::mission::{
    ActuatorDriver, ActuatorSchedule, AuxiliaryTask, ExtruderSynchronizer, FlightController,
    FlightSupervisor, MissionPlan,
};

/// Outcome of a successfully completed print mission.
#[derive(Debug, Clone)]
pub struct MissionReport {
    pub run_id: Uuid,
    pub waypoints: usize,
    pub completed_at: DateTime<Utc>,
}

pub type MissionResult = Result<MissionReport, MissionError>;

/// Drives one print mission end to end: mission upload, arm, takeoff, then
/// extruder synchronization and flight supervision until touchdown. The
/// runner is the only component that decides between continuing degraded
/// (actuator trouble) and aborting with a recovery landing (flight errors).
pub struct MissionRunner {
    controller: Arc<dyn FlightController>,
    actuator: Arc<dyn ActuatorDriver>,
    logger: DynLogger,
    config: MissionConfig,
}

impl MissionRunner {
    pub fn new(
        controller: Arc<dyn FlightController>,
        actuator: Arc<dyn ActuatorDriver>,
        logger: DynLogger,
        config: MissionConfig,
    ) -> Self {
        Self {
            controller,
            actuator,
            logger,
            config,
        }
    }

    /// Executes the mission described by `plan` and `schedule`. The vehicle
    /// must be disarmed and landed when this is called.
    pub async fn execute(&self, plan: MissionPlan, schedule: ActuatorSchedule) -> MissionResult {
        let run_id = Uuid::new_v4();
        self.logger.info(&format!(
            "Starting print mission {} with {} waypoints",
            run_id,
            plan.len()
        ));

        self.prepare(&plan)
            .await
            .map_err(MissionError::PreFlightAbort)?;

        // From here on the vehicle is armed; any failure must leave it
        // landed and disarmed again before we report it.
        match self.fly(&schedule).await {
            Ok(()) => {
                self.logger.info("Drone landed, mission completed");
                Ok(MissionReport {
                    run_id,
                    waypoints: plan.len(),
                    completed_at: Utc::now(),
                })
            }
            Err(source) => {
                let recovered = self.recover().await;
                Err(MissionError::InFlightAbort { source, recovered })
            }
        }
    }

    /// Pre-flight sequence. No vehicle motion has happened if this fails.
    async fn prepare(&self, plan: &MissionPlan) -> Result<(), DomainError> {
        self.logger.info("Clearing past missions");
        self.controller.clear_mission().await?;
        self.controller
            .set_return_to_launch_after_mission(self.config.flight.return_to_launch)
            .await?;
        self.logger.info("Uploading mission");
        self.controller.upload_mission(plan).await?;
        self.logger.info("Arming");
        self.controller.arm().await?;
        Ok(())
    }

    async fn fly(&self, schedule: &ActuatorSchedule) -> Result<(), DomainError> {
        self.logger.info("Taking Off");
        self.controller.takeoff().await?;

        // Subscribe before starting the mission so no early event is missed.
        let progress = self.controller.mission_progress().await?;
        let in_air = self.controller.in_air().await?;

        self.logger.info("Starting print mission");
        self.controller.start_mission().await?;

        let cancel = CancellationToken::new();
        let synchronizer = ExtruderSynchronizer::new(
            Arc::new(schedule.clone()),
            self.actuator.clone(),
            self.logger.clone(),
        );
        let handle = synchronizer.spawn(progress, cancel.clone());
        let extruder_task = AuxiliaryTask::new("extruder-sync", cancel.clone(), handle);

        let supervisor = FlightSupervisor::new(self.logger.clone());
        let supervision = supervisor.run(in_air, vec![extruder_task]);

        match self.config.mission_timeout() {
            Some(limit) => match tokio::time::timeout(limit, supervision).await {
                Ok(result) => result,
                Err(_) => {
                    // The supervision future is gone; stop the synchronizer
                    // through its token before reporting.
                    cancel.cancel();
                    Err(DomainError::Protocol(format!(
                        "mission did not complete within {:?}",
                        limit
                    )))
                }
            },
            None => supervision.await,
        }
    }

    /// Best-effort landing and disarm after an in-flight failure. Returns
    /// whether both succeeded; failures are logged either way.
    async fn recover(&self) -> bool {
        self.logger
            .warn("In-flight failure, attempting recovery landing");
        let landed = match self.controller.land().await {
            Ok(()) => true,
            Err(err) => {
                self.logger.error(&format!("Recovery landing failed: {}", err));
                false
            }
        };
        let disarmed = match self.controller.disarm().await {
            Ok(()) => true,
            Err(err) => {
                self.logger.error(&format!("Recovery disarm failed: {}", err));
                false
            }
        };
        landed && disarmed
    }
}
