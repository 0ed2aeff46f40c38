use super::plan::{MissionPlan, ProgressEvent};
use crate::common::{ActuatorError, DomainResult};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Port to the vehicle's flight controller. Implementations (adapters) wrap a
/// real autopilot connection or an in-process simulator. The core assumes a
/// single runner drives one connection at a time.
#[async_trait]
pub trait FlightController: Send + Sync {
    async fn clear_mission(&self) -> DomainResult<()>;
    async fn set_return_to_launch_after_mission(&self, enabled: bool) -> DomainResult<()>;
    async fn upload_mission(&self, plan: &MissionPlan) -> DomainResult<()>;
    async fn arm(&self) -> DomainResult<()>;
    async fn takeoff(&self) -> DomainResult<()>;
    async fn start_mission(&self) -> DomainResult<()>;
    async fn land(&self) -> DomainResult<()>;
    async fn disarm(&self) -> DomainResult<()>;

    /// Subscribes to mission progress. Events arrive in the order the
    /// controller emits them; no ordering holds across feeds.
    async fn mission_progress(&self) -> DomainResult<mpsc::Receiver<ProgressEvent>>;

    /// Subscribes to the in-air telemetry feed (`true` while airborne).
    async fn in_air(&self) -> DomainResult<mpsc::Receiver<bool>>;
}

/// Port to the material-extrusion actuator. Exclusively owned by the
/// extruder synchronizer for the lifetime of one mission run.
#[async_trait]
pub trait ActuatorDriver: Send + Sync {
    async fn set_state(&self, active: bool) -> Result<(), ActuatorError>;
}

/// Port for obtaining print-path text ("printcode") to run.
pub trait PrintPathSource: Send + Sync {
    fn load(&self) -> DomainResult<String>;
}
