use serde::{Deserialize, Serialize};

/// One navigation instruction of a print path. Position in metres relative
/// to the launch point, speed in m/s. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub speed: f64,
}

/// Ordered waypoint sequence for one print mission. Execution order is the
/// vector order. A valid plan has at least one waypoint; the parser rejects
/// empty input before a plan is ever built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionPlan {
    pub waypoints: Vec<Waypoint>,
}

impl MissionPlan {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Desired extruder state per waypoint, plus one trailing entry for the
/// post-mission idle state. The trailing entry is always `false` so the
/// extruder is commanded off once the path ends, whatever the last leg asked
/// for. Invariant: `len() == plan.len() + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorSchedule {
    states: Vec<bool>,
}

impl ActuatorSchedule {
    /// Builds a schedule from the per-waypoint desired states, appending the
    /// forced-off trailing entry.
    pub fn new(per_waypoint: Vec<bool>) -> Self {
        let mut states = per_waypoint;
        states.push(false);
        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        // `new` always appends the trailing entry.
        false
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.states.get(index).copied()
    }

    /// State of the trailing (post-mission) entry.
    pub fn trailing(&self) -> bool {
        self.states[self.states.len() - 1]
    }

    pub fn states(&self) -> &[bool] {
        &self.states
    }
}

/// Mission progress as reported by the flight controller: the waypoint index
/// currently being executed (or most recently reached) out of `total`.
/// `current` is monotonically non-decreasing within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub current: usize,
    pub total: usize,
}
