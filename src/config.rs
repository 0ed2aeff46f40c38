use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionConfig {
    pub connection: ConnectionConfig,
    pub flight: FlightConfig,
    /// When set, mission logs also go to this file via the rolling appender.
    pub log_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub system_address: String,
    pub feed_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightConfig {
    pub return_to_launch: bool,
    /// Upper bound on the supervision phase. `None` leaves the run unbounded;
    /// callers may wrap `execute` in their own timeout instead.
    pub mission_timeout_secs: Option<u64>,
}

impl MissionConfig {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: MissionConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn mission_timeout(&self) -> Option<Duration> {
        self.flight.mission_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig {
                system_address: "udp://:14540".to_string(),
                feed_capacity: 64,
            },
            flight: FlightConfig {
                return_to_launch: true,
                mission_timeout_secs: None,
            },
            log_file: None,
        }
    }
}
