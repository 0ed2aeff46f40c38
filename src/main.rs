use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use skyprint::adapters::outbound::{
    init_tracing_logger, FileLogger, SimulatedExtruder, SimulatedFlightController,
};
use skyprint::application::MissionRunner;
use skyprint::domains::logger::DynLogger;
use skyprint::domains::mission::parse_print_path;
use skyprint::MissionConfig;

// 1 m square at 5 m altitude, extruding on every printed leg.
const SAMPLE_PRINTCODE: &str = "\
; sample square print path
0 0 5 2 0
1 0 5 2 1
1 1 5 2 1
0 1 5 2 1
0 0 5 2 1
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting skyprint");

    let config = match MissionConfig::from_file("skyprint.toml").await {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(_) => {
            info!("No skyprint.toml found, using default configuration");
            MissionConfig::default()
        }
    };
    info!("System address: {}", config.connection.system_address);

    let logger: DynLogger = match &config.log_file {
        Some(path) => {
            FileLogger::init(path)?;
            Arc::new(FileLogger)
        }
        None => init_tracing_logger(),
    };
    let controller = Arc::new(SimulatedFlightController::new(
        Duration::from_millis(50),
        config.connection.feed_capacity,
    ));
    let extruder = Arc::new(SimulatedExtruder::new(logger.clone()));

    let (plan, schedule) = parse_print_path(SAMPLE_PRINTCODE, &logger)?;
    info!("Parsed print path with {} waypoints", plan.len());

    let runner = MissionRunner::new(controller, extruder, logger, config);
    match runner.execute(plan, schedule).await {
        Ok(report) => info!(
            "Mission {} completed over {} waypoints",
            report.run_id, report.waypoints
        ),
        Err(err) => error!("Mission failed: {}", err),
    }

    Ok(())
}
