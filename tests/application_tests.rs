use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use skyprint::adapters::outbound::init_noop_logger;
use skyprint::common::{ActuatorError, DomainError, DomainResult};
use skyprint::domains::logger::DomainLogger;
use skyprint::domains::mission::{
    ActuatorDriver, ActuatorSchedule, AuxiliaryTask, ExtruderSynchronizer, FlightSupervisor,
    ProgressEvent,
};

struct RecordingActuator {
    commands: Mutex<Vec<bool>>,
    attempts: AtomicUsize,
    fail_next: AtomicBool,
}

impl RecordingActuator {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            commands: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
        })
    }

    fn commands(&self) -> Vec<bool> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActuatorDriver for RecordingActuator {
    async fn set_state(&self, active: bool) -> Result<(), ActuatorError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ActuatorError::CommandRejected {
                reason: "injected failure".to_string(),
            });
        }
        self.commands.lock().unwrap().push(active);
        Ok(())
    }
}

struct CaptureLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl DomainLogger for CaptureLogger {
    fn info(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("INFO:{}", msg));
    }
    fn warn(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("WARN:{}", msg));
    }
    fn error(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("ERR:{}", msg));
    }
}

fn capture_logger() -> (Arc<dyn DomainLogger>, Arc<Mutex<Vec<String>>>) {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let logger: Arc<dyn DomainLogger> = Arc::new(CaptureLogger {
        messages: messages.clone(),
    });
    (logger, messages)
}

#[tokio::test]
async fn test_no_redundant_extruder_commands() {
    let actuator = RecordingActuator::new();
    let schedule = Arc::new(ActuatorSchedule::new(vec![true, false]));
    let (tx, rx) = mpsc::channel(8);

    for current in [0usize, 0, 1, 1] {
        tx.send(ProgressEvent { current, total: 2 }).await.unwrap();
    }
    drop(tx);

    let sync = ExtruderSynchronizer::new(schedule, actuator.clone(), init_noop_logger());
    sync.spawn(rx, CancellationToken::new())
        .await
        .unwrap()
        .unwrap();

    // On at index 0, off at index 1; repeated indices command nothing.
    assert_eq!(actuator.commands(), vec![true, false]);
}

#[tokio::test]
async fn test_out_of_range_index_clamped_to_idle() {
    // Spec ambiguity: a progress tick past the schedule end is folded onto
    // the trailing idle entry instead of failing the run.
    let actuator = RecordingActuator::new();
    let (logger, messages) = capture_logger();
    let schedule = Arc::new(ActuatorSchedule::new(vec![true]));
    let (tx, rx) = mpsc::channel(8);

    tx.send(ProgressEvent { current: 7, total: 1 }).await.unwrap();
    drop(tx);

    let sync = ExtruderSynchronizer::new(schedule, actuator.clone(), logger);
    sync.spawn(rx, CancellationToken::new())
        .await
        .unwrap()
        .unwrap();

    // Idle matches the initial state, so no command was issued.
    assert!(actuator.commands().is_empty());
    let msgs = messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.starts_with("WARN:") && m.contains("clamping")));
}

#[tokio::test]
async fn test_actuator_failure_is_logged_and_retried_on_next_event() {
    let actuator = RecordingActuator::new();
    actuator.fail_next.store(true, Ordering::SeqCst);
    let (logger, messages) = capture_logger();
    let schedule = Arc::new(ActuatorSchedule::new(vec![true, true]));
    let (tx, rx) = mpsc::channel(8);

    tx.send(ProgressEvent { current: 0, total: 2 }).await.unwrap();
    tx.send(ProgressEvent { current: 1, total: 2 }).await.unwrap();
    drop(tx);

    let sync = ExtruderSynchronizer::new(schedule, actuator.clone(), logger);
    let result = sync
        .spawn(rx, CancellationToken::new())
        .await
        .unwrap();

    // The failed command never crashed the loop, and the tracked state was
    // not advanced, so the next event retried and succeeded.
    assert!(result.is_ok());
    assert_eq!(actuator.attempts.load(Ordering::SeqCst), 2);
    assert_eq!(actuator.commands(), vec![true]);
    let msgs = messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.starts_with("ERR:") && m.contains("flight continues")));
}

#[tokio::test]
async fn test_cancellation_between_events_is_prompt_and_idempotent() {
    let actuator = RecordingActuator::new();
    let schedule = Arc::new(ActuatorSchedule::new(vec![true]));
    let (_tx, rx) = mpsc::channel::<ProgressEvent>(8);

    let cancel = CancellationToken::new();
    let sync = ExtruderSynchronizer::new(schedule, actuator.clone(), init_noop_logger());
    let handle = sync.spawn(rx, cancel.clone());

    cancel.cancel();
    cancel.cancel(); // double-cancel is a no-op

    let result = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("synchronizer did not stop after cancellation")
        .unwrap();
    assert!(result.is_ok());
    assert!(actuator.commands().is_empty());
}

fn cooperative_task(token: &CancellationToken) -> AuxiliaryTask {
    let watched = token.clone();
    let handle = tokio::spawn(async move {
        watched.cancelled().await;
        DomainResult::Ok(())
    });
    AuxiliaryTask::new("cooperative", token.clone(), handle)
}

#[tokio::test]
async fn test_supervisor_cancels_only_on_landing_edge() {
    let (tx, rx) = mpsc::channel(8);
    let token = CancellationToken::new();
    let task = cooperative_task(&token);

    let (logger, _) = capture_logger();
    let supervision = tokio::spawn(async move {
        FlightSupervisor::new(logger).run(rx, vec![task]).await
    });

    // Initial ground reading must not cancel anything.
    tx.send(false).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!token.is_cancelled());

    tx.send(true).await.unwrap();
    tx.send(true).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!token.is_cancelled());

    // The falling edge after having been airborne is the landing signal.
    tx.send(false).await.unwrap();
    let result = tokio::time::timeout(Duration::from_secs(1), supervision)
        .await
        .expect("supervisor did not finish after landing")
        .unwrap();
    assert!(result.is_ok());
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn test_supervisor_propagates_auxiliary_failure() {
    let (tx, rx) = mpsc::channel(8);
    let token = CancellationToken::new();
    let watched = token.clone();
    let handle = tokio::spawn(async move {
        watched.cancelled().await;
        DomainResult::Err(DomainError::Protocol(
            "feed index out of range".to_string(),
        ))
    });
    let task = AuxiliaryTask::new("failing", token, handle);

    tx.send(true).await.unwrap();
    tx.send(false).await.unwrap();

    let result = FlightSupervisor::new(init_noop_logger())
        .run(rx, vec![task])
        .await;
    assert!(matches!(result, Err(DomainError::Protocol(_))));
}

#[tokio::test]
async fn test_supervisor_rejects_feed_closing_mid_flight() {
    let (tx, rx) = mpsc::channel(8);
    let token = CancellationToken::new();
    let task = cooperative_task(&token);

    tx.send(true).await.unwrap();
    drop(tx);

    let result = FlightSupervisor::new(init_noop_logger())
        .run(rx, vec![task])
        .await;
    assert!(matches!(result, Err(DomainError::Protocol(_))));
    // Auxiliary work was still shut down.
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn test_cancelling_a_completed_task_is_a_noop() {
    let token = CancellationToken::new();
    let handle = tokio::spawn(async move { DomainResult::Ok(()) });
    let task = AuxiliaryTask::new("done", token, handle);

    tokio::time::sleep(Duration::from_millis(10)).await;
    task.cancel();
    task.cancel();
    assert!(task.join().await.is_ok());
}
