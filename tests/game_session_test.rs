//! Tests for the game session state machine.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mazebound::{
    Direction, EventEnvelope, EventSink, GameEvent, GamePhase, GameSession, InputEvent,
    LevelSource, Position, SinkError, SourceError, StageLoader, StageSpec, TelemetryEmitter,
};

const CORRIDOR: &str = "###\n#S#\n#.#\n#E#\n###";

fn corridor_spec(stage_number: u32) -> StageSpec {
    StageSpec {
        stage_number,
        layout: CORRIDOR.to_string(),
        width: 3,
        height: 5,
        start_x: 1,
        start_y: 1,
        end_x: 1,
        end_y: 3,
    }
}

/// Level source backed by a fixed stage map; individual stages can be
/// toggled to fail, and source calls are counted.
#[derive(Clone)]
struct ScriptedSource {
    specs: Arc<HashMap<u32, StageSpec>>,
    failing: Arc<Mutex<HashSet<u32>>>,
    calls: Arc<AtomicU32>,
}

impl ScriptedSource {
    fn with_stages(total: u32) -> Self {
        let specs = (1..=total).map(|n| (n, corridor_spec(n))).collect();
        Self {
            specs: Arc::new(specs),
            failing: Arc::new(Mutex::new(HashSet::new())),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    fn set_failing(&self, stage: u32, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(stage);
        } else {
            set.remove(&stage);
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LevelSource for ScriptedSource {
    async fn fetch(&self, stage_number: u32) -> Result<StageSpec, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(&stage_number) {
            return Err(SourceError::new("scripted failure"));
        }
        self.specs
            .get(&stage_number)
            .cloned()
            .ok_or_else(|| SourceError::new(format!("stage {stage_number} missing")))
    }
}

/// Sink that records every published envelope.
#[derive(Clone, Default)]
struct RecordingSink {
    events: Arc<Mutex<Vec<EventEnvelope>>>,
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn publish(&self, event: &EventEnvelope) -> Result<(), SinkError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

async fn wait_for_events(sink: &RecordingSink, count: usize) -> Vec<EventEnvelope> {
    for _ in 0..100 {
        {
            let events = sink.events.lock().unwrap();
            if events.len() >= count {
                return events.clone();
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {count} telemetry events");
}

async fn start_session(source: ScriptedSource, total: u32) -> (GameSession, RecordingSink) {
    let sink = RecordingSink::default();
    let (telemetry, _worker) = TelemetryEmitter::spawn("tester".to_string(), Arc::new(sink.clone()));
    let loader = StageLoader::new(Box::new(source), total);
    let session = GameSession::start(loader, telemetry)
        .await
        .expect("Initial load failed");
    (session, sink)
}

async fn complete_corridor_stage(session: &mut GameSession) {
    session.handle(InputEvent::Direction(Direction::Down)).await;
    session.handle(InputEvent::Direction(Direction::Down)).await;
}

#[tokio::test]
async fn full_playthrough_drives_the_state_machine() {
    let source = ScriptedSource::with_stages(2);
    let (mut session, sink) = start_session(source, 2).await;
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.current_stage(), 1);

    // Stage 1: two moves down reach the goal.
    complete_corridor_stage(&mut session).await;
    assert_eq!(session.phase(), GamePhase::StageComplete);
    assert_eq!(session.stage().moves(), 2);

    // Movement keys are no-ops between stages.
    session.handle(InputEvent::Direction(Direction::Up)).await;
    assert_eq!(session.phase(), GamePhase::StageComplete);
    assert_eq!(session.stage().moves(), 2);

    // Continue loads a fresh stage 2.
    session.handle(InputEvent::PrimaryActivate).await;
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.current_stage(), 2);
    assert_eq!(session.stage().moves(), 0);
    assert_eq!(session.stage().player(), Position::new(1, 1));

    // Stage 2 completion ends the game.
    complete_corridor_stage(&mut session).await;
    assert_eq!(session.phase(), GamePhase::GameComplete);
    assert_eq!(session.current_stage(), session.total_stages());
    assert_eq!(session.total_moves(), 4);

    // game_start, level_complete x2, then game_complete — in that order.
    let events = wait_for_events(&sink, 4).await;
    assert!(matches!(events[0].event, GameEvent::GameStart));
    assert!(matches!(
        events[1].event,
        GameEvent::LevelComplete { stage_number: 1, moves_count: 2, .. }
    ));
    assert!(matches!(
        events[2].event,
        GameEvent::LevelComplete { stage_number: 2, moves_count: 2, .. }
    ));
    assert!(matches!(
        events[3].event,
        GameEvent::GameComplete { total_moves: 4, .. }
    ));
}

#[tokio::test]
async fn restart_resets_counters_and_re_emits_game_start() {
    let source = ScriptedSource::with_stages(1);
    let (mut session, sink) = start_session(source, 1).await;

    complete_corridor_stage(&mut session).await;
    assert_eq!(session.phase(), GamePhase::GameComplete);
    assert_eq!(session.total_moves(), 2);

    session.handle(InputEvent::PrimaryActivate).await;
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.current_stage(), 1);
    assert_eq!(session.total_moves(), 0);
    assert_eq!(session.stage().moves(), 0);

    // game_start, level_complete, game_complete, game_start again.
    let events = wait_for_events(&sink, 4).await;
    let starts = events
        .iter()
        .filter(|e| matches!(e.event, GameEvent::GameStart))
        .count();
    assert_eq!(starts, 2);
}

#[tokio::test]
async fn continue_during_play_is_ignored() {
    let source = ScriptedSource::with_stages(2);
    let (mut session, _sink) = start_session(source.clone(), 2).await;
    assert_eq!(source.calls(), 1);

    session.handle(InputEvent::PrimaryActivate).await;
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.current_stage(), 1);
    // No extra load was issued.
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn rejected_moves_never_increment_counters() {
    let source = ScriptedSource::with_stages(1);
    let (mut session, _sink) = start_session(source, 1).await;

    // Wall to the left of the start cell.
    session.handle(InputEvent::Direction(Direction::Left)).await;
    assert_eq!(session.stage().moves(), 0);
    assert_eq!(session.total_moves(), 0);
    assert_eq!(session.phase(), GamePhase::Playing);
}

#[tokio::test]
async fn failed_load_enters_load_failed_and_retry_recovers() {
    let source = ScriptedSource::with_stages(2);
    source.set_failing(2, true);
    let (mut session, _sink) = start_session(source.clone(), 2).await;

    complete_corridor_stage(&mut session).await;
    session.handle(InputEvent::PrimaryActivate).await;
    assert_eq!(session.phase(), GamePhase::LoadFailed { stage: 2 });

    // Movement is dead while the load is failed.
    session.handle(InputEvent::Direction(Direction::Down)).await;
    assert_eq!(session.phase(), GamePhase::LoadFailed { stage: 2 });

    // Retry against a still-broken source stays in LoadFailed.
    session.handle(InputEvent::PrimaryActivate).await;
    assert_eq!(session.phase(), GamePhase::LoadFailed { stage: 2 });

    // Retry succeeds once the source recovers.
    source.set_failing(2, false);
    session.handle(InputEvent::PrimaryActivate).await;
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.current_stage(), 2);
    assert_eq!(session.stage().moves(), 0);
}

#[tokio::test]
async fn initial_load_failure_is_a_startup_error() {
    let source = ScriptedSource::with_stages(1);
    source.set_failing(1, true);

    let sink = RecordingSink::default();
    let (telemetry, _worker) = TelemetryEmitter::spawn("tester".to_string(), Arc::new(sink));
    let loader = StageLoader::new(Box::new(source), 1);

    let result = GameSession::start(loader, telemetry).await;
    assert!(result.is_err(), "Initial load failure must abort startup");
}
