//! Tests for the walk-through controller and ticker.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use jiff::{Timestamp, civil::date};

use super::*;
use crate::{
    catalog::Catalog,
    clock::FixedClock,
    error::{Result, RoutineError},
    models::{SelectionCommitment, SessionRecord, StepChoice, StepDefinition, StepId},
    store::SessionStore,
};

/// In-memory store that can be told to fail appends.
#[derive(Default)]
struct RecordingStore {
    sessions: Mutex<Vec<SessionRecord>>,
    failing: AtomicBool,
}

impl RecordingStore {
    fn failing() -> Self {
        let store = Self::default();
        store.failing.store(true, Ordering::SeqCst);
        store
    }

    fn recorded(&self) -> Vec<SessionRecord> {
        self.sessions.lock().unwrap().clone()
    }
}

impl SessionStore for RecordingStore {
    fn load_sessions(&self, _owner_id: Option<&str>) -> Result<Vec<SessionRecord>> {
        Ok(self.recorded())
    }

    fn append_session(&self, record: &SessionRecord) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RoutineError::Configuration {
                message: "store offline".to_string(),
            });
        }
        self.sessions.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn load_selection_history(&self, _owner_id: Option<&str>) -> Result<Vec<SelectionCommitment>> {
        Ok(vec![])
    }

    fn append_selection_commitment(&self, _commitment: &SelectionCommitment) -> Result<()> {
        Ok(())
    }

    fn load_identity(&self) -> Result<Option<String>> {
        Ok(None)
    }

    fn save_identity(&self, _owner_id: &str) -> Result<()> {
        Ok(())
    }
}

fn step(id: StepId, is_optional: bool, timer: Option<u32>) -> StepDefinition {
    StepDefinition {
        id,
        title: format!("Step {id}"),
        description: String::new(),
        is_optional,
        actions: vec![],
        products: vec![],
        preferred_product: None,
        timer_duration_seconds: timer,
        notes: None,
    }
}

fn completed_at() -> Timestamp {
    "2024-03-10T18:00:00Z".parse().unwrap()
}

fn context(store: Arc<RecordingStore>) -> WalkthroughContext {
    let catalog = Catalog::new(vec![
        step(1, false, None),
        step(2, true, None),
        step(3, true, Some(60)),
        step(4, false, Some(3)),
    ])
    .unwrap();
    WalkthroughContext {
        catalog: Arc::new(catalog),
        store,
        clock: Arc::new(FixedClock(completed_at())),
    }
}

fn begin(store: &Arc<RecordingStore>, ids: &[StepId]) -> Walkthrough {
    let commitment = SelectionCommitment::new(None, date(2024, 3, 10), ids.iter().copied());
    Walkthrough::begin(context(Arc::clone(store)), &commitment).expect("Failed to begin")
}

#[test]
fn test_scenario_performed_then_skipped() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[1, 2]);

    assert_eq!(walkthrough.state(), WalkthroughState::Presenting(0));
    assert_eq!(
        walkthrough.resolve(true).unwrap(),
        Transition::Advanced { index: 1 }
    );
    assert_eq!(walkthrough.resolve(false).unwrap(), Transition::Completed);
    assert_eq!(walkthrough.state(), WalkthroughState::Completed);

    let recorded = store.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        recorded[0].choices,
        vec![
            StepChoice {
                step_id: 1,
                performed: true
            },
            StepChoice {
                step_id: 2,
                performed: false
            },
        ]
    );
    assert_eq!(recorded[0].completed_at, completed_at());
    assert!(walkthrough.pending_save().is_none());
}

#[test]
fn test_required_step_auto_marked_on_entry() {
    let store = Arc::new(RecordingStore::default());
    let walkthrough = begin(&store, &[1, 2]);
    assert_eq!(walkthrough.choices().get(&1), Some(&true));
    assert_eq!(walkthrough.choices().get(&2), None);
}

#[test]
fn test_required_auto_mark_can_be_overridden() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[1]);
    walkthrough.resolve(false).unwrap();
    assert!(!store.recorded()[0].performed(1));
}

#[test]
fn test_back_keeps_choices() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[1, 2]);

    assert!(!walkthrough.back());
    assert_eq!(walkthrough.state(), WalkthroughState::Presenting(0));

    walkthrough.resolve(true).unwrap();
    walkthrough.back();
    assert_eq!(walkthrough.state(), WalkthroughState::Presenting(0));
    assert_eq!(walkthrough.choices().get(&1), Some(&true));

    walkthrough.resolve(true).unwrap();
    walkthrough.resolve(true).unwrap();
    walkthrough.back();
    assert_eq!(walkthrough.state(), WalkthroughState::Completed);
}

#[test]
fn test_back_then_resolve_overwrites_choice() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[2, 3]);

    walkthrough.resolve(false).unwrap();
    walkthrough.back();
    walkthrough.resolve(true).unwrap();
    walkthrough.resolve(false).unwrap();

    let recorded = store.recorded();
    assert!(recorded[0].performed(2));
    assert!(!recorded[0].performed(3));
    assert_eq!(recorded[0].choices.len(), 2);
}

#[test]
fn test_timer_gates_resolve() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[2, 3]);
    walkthrough.resolve(true).unwrap();

    assert!(walkthrough.start_timer());
    let choices_before = walkthrough.choices().clone();
    for _ in 0..59 {
        assert_eq!(walkthrough.resolve(true).unwrap(), Transition::Blocked);
        walkthrough.tick_current();
    }
    assert_eq!(walkthrough.state(), WalkthroughState::Presenting(1));
    assert_eq!(walkthrough.choices(), &choices_before);
    assert!(!walkthrough.view().unwrap().can_advance);

    assert_eq!(walkthrough.tick_current(), Some(TimerState::Expired));
    assert!(walkthrough.view().unwrap().can_advance);
    assert_eq!(walkthrough.resolve(true).unwrap(), Transition::Completed);
    assert!(store.recorded()[0].performed(3));
}

#[test]
fn test_idle_timer_does_not_block() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[3]);
    assert_eq!(walkthrough.timer().map(StepTimer::state), Some(TimerState::Idle));
    assert_eq!(walkthrough.resolve(false).unwrap(), Transition::Completed);
}

#[test]
fn test_timer_resets_when_step_is_revisited() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[2, 3]);
    walkthrough.resolve(true).unwrap();

    walkthrough.start_timer();
    walkthrough.tick_current();
    let stale = Tick {
        generation: walkthrough.generation(),
    };

    assert!(walkthrough.back());
    walkthrough.resolve(true).unwrap();

    assert_eq!(walkthrough.timer().map(StepTimer::state), Some(TimerState::Idle));
    assert_eq!(walkthrough.tick(stale), None);
    assert_eq!(walkthrough.timer().map(StepTimer::state), Some(TimerState::Idle));
}

#[test]
fn test_restarted_timer_ignores_ticks_from_previous_run() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[4]);

    assert!(walkthrough.start_timer());
    let previous_run = Tick {
        generation: walkthrough.generation(),
    };
    for _ in 0..3 {
        walkthrough.tick(previous_run);
    }
    assert_eq!(walkthrough.timer().map(StepTimer::state), Some(TimerState::Expired));

    assert!(walkthrough.start_timer());
    assert_ne!(walkthrough.generation(), previous_run.generation);
    assert_eq!(walkthrough.tick(previous_run), None);
    assert_eq!(
        walkthrough.timer().map(StepTimer::state),
        Some(TimerState::Running(3))
    );
    assert_eq!(walkthrough.tick_current(), Some(TimerState::Running(2)));
}

#[tokio::test(start_paused = true)]
async fn test_ticker_respawns_on_timer_restart() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[4]);
    let (mut ticker, mut ticks) = StepTicker::new();

    walkthrough.start_timer();
    ticker.sync(&walkthrough);
    let first_run = walkthrough.generation();
    while walkthrough.timer_is_running() {
        let tick = ticks.recv().await.unwrap();
        walkthrough.tick(tick);
    }

    walkthrough.start_timer();
    ticker.sync(&walkthrough);
    assert!(ticker.is_active());
    let tick = ticks.recv().await.unwrap();
    assert_ne!(tick.generation, first_run);
    assert_eq!(walkthrough.tick(tick), Some(TimerState::Running(2)));
}

#[test]
fn test_abandon_discards_everything() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[1, 2]);
    walkthrough.resolve(true).unwrap();

    assert!(walkthrough.abandon());
    assert_eq!(walkthrough.state(), WalkthroughState::Abandoned);
    assert!(walkthrough.choices().is_empty());
    assert_eq!(walkthrough.resolve(true).unwrap(), Transition::Ignored);
    assert!(!walkthrough.abandon());
    assert!(store.recorded().is_empty());
    assert!(walkthrough.session().is_none());
}

#[test]
fn test_empty_selection_completes_immediately() {
    let store = Arc::new(RecordingStore::default());
    let walkthrough = begin(&store, &[]);

    assert_eq!(walkthrough.state(), WalkthroughState::Completed);
    assert!(walkthrough.view().is_none());
    let recorded = store.recorded();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].choices.is_empty());
}

#[test]
fn test_unknown_step_is_rejected() {
    let store = Arc::new(RecordingStore::default());
    let commitment = SelectionCommitment::new(None, date(2024, 3, 10), [1, 42]);
    let result = Walkthrough::begin(context(store), &commitment);
    assert!(matches!(result, Err(RoutineError::StepNotFound { id: 42 })));
}

#[test]
fn test_save_failure_keeps_session_for_retry() {
    let store = Arc::new(RecordingStore::failing());
    let mut walkthrough = begin(&store, &[2]);

    let err = walkthrough.resolve(true).unwrap_err();
    assert!(matches!(err, RoutineError::SessionNotSaved { .. }));
    assert_eq!(walkthrough.state(), WalkthroughState::Completed);
    let pending = walkthrough.pending_save().cloned().expect("Session should be pending");
    assert!(pending.performed(2));

    assert!(walkthrough.retry_save().is_err());

    store.failing.store(false, Ordering::SeqCst);
    walkthrough.retry_save().expect("Retry should succeed");
    assert!(walkthrough.pending_save().is_none());
    assert_eq!(store.recorded(), vec![pending]);

    walkthrough.retry_save().expect("Nothing left to save");
    assert_eq!(store.recorded().len(), 1);
}

#[test]
fn test_completed_session_is_not_modified() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[1, 2]);
    walkthrough.resolve(true).unwrap();
    walkthrough.resolve(true).unwrap();
    let saved = store.recorded();

    assert_eq!(walkthrough.resolve(false).unwrap(), Transition::Ignored);
    assert!(!walkthrough.back());
    assert!(!walkthrough.abandon());
    assert_eq!(store.recorded(), saved);
    assert_eq!(walkthrough.session(), saved.first());
}

#[test]
fn test_view_reports_position() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[4, 1, 2]);

    let view = walkthrough.view().unwrap();
    assert_eq!(view.step.id, 1);
    assert_eq!(view.position, Position { index: 0, total: 3 });
    assert!(view.is_first);
    assert!(!view.is_last);
    assert_eq!(view.choice, Some(true));
    assert_eq!(view.position.percent_complete(), 33);

    walkthrough.resolve(true).unwrap();
    walkthrough.resolve(false).unwrap();
    let view = walkthrough.view().unwrap();
    assert_eq!(view.step.id, 4);
    assert!(view.is_last);
    assert_eq!(view.position.percent_complete(), 100);
    assert!(view.timer.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_ticker_drives_timer_to_expiry() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[4]);
    let (mut ticker, mut ticks) = StepTicker::with_period(Duration::from_secs(1));

    ticker.sync(&walkthrough);
    assert!(!ticker.is_active());

    walkthrough.start_timer();
    ticker.sync(&walkthrough);
    assert!(ticker.is_active());

    while walkthrough.timer_is_running() {
        let tick = ticks.recv().await.expect("Ticker should be running");
        walkthrough.tick(tick);
        ticker.sync(&walkthrough);
    }

    assert_eq!(walkthrough.timer().map(StepTimer::state), Some(TimerState::Expired));
    assert!(!ticker.is_active());
    assert_eq!(walkthrough.resolve(true).unwrap(), Transition::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_ticker_stops_when_step_changes() {
    let store = Arc::new(RecordingStore::default());
    let mut walkthrough = begin(&store, &[2, 4]);
    let (mut ticker, mut ticks) = StepTicker::new();

    walkthrough.resolve(true).unwrap();
    walkthrough.start_timer();
    ticker.sync(&walkthrough);
    let first = ticks.recv().await.unwrap();
    assert_eq!(first.generation, walkthrough.generation());

    walkthrough.back();
    ticker.sync(&walkthrough);
    assert!(!ticker.is_active());
    assert_eq!(walkthrough.tick(first), None);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(ticks.try_recv().is_err());
}
