//! Walk-through state machine.

use std::{collections::BTreeMap, sync::Arc};

use log::{debug, info, warn};

use super::{
    ticker::Tick,
    timer::{StepTimer, TimerState},
};
use crate::{
    catalog::Catalog,
    clock::Clock,
    error::{Result, RoutineError},
    models::{SelectionCommitment, SessionRecord, StepDefinition, StepId},
    store::SessionStore,
};

/// Collaborators shared by every walk-through.
#[derive(Clone)]
pub struct WalkthroughContext {
    /// Step definitions to present
    pub catalog: Arc<Catalog>,

    /// Destination of the finished session
    pub store: Arc<dyn SessionStore>,

    /// Source of the completion timestamp
    pub clock: Arc<dyn Clock>,
}

/// Where the walk-through currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkthroughState {
    /// Showing the step at this index of the ordered list
    Presenting(usize),

    /// Reached the end; a session record was synthesized
    Completed,

    /// Left before the end; nothing was recorded
    Abandoned,
}

/// Result of a `resolve` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved on to the step at `index`
    Advanced { index: usize },

    /// The current step's timer is running; nothing changed
    Blocked,

    /// The last step was resolved and the session was saved
    Completed,

    /// The walk-through is no longer presenting a step
    Ignored,
}

/// Position of the presented step within the walk-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Zero-based index
    pub index: usize,

    /// Number of steps in the walk-through
    pub total: usize,
}

impl Position {
    /// One-based step number.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Rounded share of the walk-through reached with this step.
    pub fn percent_complete(&self) -> u32 {
        crate::history::percentage(self.number(), self.total)
    }
}

/// Everything the view layer needs to render the presented step.
#[derive(Debug, Clone, Copy)]
pub struct StepView<'a> {
    pub step: &'a StepDefinition,
    pub position: Position,
    pub is_first: bool,
    pub is_last: bool,
    /// False while the step's timer is running
    pub can_advance: bool,
    /// Choice recorded so far for this step, if any
    pub choice: Option<bool>,
    pub timer: Option<&'a StepTimer>,
}

/// Drives one traversal of a committed step sequence.
pub struct Walkthrough {
    context: WalkthroughContext,
    owner_id: Option<String>,
    ordered_step_ids: Vec<StepId>,
    choices: BTreeMap<StepId, bool>,
    state: WalkthroughState,
    timer: Option<StepTimer>,
    generation: u64,
    session: Option<SessionRecord>,
    saved: bool,
}

impl Walkthrough {
    /// Starts a walk-through over a committed selection.
    ///
    /// An empty selection completes immediately with an empty session. If
    /// saving that session fails the failure is logged and the record stays
    /// available through [`Walkthrough::pending_save`].
    ///
    /// # Errors
    ///
    /// Returns `RoutineError::StepNotFound` when the selection names a step
    /// missing from the catalog.
    pub fn begin(context: WalkthroughContext, commitment: &SelectionCommitment) -> Result<Self> {
        let mut ordered_step_ids = commitment.selected_step_ids.clone();
        ordered_step_ids.sort_unstable();
        ordered_step_ids.dedup();

        if let Some(&id) = ordered_step_ids
            .iter()
            .find(|&&id| !context.catalog.contains(id))
        {
            return Err(RoutineError::StepNotFound { id });
        }

        let mut walkthrough = Self {
            context,
            owner_id: commitment.owner_id.clone(),
            ordered_step_ids,
            choices: BTreeMap::new(),
            state: WalkthroughState::Completed,
            timer: None,
            generation: 0,
            session: None,
            saved: false,
        };

        if walkthrough.ordered_step_ids.is_empty() {
            info!("Empty selection; completing walk-through immediately");
            if let Err(e) = walkthrough.complete() {
                warn!("{e}");
            }
        } else {
            walkthrough.enter(0);
        }

        Ok(walkthrough)
    }

    /// Presents the step at `index`, resetting its timer and auto-marking
    /// required steps as performed.
    fn enter(&mut self, index: usize) {
        let id = self.ordered_step_ids[index];
        self.state = WalkthroughState::Presenting(index);
        self.generation += 1;

        let step = self.context.catalog.get(id);
        self.timer = step
            .and_then(|step| step.timer_duration_seconds)
            .map(StepTimer::new);

        if step.is_some_and(StepDefinition::is_required) {
            self.choices.insert(id, true);
        }
        debug!("Presenting step {id} ({}/{})", index + 1, self.ordered_step_ids.len());
    }

    /// Records the choice for the presented step and moves forward.
    ///
    /// While the step's timer is running nothing changes and
    /// [`Transition::Blocked`] is returned.
    ///
    /// # Errors
    ///
    /// Returns `RoutineError::SessionNotSaved` when the final step was
    /// resolved but the session could not be appended to the store. The
    /// walk-through is completed regardless; see [`Walkthrough::retry_save`].
    pub fn resolve(&mut self, performed: bool) -> Result<Transition> {
        let WalkthroughState::Presenting(index) = self.state else {
            return Ok(Transition::Ignored);
        };

        if self.timer.as_ref().is_some_and(StepTimer::is_running) {
            debug!("Resolve blocked while the timer is running");
            return Ok(Transition::Blocked);
        }

        let id = self.ordered_step_ids[index];
        self.choices.insert(id, performed);

        if index + 1 < self.ordered_step_ids.len() {
            self.enter(index + 1);
            Ok(Transition::Advanced { index: index + 1 })
        } else {
            self.complete()?;
            Ok(Transition::Completed)
        }
    }

    /// Returns to the previous step, keeping every recorded choice.
    ///
    /// Returns false on the first step or when not presenting.
    pub fn back(&mut self) -> bool {
        match self.state {
            WalkthroughState::Presenting(index) if index > 0 => {
                self.enter(index - 1);
                true
            }
            _ => false,
        }
    }

    /// Leaves the walk-through without recording anything.
    pub fn abandon(&mut self) -> bool {
        if !self.is_presenting() {
            return false;
        }
        info!("Walk-through abandoned");
        self.state = WalkthroughState::Abandoned;
        self.choices.clear();
        self.timer = None;
        self.generation += 1;
        true
    }

    /// Starts the presented step's timer. Returns false when the step has no
    /// timer or it is already running.
    ///
    /// Every start, including a restart after expiry, opens a new tick
    /// generation.
    pub fn start_timer(&mut self) -> bool {
        if !self.is_presenting() || !self.timer.as_mut().is_some_and(StepTimer::start) {
            return false;
        }
        self.generation += 1;
        true
    }

    /// Applies a tick produced for generation `tick.generation`.
    ///
    /// Ticks from an earlier presentation or timer run are discarded and
    /// yield `None`.
    pub fn tick(&mut self, tick: Tick) -> Option<TimerState> {
        if tick.generation != self.generation || !self.is_presenting() {
            debug!("Discarding stale tick for generation {}", tick.generation);
            return None;
        }
        self.timer.as_mut().map(StepTimer::tick)
    }

    /// Applies a tick to the current presentation.
    pub fn tick_current(&mut self) -> Option<TimerState> {
        self.tick(Tick {
            generation: self.generation,
        })
    }

    fn complete(&mut self) -> Result<()> {
        self.state = WalkthroughState::Completed;
        self.timer = None;
        self.generation += 1;

        let record = SessionRecord::from_choices(
            &self.choices,
            self.owner_id.clone(),
            self.context.clock.now(),
        );
        info!(
            "Walk-through completed: session {} with {} choices",
            record.session_id,
            record.choices.len()
        );
        self.session = Some(record);
        self.save()
    }

    fn save(&mut self) -> Result<()> {
        let Some(record) = self.session.as_ref() else {
            return Ok(());
        };
        if self.saved {
            return Ok(());
        }

        match self.context.store.append_session(record) {
            Ok(()) => {
                self.saved = true;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to save session {}: {e}", record.session_id);
                Err(RoutineError::SessionNotSaved {
                    session_id: record.session_id.clone(),
                    source: Box::new(e),
                })
            }
        }
    }

    /// Writes a completed session that failed to save earlier. Does nothing
    /// when there is nothing pending.
    pub fn retry_save(&mut self) -> Result<()> {
        self.save()
    }

    /// The completed session when it has not reached the store yet.
    pub fn pending_save(&self) -> Option<&SessionRecord> {
        self.session.as_ref().filter(|_| !self.saved)
    }

    /// The session synthesized on completion.
    pub fn session(&self) -> Option<&SessionRecord> {
        self.session.as_ref()
    }

    /// Current state.
    pub fn state(&self) -> WalkthroughState {
        self.state
    }

    /// True while a step is presented.
    pub fn is_presenting(&self) -> bool {
        matches!(self.state, WalkthroughState::Presenting(_))
    }

    /// Steps of this walk-through, ascending.
    pub fn ordered_step_ids(&self) -> &[StepId] {
        &self.ordered_step_ids
    }

    /// Choices recorded so far.
    pub fn choices(&self) -> &BTreeMap<StepId, bool> {
        &self.choices
    }

    /// Identifier of the current presentation, carried by ticks.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Timer of the presented step, if it declares one.
    pub fn timer(&self) -> Option<&StepTimer> {
        self.timer.as_ref()
    }

    /// True when the presented step's timer is counting down.
    pub fn timer_is_running(&self) -> bool {
        self.timer.as_ref().is_some_and(StepTimer::is_running)
    }

    /// Snapshot of the presented step for rendering.
    pub fn view(&self) -> Option<StepView<'_>> {
        let WalkthroughState::Presenting(index) = self.state else {
            return None;
        };
        let id = self.ordered_step_ids[index];
        let step = self.context.catalog.get(id)?;
        let total = self.ordered_step_ids.len();

        Some(StepView {
            step,
            position: Position { index, total },
            is_first: index == 0,
            is_last: index + 1 == total,
            can_advance: !self.timer_is_running(),
            choice: self.choices.get(&id).copied(),
            timer: self.timer.as_ref(),
        })
    }
}
