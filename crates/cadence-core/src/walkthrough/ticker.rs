//! Once-per-second tick source for step timers.
//!
//! Each running timer is backed by one tokio task that sends [`Tick`]s over
//! a channel. The task belongs to a single run of a step's timer: it is
//! aborted as soon as the presentation changes, the timer is restarted or
//! the ticker is dropped, and any tick already in flight carries a
//! generation the controller no longer accepts.

use std::time::Duration;

use log::debug;
use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
};

use super::Walkthrough;

/// One elapsed second for the timer run identified by `generation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Scheduled tick task for one presentation; aborted on drop.
#[derive(Debug)]
pub struct TimerTask {
    generation: u64,
    handle: JoinHandle<()>,
}

impl TimerTask {
    /// Spawns a task sending a tick every `period`, starting one period from
    /// now.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn spawn(generation: u64, period: Duration, sender: UnboundedSender<Tick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if sender.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });
        debug!("Started timer task for generation {generation}");
        Self { generation, handle }
    }

    /// Timer run this task ticks for.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for TimerTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Keeps at most one [`TimerTask`] alive, matching the walk-through's
/// presented step.
#[derive(Debug)]
pub struct StepTicker {
    period: Duration,
    sender: UnboundedSender<Tick>,
    task: Option<TimerTask>,
}

impl StepTicker {
    /// Creates a ticker with a one second period.
    pub fn new() -> (Self, UnboundedReceiver<Tick>) {
        Self::with_period(Duration::from_secs(1))
    }

    /// Creates a ticker with a custom period.
    pub fn with_period(period: Duration) -> (Self, UnboundedReceiver<Tick>) {
        let (sender, receiver) = unbounded_channel();
        (
            Self {
                period,
                sender,
                task: None,
            },
            receiver,
        )
    }

    /// Starts, keeps or tears down the tick task so that it runs exactly
    /// while the presented step's timer is running.
    ///
    /// Call after every interaction with the walk-through.
    ///
    /// # Panics
    ///
    /// Panics when a task has to be spawned outside a Tokio runtime.
    pub fn sync(&mut self, walkthrough: &Walkthrough) {
        let wanted = walkthrough
            .timer_is_running()
            .then(|| walkthrough.generation());

        match (self.task.as_ref().map(TimerTask::generation), wanted) {
            (Some(current), Some(generation)) if current == generation => {}
            (_, Some(generation)) => {
                self.task = Some(TimerTask::spawn(
                    generation,
                    self.period,
                    self.sender.clone(),
                ));
            }
            (_, None) => {
                if self.task.take().is_some() {
                    debug!("Stopped timer task");
                }
            }
        }
    }

    /// True while a tick task is alive.
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }
}
