//! Walk-through: sequential navigation over a committed selection.
//!
//! A [`Walkthrough`] is created from a [`crate::models::SelectionCommitment`]
//! and moves through three states:
//!
//! ```text
//!            resolve (not last)
//!          ┌────────────────────┐
//!          ▼                    │
//!   Presenting(i) ──────────────┘
//!      │   ▲  │
//!      │   └──┘ back (i > 0)
//!      │
//!      ├── resolve (last) ──▶ Completed   (session appended to the store)
//!      └── abandon ─────────▶ Abandoned   (nothing persisted)
//! ```
//!
//! Steps that declare a timer gate `resolve` while the countdown runs. The
//! countdown is a pure [`StepTimer`]; real-time ticks come from a
//! [`StepTicker`] owned by whoever drives the walk-through.

pub mod controller;
pub mod ticker;
pub mod timer;

#[cfg(test)]
mod tests;

pub use controller::{
    Position, StepView, Transition, Walkthrough, WalkthroughContext, WalkthroughState,
};
pub use ticker::{StepTicker, Tick, TimerTask};
pub use timer::{StepTimer, TimerState};
