//! Data models for steps, sessions and planning.
//!
//! This module contains the domain types shared by the planning engine, the
//! walk-through controller and the session stores. Display implementations
//! for these models live in [`crate::display::models`] so presentation stays
//! separate from the data structures.
//!
//! # Lifetimes
//!
//! - [`StepDefinition`]: loaded once from the catalog, never modified
//! - [`PlanningStepView`]: recomputed for every planning pass
//! - [`SelectionCommitment`]: appended to the selection log on commit
//! - [`SessionRecord`]: appended once when a walk-through finishes, never
//!   mutated afterwards
//!
//! # Examples
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use cadence_core::models::SessionRecord;
//! use jiff::Timestamp;
//!
//! let mut choices = BTreeMap::new();
//! choices.insert(2, false);
//! choices.insert(1, true);
//!
//! let record = SessionRecord::from_choices(&choices, None, Timestamp::UNIX_EPOCH);
//! assert_eq!(record.choices[0].step_id, 1);
//! assert!(record.performed(1));
//! assert!(!record.performed(2));
//! ```

pub mod category;
pub mod selection;
pub mod session;
pub mod stats;
pub mod step;

#[cfg(test)]
mod tests;

pub use category::{PlanningCategory, PlanningStepView};
pub use selection::SelectionCommitment;
pub use session::{SessionRecord, StepChoice};
pub use stats::StepStats;
pub use step::{StepDefinition, StepId};
