//! Core library for the Cadence guided routine planner.
//!
//! A routine is a fixed catalog of steps, some required and some optional.
//! Before each session the catalog is categorized against the session
//! history (required, recommended, optional), the user adjusts the
//! selection, and a walk-through presents the selected steps one at a time.
//! Finishing the walk-through appends a session record, which feeds the next
//! planning pass.
//!
//! ```text
//! Catalog + SessionStore ──▶ planning ──▶ SelectionCommitment ──▶ walkthrough
//!        ▲                                                             │
//!        └───────────────────── SessionRecord ◀────────────────────────┘
//! ```
//!
//! # Display Architecture
//!
//! Domain models implement [`std::fmt::Display`] and the [`display`] module
//! adds context-aware wrappers. All output is markdown, rendered by the CLI.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cadence_core::{RoutineBuilder, store::Backend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let routine = RoutineBuilder::new()
//!     .with_backend(Backend::Json)
//!     .with_data_path(Some("routine.json"))
//!     .build()
//!     .await?;
//!
//! let planning = routine.plan().await?;
//! println!("{}", routine.planning_overview(&planning));
//!
//! let commitment = routine.commit(&planning).await?;
//! let mut walkthrough = routine.begin(&commitment).await?;
//! while let Some(view) = walkthrough.view() {
//!     println!("Now: {}", view.step.title);
//!     walkthrough.resolve(true)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod clock;
pub mod display;
pub mod error;
pub mod history;
pub mod models;
pub mod planning;
pub mod routine;
pub mod store;
pub mod walkthrough;

// Re-export commonly used types
pub use catalog::Catalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use display::{
    HistoryReport, OperationStatus, PlanningOverview, Sessions, Steps, WalkthroughStep,
};
pub use error::{Result, RoutineError};
pub use models::{
    PlanningCategory, PlanningStepView, SelectionCommitment, SessionRecord, StepChoice,
    StepDefinition, StepId, StepStats,
};
pub use planning::{Planning, RecencyPolicy};
pub use routine::{Routine, RoutineBuilder};
pub use store::{Backend, JsonStore, SessionStore, SqliteStore};
pub use walkthrough::{StepTicker, Transition, Walkthrough, WalkthroughState};
