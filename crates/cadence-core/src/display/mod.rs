//! Display formatting wrappers.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! the wrappers here add context such as grouping, selection marks, step
//! titles or a greeting. Everything renders as markdown, which the CLI feeds
//! to its terminal renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │    Wrappers     │    │    Markdown     │
//! │ (steps, views,  │───▶│ (overview, step │───▶│     output      │
//! │   sessions)     │    │  reports, ...)  │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Catalog steps, history report, session lists
//! - [`planning`]: Planning overview and the presented walk-through step
//! - [`status`]: One-line operation feedback
//! - [`datetime`]: Timestamps, countdowns and recency
//! - [`models`]: Display implementations for domain models
//!
//! # Examples
//!
//! ```rust
//! use cadence_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Identity saved");
//! assert!(status.to_string().contains("Identity saved"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod planning;
pub mod status;

pub use collections::{HistoryReport, SessionSummary, Sessions, Steps};
pub use datetime::{Countdown, DaysAgo, LocalDateTime};
pub use planning::{PlanningOverview, WalkthroughStep};
pub use status::{OperationStatus, StatusKind};
