//! Planning: categorize the catalog, let the user adjust the selection, and
//! commit it as the ordered walk-through sequence.
//!
//! ```text
//! Catalog + history ──categorize──▶ [PlanningStepView] ──Planning──▶ SelectionCommitment
//! ```
//!
//! # Examples
//!
//! ```rust
//! use cadence_core::{
//!     Catalog,
//!     models::PlanningCategory,
//!     planning::{Planning, RecencyPolicy, categorize},
//! };
//! use jiff::{Timestamp, civil::date, tz::TimeZone};
//!
//! let catalog = Catalog::from_json(
//!     r#"[{"id": 1, "title": "Cleanse"}, {"id": 2, "title": "Mask", "is_optional": true}]"#,
//! )?;
//! let policy = RecencyPolicy::default().with_time_zone(TimeZone::UTC);
//! let views = categorize(&catalog, &[], None, Timestamp::UNIX_EPOCH, &policy);
//! assert_eq!(views[0].category, PlanningCategory::Required);
//! assert_eq!(views[1].category, PlanningCategory::Optional);
//!
//! let mut planning = Planning::new(views);
//! planning.toggle(2);
//! let commitment = planning.commit(None, date(2024, 3, 1));
//! assert_eq!(commitment.ordered_step_ids(), &[1, 2]);
//! # Ok::<(), cadence_core::RoutineError>(())
//! ```

pub mod categorize;
pub mod selector;


pub use categorize::{
    RECENT_THRESHOLD_DAYS, RecencyPolicy, categorize, categorize_step, last_performed,
};
pub use selector::{Planning, commit, init_selection, toggle};
