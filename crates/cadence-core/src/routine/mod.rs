//! High-level routine API.
//!
//! [`Routine`] is the entry point applications use. It owns the step
//! catalog, the injected [`SessionStore`], the owner identity and the
//! recency policy, and exposes every operation as an async method. Store
//! access runs on Tokio's blocking pool.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │  SessionStore   │
//! │ (display-ready  │───▶│ (plan, commit,  │───▶│ (sqlite / json) │
//! │   wrappers)     │    │  begin, ...)    │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Routine`] instances with configuration
//! - [`ops`]: Planning, commitment, walk-through and history operations
//! - [`handlers`]: Operations that return [`crate::display`] wrappers
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use cadence_core::RoutineBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let routine = RoutineBuilder::new()
//!     .with_data_path(Some("/tmp/cadence.db"))
//!     .with_owner(Some("sam".to_string()))
//!     .build()
//!     .await?;
//!
//! let mut planning = routine.plan().await?;
//! planning.toggle(5);
//! let commitment = routine.commit(&planning).await?;
//!
//! let mut walkthrough = routine.begin(&commitment).await?;
//! while walkthrough.is_presenting() {
//!     walkthrough.resolve(true)?;
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::{catalog::Catalog, clock::Clock, planning::RecencyPolicy, store::SessionStore};

pub mod builder;
pub mod handlers;
pub mod ops;


pub use builder::RoutineBuilder;

/// Main routine interface for planning and walking through steps.
pub struct Routine {
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) store: Arc<dyn SessionStore>,
    pub(crate) owner_id: Option<String>,
    pub(crate) policy: RecencyPolicy,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) returning_user: bool,
}

impl Routine {
    /// The step catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Owner the routine acts for; `None` in single-user mode.
    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    /// Recency rule used for planning.
    pub fn policy(&self) -> &RecencyPolicy {
        &self.policy
    }

    /// True when the owner had a stored identity or recorded sessions before
    /// this routine was built.
    pub fn is_returning_user(&self) -> bool {
        self.returning_user
    }

    /// Welcome line for the owner, if one is known.
    pub fn greeting(&self) -> Option<String> {
        let name = self.owner_id.as_deref()?;
        Some(if self.returning_user {
            format!("Welcome back, {name}!")
        } else {
            format!("Welcome, {name}!")
        })
    }
}
