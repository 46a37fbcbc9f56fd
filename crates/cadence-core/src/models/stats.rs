//! Aggregated per-step history.

use serde::{Deserialize, Serialize};

use super::StepId;

/// How often a step was performed across the recorded sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepStats {
    /// Step the figures refer to
    pub step_id: StepId,

    /// Step title, copied from the catalog for display
    pub title: String,

    /// Sessions in which the step was performed
    pub performed_count: usize,

    /// Number of sessions considered
    pub total_sessions: usize,

    /// `performed_count / total_sessions` as a rounded percentage
    pub percentage: u32,
}
