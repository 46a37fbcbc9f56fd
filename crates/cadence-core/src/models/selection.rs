//! Selection commitments recorded when a planning pass is finalized.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::StepId;

/// Immutable record of the steps chosen for one walk-through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionCommitment {
    /// Owner of the selection; absent in single-user mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    /// Civil date the selection was committed on
    pub committed_date: Date,

    /// Selected ids, strictly ascending
    pub selected_step_ids: Vec<StepId>,
}

impl SelectionCommitment {
    /// Builds a commitment, sorting and de-duplicating the ids.
    pub fn new(
        owner_id: Option<String>,
        committed_date: Date,
        ids: impl IntoIterator<Item = StepId>,
    ) -> Self {
        let mut selected_step_ids: Vec<StepId> = ids.into_iter().collect();
        selected_step_ids.sort_unstable();
        selected_step_ids.dedup();
        Self {
            owner_id,
            committed_date,
            selected_step_ids,
        }
    }

    /// The walk-through order.
    pub fn ordered_step_ids(&self) -> &[StepId] {
        &self.selected_step_ids
    }

    /// True when nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.selected_step_ids.is_empty()
    }
}
