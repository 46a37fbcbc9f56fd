//! Session records produced by completed walk-throughs.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StepId;

/// Outcome recorded for one presented step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepChoice {
    /// Step the choice applies to
    pub step_id: StepId,

    /// True when the step was carried out, false when skipped
    pub performed: bool,
}

/// Immutable outcome of one completed walk-through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    /// Unique, time-ordered identifier
    pub session_id: String,

    /// Moment the walk-through reached its end (UTC)
    pub completed_at: Timestamp,

    /// Owner of the session; absent in single-user mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    /// One choice per presented step, ascending by step id
    #[serde(default)]
    pub choices: Vec<StepChoice>,
}

impl SessionRecord {
    /// Synthesizes a record from the choices gathered during a walk-through.
    pub fn from_choices(
        choices: &BTreeMap<StepId, bool>,
        owner_id: Option<String>,
        completed_at: Timestamp,
    ) -> Self {
        Self {
            session_id: Uuid::now_v7().to_string(),
            completed_at,
            owner_id,
            choices: choices
                .iter()
                .map(|(&step_id, &performed)| StepChoice { step_id, performed })
                .collect(),
        }
    }

    /// Returns the recorded choice for a step, if it was presented.
    pub fn choice_for(&self, step_id: StepId) -> Option<&StepChoice> {
        self.choices.iter().find(|choice| choice.step_id == step_id)
    }

    /// Returns true when the step was presented and performed.
    pub fn performed(&self, step_id: StepId) -> bool {
        self.choice_for(step_id).is_some_and(|choice| choice.performed)
    }

    /// Returns true when the record belongs to `owner_id`.
    ///
    /// `None` matches every record (single-user mode).
    pub fn is_owned_by(&self, owner_id: Option<&str>) -> bool {
        match owner_id {
            Some(owner) => self.owner_id.as_deref() == Some(owner),
            None => true,
        }
    }
}
