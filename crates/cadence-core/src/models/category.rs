//! Planning categories and the per-step planning view.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{StepDefinition, StepId};

/// Classification of a step for one planning pass.
///
/// Derived from the catalog and the session history every time planning
/// starts; never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlanningCategory {
    /// Non-optional step, always part of the walk-through
    Required,

    /// Optional step performed recently enough to keep the cycle going
    Recommended,

    /// Any other optional step
    Optional,
}

impl FromStr for PlanningCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "required" => Ok(PlanningCategory::Required),
            "recommended" => Ok(PlanningCategory::Recommended),
            "optional" => Ok(PlanningCategory::Optional),
            _ => Err(format!("Invalid planning category: {s}")),
        }
    }
}

impl PlanningCategory {
    /// All categories in display order.
    pub const ALL: [PlanningCategory; 3] = [
        PlanningCategory::Required,
        PlanningCategory::Recommended,
        PlanningCategory::Optional,
    ];

    /// Lowercase name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanningCategory::Required => "required",
            PlanningCategory::Recommended => "recommended",
            PlanningCategory::Optional => "optional",
        }
    }

    /// Heading used when rendering a group of steps.
    pub fn label(&self) -> &'static str {
        match self {
            PlanningCategory::Required => "Required Steps",
            PlanningCategory::Recommended => "Recommended Steps",
            PlanningCategory::Optional => "Optional Steps",
        }
    }

    /// One-line explanation shown under the group heading.
    pub fn blurb(&self) -> &'static str {
        match self {
            PlanningCategory::Required => "These steps are essential for your routine",
            PlanningCategory::Recommended => "Based on your recent routine history",
            PlanningCategory::Optional => "Add these based on your needs today",
        }
    }

    /// Whether steps of this category start out selected.
    pub fn is_preselected(&self) -> bool {
        matches!(
            self,
            PlanningCategory::Required | PlanningCategory::Recommended
        )
    }
}

/// A catalog step annotated with its category for the current planning pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanningStepView {
    /// The underlying catalog entry
    #[serde(flatten)]
    pub step: StepDefinition,

    /// Category computed for this pass
    pub category: PlanningCategory,

    /// Fractional days since the step was last performed, if ever
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_since_performed: Option<f64>,
}

impl PlanningStepView {
    /// Id of the underlying step.
    pub fn id(&self) -> StepId {
        self.step.id
    }
}
