//! Step definition model.

use serde::{Deserialize, Serialize};

/// Identifier of a step; stable and defines the canonical order.
pub type StepId = u32;

/// One unit of the routine as described by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepDefinition {
    /// Unique identifier, ascending ids define the walk-through order
    pub id: StepId,

    /// Short title of the step
    pub title: String,

    /// Instructional description
    #[serde(default)]
    pub description: String,

    /// Whether the user may leave the step out of a walk-through
    #[serde(default)]
    pub is_optional: bool,

    /// Ordered instructions to carry out
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,

    /// Products used by the step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<String>,

    /// Product to suggest first, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_product: Option<String>,

    /// Countdown that must run out before the step can be resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_duration_seconds: Option<u32>,

    /// Frequency hints and other free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StepDefinition {
    /// Returns true when the step can never be excluded from a walk-through.
    pub fn is_required(&self) -> bool {
        !self.is_optional
    }

    /// Returns true when the step declares a countdown timer.
    pub fn has_timer(&self) -> bool {
        self.timer_duration_seconds.is_some()
    }

    /// The product to show first: the preferred one, else the first listed.
    pub fn featured_product(&self) -> Option<&str> {
        self.preferred_product
            .as_deref()
            .or_else(|| self.products.first().map(String::as_str))
    }
}
