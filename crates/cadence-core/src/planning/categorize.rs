//! Recency-based step categorization.

use jiff::{Timestamp, tz::TimeZone};

use crate::{
    catalog::Catalog,
    models::{PlanningCategory, PlanningStepView, SessionRecord, StepDefinition, StepId},
};

/// Default number of days within which a past performance promotes an
/// optional step to Recommended.
pub const RECENT_THRESHOLD_DAYS: u32 = 2;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Parameters of the recency rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RecencyPolicy {
    /// Upper bound (inclusive) in days for Recommended
    pub recent_threshold_days: u32,

    /// Zone used to decide whether two instants fall on the same day
    pub time_zone: TimeZone,
}

impl Default for RecencyPolicy {
    fn default() -> Self {
        Self {
            recent_threshold_days: RECENT_THRESHOLD_DAYS,
            time_zone: TimeZone::system(),
        }
    }
}

impl RecencyPolicy {
    /// Creates a policy with the given threshold in the system time zone.
    pub fn new(recent_threshold_days: u32) -> Self {
        Self {
            recent_threshold_days,
            ..Self::default()
        }
    }

    /// Replaces the time zone used for same-day detection.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Fractional days between `last` and `now`.
    ///
    /// Instants on the same civil date in the policy's zone count as zero
    /// days apart.
    pub fn days_since(&self, last: Timestamp, now: Timestamp) -> f64 {
        let last_day = last.to_zoned(self.time_zone.clone()).date();
        let today = now.to_zoned(self.time_zone.clone()).date();
        if last_day == today {
            return 0.0;
        }
        now.duration_since(last).as_secs_f64() / SECONDS_PER_DAY
    }

    /// Category of an optional step given the days since it was performed.
    ///
    /// `None` means the step was never performed.
    pub fn category_for(&self, days_since: Option<f64>) -> PlanningCategory {
        match days_since {
            Some(days) if days > 0.0 && days <= f64::from(self.recent_threshold_days) => {
                PlanningCategory::Recommended
            }
            _ => PlanningCategory::Optional,
        }
    }
}

/// Most recent completion time of a session in which `step_id` was
/// performed.
pub fn last_performed(
    history: &[SessionRecord],
    step_id: StepId,
    owner_id: Option<&str>,
) -> Option<Timestamp> {
    history
        .iter()
        .filter(|session| session.is_owned_by(owner_id))
        .filter(|session| session.performed(step_id))
        .map(|session| session.completed_at)
        .max()
}

/// Categorizes a single step.
pub fn categorize_step(
    step: &StepDefinition,
    history: &[SessionRecord],
    owner_id: Option<&str>,
    now: Timestamp,
    policy: &RecencyPolicy,
) -> PlanningStepView {
    let days_since_performed =
        last_performed(history, step.id, owner_id).map(|last| policy.days_since(last, now));

    let category = if step.is_required() {
        PlanningCategory::Required
    } else {
        policy.category_for(days_since_performed)
    };

    PlanningStepView {
        step: step.clone(),
        category,
        days_since_performed,
    }
}

/// Categorizes every catalog step for a planning pass, in catalog order.
///
/// Pure over its inputs: the history is never modified and nothing is
/// persisted.
pub fn categorize(
    catalog: &Catalog,
    history: &[SessionRecord],
    owner_id: Option<&str>,
    now: Timestamp,
    policy: &RecencyPolicy,
) -> Vec<PlanningStepView> {
    catalog
        .iter()
        .map(|step| categorize_step(step, history, owner_id, now, policy))
        .collect()
}
