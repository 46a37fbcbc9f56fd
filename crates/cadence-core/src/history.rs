//! Folds over the session history for reporting.

use jiff::{civil::Date, tz::TimeZone};

use crate::{
    catalog::Catalog,
    models::{SessionRecord, StepStats},
};

/// Rounded percentage of `count` over `total`; 0 when `total` is 0.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// Per-step performed counts across every given session, in catalog order.
pub fn step_stats(catalog: &Catalog, sessions: &[SessionRecord]) -> Vec<StepStats> {
    let total_sessions = sessions.len();
    catalog
        .iter()
        .map(|step| {
            let performed_count = sessions
                .iter()
                .filter(|session| session.performed(step.id))
                .count();
            StepStats {
                step_id: step.id,
                title: step.title.clone(),
                performed_count,
                total_sessions,
                percentage: percentage(performed_count, total_sessions),
            }
        })
        .collect()
}

/// Sessions completed on `date` in `time_zone`.
pub fn sessions_on<'a>(
    sessions: &'a [SessionRecord],
    date: Date,
    time_zone: &TimeZone,
) -> Vec<&'a SessionRecord> {
    sessions
        .iter()
        .filter(|session| session.completed_at.to_zoned(time_zone.clone()).date() == date)
        .collect()
}
