#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Arc};

use cadence_core::{
    Backend, FixedClock, Routine, RoutineBuilder, SessionRecord, StepId,
};
use jiff::{Timestamp, tz::TimeZone};
use tempfile::TempDir;

/// Parses an RFC 3339 instant.
pub fn ts(timestamp: &str) -> Timestamp {
    timestamp.parse().expect("Invalid timestamp")
}

/// Builds a session record with the given choices.
pub fn session(owner: Option<&str>, completed_at: &str, choices: &[(StepId, bool)]) -> SessionRecord {
    let choices: BTreeMap<StepId, bool> = choices.iter().copied().collect();
    SessionRecord::from_choices(&choices, owner.map(str::to_string), ts(completed_at))
}

/// Helper function to create a test routine pinned to `now` in UTC
pub async fn create_test_routine(
    temp_dir: &TempDir,
    backend: Backend,
    now: &str,
) -> Routine {
    let path = temp_dir.path().join(backend.default_file_name());
    RoutineBuilder::new()
        .with_backend(backend)
        .with_data_path(Some(path))
        .with_time_zone(TimeZone::UTC)
        .with_clock(Arc::new(FixedClock(ts(now))))
        .build()
        .await
        .expect("Failed to create routine")
}
