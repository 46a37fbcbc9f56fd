//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper formats its items with a consistent structure and handles
//! the empty case.

use std::{fmt, ops::Index};

use crate::{
    catalog::Catalog,
    models::{SessionRecord, StepDefinition, StepStats},
};

/// Newtype wrapper for displaying catalog steps in full.
///
/// # Examples
///
/// ```rust
/// use cadence_core::{Catalog, display::Steps};
///
/// let catalog = Catalog::from_json(r#"[{"id": 1, "title": "Cleanse"}]"#)?;
/// let output = Steps(catalog.steps().to_vec()).to_string();
/// assert!(output.contains("### 1. Cleanse (required)"));
/// # Ok::<(), cadence_core::RoutineError>(())
/// ```
pub struct Steps(pub Vec<StepDefinition>);

impl Steps {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of steps in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the steps.
    pub fn iter(&self) -> std::slice::Iter<'_, StepDefinition> {
        self.0.iter()
    }
}

impl Index<usize> for Steps {
    type Output = StepDefinition;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Steps {
    type Item = &'a StepDefinition;
    type IntoIter = std::slice::Iter<'a, StepDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No steps in the catalog.");
        }
        for step in &self.0 {
            write!(f, "{step}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-step history as a markdown table.
pub struct HistoryReport(pub Vec<StepStats>);

impl HistoryReport {
    /// Number of sessions the report covers.
    pub fn total_sessions(&self) -> usize {
        self.0.first().map_or(0, |stats| stats.total_sessions)
    }

    /// Figures for one step, if present.
    pub fn get(&self, step_id: u32) -> Option<&StepStats> {
        self.0.iter().find(|stats| stats.step_id == step_id)
    }
}

impl fmt::Display for HistoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# History")?;
        writeln!(f)?;

        let total = self.total_sessions();
        if total == 0 {
            return writeln!(f, "No sessions recorded yet.");
        }

        let noun = if total == 1 { "session" } else { "sessions" };
        writeln!(f, "{total} {noun} recorded.")?;
        writeln!(f)?;
        writeln!(f, "| ID | Step | Performed | Share |")?;
        writeln!(f, "|---|---|---|---|")?;
        for stats in &self.0 {
            write!(f, "{stats}")?;
        }
        Ok(())
    }
}

/// Recorded sessions with step titles resolved through the catalog.
pub struct Sessions<'a> {
    pub sessions: Vec<SessionRecord>,
    pub catalog: &'a Catalog,
}

impl<'a> Sessions<'a> {
    /// Wraps `sessions` for display.
    pub fn new(sessions: Vec<SessionRecord>, catalog: &'a Catalog) -> Self {
        Self { sessions, catalog }
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Get the number of sessions in the collection.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

impl fmt::Display for Sessions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sessions.is_empty() {
            return writeln!(f, "No sessions found.");
        }
        for session in &self.sessions {
            write!(f, "{}", SessionSummary::new(session, self.catalog))?;
        }
        Ok(())
    }
}

/// One session with the outcome of each presented step.
pub struct SessionSummary<'a> {
    pub session: &'a SessionRecord,
    pub catalog: &'a Catalog,
}

impl<'a> SessionSummary<'a> {
    /// Wraps `session` for display.
    pub fn new(session: &'a SessionRecord, catalog: &'a Catalog) -> Self {
        Self { session, catalog }
    }
}

impl fmt::Display for SessionSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.session)?;
        writeln!(f)?;
        if self.session.choices.is_empty() {
            writeln!(f, "No steps were selected.")?;
        }
        for choice in &self.session.choices {
            let title = self
                .catalog
                .get(choice.step_id)
                .map_or("(unknown step)", |step| step.title.as_str());
            let mark = if choice.performed { "x" } else { " " };
            writeln!(f, "- [{mark}] {}. {title}", choice.step_id)?;
        }
        writeln!(f)
    }
}
