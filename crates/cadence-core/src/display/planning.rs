//! Wrappers for the planning screen and the walk-through.

use std::fmt;

use crate::{models::PlanningCategory, planning::Planning, walkthrough::StepView};

/// Planning pass grouped by category, with the current selection.
///
/// # Examples
///
/// ```rust
/// use cadence_core::{
///     Catalog,
///     display::PlanningOverview,
///     planning::{Planning, RecencyPolicy, categorize},
/// };
/// use jiff::{Timestamp, tz::TimeZone};
///
/// let catalog = Catalog::from_json(
///     r#"[{"id": 1, "title": "Cleanse"}, {"id": 2, "title": "Mask", "is_optional": true}]"#,
/// )?;
/// let policy = RecencyPolicy::default().with_time_zone(TimeZone::UTC);
/// let planning = Planning::new(categorize(&catalog, &[], None, Timestamp::UNIX_EPOCH, &policy));
///
/// let output = PlanningOverview::new(&planning)
///     .with_greeting(Some("Welcome, Sam!".to_string()))
///     .to_string();
/// assert!(output.contains("Welcome, Sam!"));
/// assert!(output.contains("## Required Steps"));
/// assert!(output.contains("1 of 2 steps selected"));
/// # Ok::<(), cadence_core::RoutineError>(())
/// ```
pub struct PlanningOverview<'a> {
    pub planning: &'a Planning,
    pub greeting: Option<String>,
}

impl<'a> PlanningOverview<'a> {
    /// Wraps a planning pass for display.
    pub fn new(planning: &'a Planning) -> Self {
        Self {
            planning,
            greeting: None,
        }
    }

    /// Adds a welcome line above the groups.
    pub fn with_greeting(mut self, greeting: Option<String>) -> Self {
        self.greeting = greeting;
        self
    }
}

impl fmt::Display for PlanningOverview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(greeting) = &self.greeting {
            writeln!(f, "# {greeting}")?;
            writeln!(f)?;
        }

        for (category, views) in self.planning.groups() {
            writeln!(f, "## {}", category.label())?;
            writeln!(f)?;
            writeln!(f, "*{}*", category.blurb())?;
            writeln!(f)?;
            for view in views {
                let mark = if self.planning.is_selected(view.id()) { "x" } else { " " };
                if category == PlanningCategory::Required {
                    writeln!(f, "- [{mark}] {view} (locked)")?;
                } else {
                    writeln!(f, "- [{mark}] {view}")?;
                }
            }
            writeln!(f)?;
        }

        writeln!(
            f,
            "**{} of {} steps selected**",
            self.planning.selected_count(),
            self.planning.total_count()
        )
    }
}

/// The presented step of a walk-through.
pub struct WalkthroughStep<'a>(pub StepView<'a>);

impl fmt::Display for WalkthroughStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = &self.0;
        writeln!(
            f,
            "**Step {} of {}** ({}%)",
            view.position.number(),
            view.position.total,
            view.position.percent_complete()
        )?;
        writeln!(f)?;
        write!(f, "{}", view.step)?;

        if let Some(timer) = view.timer {
            writeln!(f)?;
            writeln!(f, "{timer}")?;
        }

        if let Some(choice) = view.choice {
            writeln!(f)?;
            let label = if choice { "performed" } else { "skipped" };
            writeln!(f, "*Currently marked as {label}.*")?;
        }
        Ok(())
    }
}
