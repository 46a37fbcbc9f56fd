//! Display implementations for domain models.
//!
//! Kept apart from the model definitions so the data types stay free of
//! presentation concerns. All output is markdown.

use std::fmt;

use super::datetime::{Countdown, DaysAgo, LocalDateTime};
use crate::{
    models::{PlanningCategory, PlanningStepView, SessionRecord, StepDefinition, StepStats},
    walkthrough::{StepTimer, TimerState},
};

impl fmt::Display for PlanningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerState::Idle => write!(f, "not started"),
            TimerState::Running(remaining) => write!(f, "{} remaining", Countdown(*remaining)),
            TimerState::Expired => write!(f, "done"),
        }
    }
}

impl fmt::Display for StepTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 20;
        let filled = (self.progress() * WIDTH as f64).round() as usize;
        write!(
            f,
            "`[{}{}]` {} of {} ({})",
            "#".repeat(filled),
            "-".repeat(WIDTH - filled.min(WIDTH)),
            Countdown(self.remaining_seconds()),
            Countdown(self.duration_seconds()),
            self.state()
        )
    }
}

impl fmt::Display for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_optional { "optional" } else { "required" };
        writeln!(f, "### {}. {} ({kind})", self.id, self.title)?;
        writeln!(f)?;

        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }

        if !self.actions.is_empty() {
            writeln!(f, "#### Actions")?;
            writeln!(f)?;
            for (number, action) in self.actions.iter().enumerate() {
                writeln!(f, "{}. {action}", number + 1)?;
            }
            writeln!(f)?;
        }

        if !self.products.is_empty() {
            writeln!(f, "#### Products")?;
            writeln!(f)?;
            let featured = self.featured_product();
            for product in &self.products {
                if featured == Some(product.as_str()) {
                    writeln!(f, "- **{product}** (preferred)")?;
                } else {
                    writeln!(f, "- {product}")?;
                }
            }
            writeln!(f)?;
        }

        if let Some(seconds) = self.timer_duration_seconds {
            writeln!(f, "- **Timer**: {}", Countdown(seconds))?;
        }
        if let Some(notes) = &self.notes {
            writeln!(f, "- **Notes**: {notes}")?;
        }

        Ok(())
    }
}

impl fmt::Display for PlanningStepView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.step.id, self.step.title)?;
        if self.step.has_timer() {
            write!(f, " ⏱")?;
        }
        write!(f, " *({})*", DaysAgo(self.days_since_performed))
    }
}

impl fmt::Display for StepStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "| {} | {} | {}/{} | {}% |",
            self.step_id, self.title, self.performed_count, self.total_sessions, self.percentage
        )
    }
}

impl fmt::Display for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let performed = self.choices.iter().filter(|choice| choice.performed).count();
        write!(
            f,
            "{} - {performed}/{} steps performed",
            LocalDateTime(&self.completed_at),
            self.choices.len()
        )?;
        if let Some(owner) = &self.owner_id {
            write!(f, " ({owner})")?;
        }
        Ok(())
    }
}
