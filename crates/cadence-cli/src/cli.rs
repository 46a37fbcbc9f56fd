//! Command handlers for the Cadence CLI
//!
//! Each handler turns parsed arguments into calls on the core [`Routine`]
//! and renders the resulting display wrapper:
//!
//! ```text
//! User Input → CLI Args (clap) → Routine operation → Display wrapper → Renderer
//! ```

use anyhow::{Context, Result};
use cadence_core::{
    PlanningCategory, Routine,
    display::{OperationStatus, Steps},
    planning::Planning,
};
use log::info;

use crate::{
    args::{SelectionArgs, SessionsArgs, WhoamiArgs},
    renderer::TerminalRenderer,
    walk,
};

/// Applies `--add` / `--remove` to a planning pass and reports the ids that
/// could not be changed.
fn apply_selection(planning: &mut Planning, args: &SelectionArgs) -> Vec<OperationStatus> {
    let mut notes = Vec::new();

    for (&id, selected) in args
        .add
        .iter()
        .map(|id| (id, true))
        .chain(args.remove.iter().map(|id| (id, false)))
    {
        match planning.view(id).map(|view| view.category) {
            None => notes.push(OperationStatus::notice(format!("No step with ID {id}"))),
            Some(PlanningCategory::Required) if !selected => notes.push(
                OperationStatus::notice(format!("Step {id} is required and stays selected")),
            ),
            Some(_) => {
                planning.set_selected(id, selected);
            }
        }
    }

    notes
}

/// CLI handler bound to one routine.
pub struct Cli {
    routine: Routine,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(routine: Routine, renderer: TerminalRenderer) -> Self {
        Self { routine, renderer }
    }

    pub fn list_steps(&self) -> Result<()> {
        let steps: Steps = self.routine.list_steps();
        self.renderer.show(&steps)
    }

    /// Plans today's session and prints it without committing.
    pub async fn show_plan(&self, args: &SelectionArgs) -> Result<()> {
        let planning = self.prepare_planning(args).await?;
        self.renderer
            .show(&self.routine.planning_overview(&planning))
    }

    /// Commits today's selection and runs the interactive walk-through.
    pub async fn start(&self, args: &SelectionArgs) -> Result<()> {
        let planning = self.prepare_planning(args).await?;
        self.renderer
            .show(&self.routine.planning_overview(&planning))?;

        let commitment = self
            .routine
            .commit(&planning)
            .await
            .context("Failed to commit selection")?;
        let walkthrough = self
            .routine
            .begin(&commitment)
            .await
            .context("Failed to start walk-through")?;

        info!(
            "Starting walk-through of {} steps",
            commitment.selected_step_ids.len()
        );
        walk::run(walkthrough, self.routine.catalog(), &self.renderer).await?;
        Ok(())
    }

    async fn prepare_planning(&self, args: &SelectionArgs) -> Result<Planning> {
        let mut planning = self
            .routine
            .plan()
            .await
            .context("Failed to categorize steps")?;
        for note in apply_selection(&mut planning, args) {
            self.renderer.show(&note)?;
        }
        Ok(planning)
    }

    pub async fn show_history(&self) -> Result<()> {
        let report = self
            .routine
            .history_report()
            .await
            .context("Failed to load history")?;
        self.renderer.show(&report)
    }

    pub async fn list_sessions(&self, args: &SessionsArgs) -> Result<()> {
        let sessions = self
            .routine
            .session_list(args.date)
            .await
            .context("Failed to load sessions")?;
        self.renderer.show(&sessions)
    }

    /// Shows the remembered name, or stores a new one.
    pub async fn whoami(&mut self, args: WhoamiArgs) -> Result<()> {
        let status = match args.name {
            Some(name) => {
                let owner = self
                    .routine
                    .set_identity(&name)
                    .await
                    .context("Failed to save identity")?;
                OperationStatus::success(format!("Identity saved: {owner}"))
            }
            None => match self.routine.owner_id() {
                Some(owner) => OperationStatus::notice(format!("You are {owner}")),
                None => OperationStatus::notice(
                    "No identity stored; run `cadence whoami NAME` to set one",
                ),
            },
        };
        self.renderer.show(&status)
    }
}

#[cfg(test)]
mod tests {
    use cadence_core::{Catalog, planning::{RecencyPolicy, categorize}};
    use jiff::{Timestamp, tz::TimeZone};

    use super::*;

    fn planning() -> Planning {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "title": "Cleanse"}, {"id": 2, "title": "Oil", "is_optional": true}]"#,
        )
        .unwrap();
        let policy = RecencyPolicy::default().with_time_zone(TimeZone::UTC);
        Planning::new(categorize(&catalog, &[], None, Timestamp::UNIX_EPOCH, &policy))
    }

    #[test]
    fn test_apply_selection_adds_and_removes() {
        let mut planning = planning();
        let args = SelectionArgs {
            add: vec![2],
            remove: vec![],
        };
        assert!(apply_selection(&mut planning, &args).is_empty());
        assert!(planning.is_selected(2));

        let args = SelectionArgs {
            add: vec![],
            remove: vec![2],
        };
        assert!(apply_selection(&mut planning, &args).is_empty());
        assert!(!planning.is_selected(2));
    }

    #[test]
    fn test_apply_selection_reports_locked_and_unknown() {
        let mut planning = planning();
        let args = SelectionArgs {
            add: vec![9, 1],
            remove: vec![1],
        };
        let notes = apply_selection(&mut planning, &args);
        assert_eq!(notes.len(), 2);
        assert!(notes[0].message.contains("No step with ID 9"));
        assert!(notes[1].message.contains("required"));
        assert!(planning.is_selected(1));
    }
}
