//! Routine operations that return display wrappers.

use jiff::civil::Date;

use super::Routine;
use crate::{
    display::{HistoryReport, PlanningOverview, Sessions, Steps},
    error::Result,
    planning::Planning,
};

impl Routine {
    /// Every catalog step, formatted in full.
    pub fn list_steps(&self) -> Steps {
        Steps(self.catalog.steps().to_vec())
    }

    /// Planning overview with the owner's greeting.
    pub fn planning_overview<'a>(&self, planning: &'a Planning) -> PlanningOverview<'a> {
        PlanningOverview::new(planning).with_greeting(self.greeting())
    }

    /// Per-step history report for the owner.
    pub async fn history_report(&self) -> Result<HistoryReport> {
        Ok(HistoryReport(self.history_stats().await?))
    }

    /// The owner's sessions, optionally restricted to one civil date.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use cadence_core::RoutineBuilder;
    /// # async {
    /// let routine = RoutineBuilder::new().build().await?;
    /// let today = routine.today();
    /// let sessions = routine.session_list(Some(today)).await?;
    /// println!("{sessions}");
    /// # Result::<(), cadence_core::RoutineError>::Ok(())
    /// # };
    /// ```
    pub async fn session_list(&self, date: Option<Date>) -> Result<Sessions<'_>> {
        let sessions = match date {
            Some(date) => self.sessions_on(date).await?,
            None => self.sessions().await?,
        };
        Ok(Sessions::new(sessions, &self.catalog))
    }
}
