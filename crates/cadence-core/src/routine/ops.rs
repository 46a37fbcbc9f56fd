//! Store-backed operations for the Routine.

use std::sync::Arc;

use jiff::{Timestamp, civil::Date};
use log::info;
use tokio::task;

use super::{Routine, builder::validate_owner};
use crate::{
    error::{Result, RoutineError},
    history,
    models::{SelectionCommitment, SessionRecord, StepId, StepStats},
    planning::{self, Planning},
    store::SessionStore,
    walkthrough::{Walkthrough, WalkthroughContext},
};

impl Routine {
    /// Runs `operation` against the store on the blocking pool.
    async fn with_store<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SessionStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || operation(store.as_ref()))
            .await
            .map_err(RoutineError::join)?
    }

    /// Current instant according to the routine's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Today's civil date in the policy time zone.
    pub fn today(&self) -> Date {
        self.now().to_zoned(self.policy.time_zone.clone()).date()
    }

    /// Collaborators handed to every walk-through.
    pub fn walkthrough_context(&self) -> WalkthroughContext {
        WalkthroughContext {
            catalog: Arc::clone(&self.catalog),
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }

    /// Loads the owner's sessions, oldest first.
    pub async fn sessions(&self) -> Result<Vec<SessionRecord>> {
        let owner_id = self.owner_id.clone();
        self.with_store(move |store| store.load_sessions(owner_id.as_deref()))
            .await
    }

    /// Loads the owner's sessions completed on `date`.
    pub async fn sessions_on(&self, date: Date) -> Result<Vec<SessionRecord>> {
        let sessions = self.sessions().await?;
        Ok(history::sessions_on(&sessions, date, &self.policy.time_zone)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Loads the owner's selection log.
    pub async fn selection_history(&self) -> Result<Vec<SelectionCommitment>> {
        let owner_id = self.owner_id.clone();
        self.with_store(move |store| store.load_selection_history(owner_id.as_deref()))
            .await
    }

    /// Categorizes the catalog against the owner's history and returns a
    /// planning pass with the default selection.
    pub async fn plan(&self) -> Result<Planning> {
        let sessions = self.sessions().await?;
        let views = planning::categorize(
            &self.catalog,
            &sessions,
            self.owner_id.as_deref(),
            self.now(),
            &self.policy,
        );
        Ok(Planning::new(views))
    }

    /// Freezes the planning selection and appends it to the selection log.
    pub async fn commit(&self, planning: &Planning) -> Result<SelectionCommitment> {
        let commitment = planning.commit(self.owner_id.clone(), self.today());
        let record = commitment.clone();
        self.with_store(move |store| store.append_selection_commitment(&record))
            .await?;
        info!(
            "Committed selection of {} steps for {}",
            commitment.selected_step_ids.len(),
            commitment.committed_date
        );
        Ok(commitment)
    }

    /// Starts a walk-through over a committed selection.
    ///
    /// # Errors
    ///
    /// Returns `RoutineError::StepNotFound` if the commitment names a step
    /// that is not in the catalog.
    pub async fn begin(&self, commitment: &SelectionCommitment) -> Result<Walkthrough> {
        let context = self.walkthrough_context();
        let commitment = commitment.clone();
        task::spawn_blocking(move || Walkthrough::begin(context, &commitment))
            .await
            .map_err(RoutineError::join)?
    }

    /// Per-step performed counts across the owner's sessions.
    pub async fn history_stats(&self) -> Result<Vec<StepStats>> {
        let sessions = self.sessions().await?;
        Ok(history::step_stats(&self.catalog, &sessions))
    }

    /// Most recent time the owner performed `step_id`.
    ///
    /// # Errors
    ///
    /// Returns `RoutineError::StepNotFound` if the step is not in the
    /// catalog.
    pub async fn last_performed(&self, step_id: StepId) -> Result<Option<Timestamp>> {
        if !self.catalog.contains(step_id) {
            return Err(RoutineError::StepNotFound { id: step_id });
        }
        let sessions = self.sessions().await?;
        Ok(planning::last_performed(
            &sessions,
            step_id,
            self.owner_id.as_deref(),
        ))
    }

    /// Stored identity, if any.
    pub async fn identity(&self) -> Result<Option<String>> {
        self.with_store(|store| store.load_identity()).await
    }

    /// Stores `name` as the identity and acts for it from now on.
    ///
    /// # Errors
    ///
    /// Returns `RoutineError::InvalidInput` if `name` is blank.
    pub async fn set_identity(&mut self, name: &str) -> Result<String> {
        let owner = validate_owner(name)?;
        let stored = owner.clone();
        self.with_store(move |store| store.save_identity(&stored))
            .await?;

        if self.owner_id.as_deref() != Some(owner.as_str()) {
            self.returning_user = !self.sessions_for(&owner).await?.is_empty();
            self.owner_id = Some(owner.clone());
        }
        info!("Identity set to {owner}");
        Ok(owner)
    }

    async fn sessions_for(&self, owner: &str) -> Result<Vec<SessionRecord>> {
        let owner = owner.to_string();
        self.with_store(move |store| store.load_sessions(Some(&owner)))
            .await
    }
}
