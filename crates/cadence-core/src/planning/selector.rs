//! Editable step selection for the upcoming walk-through.

use std::collections::{BTreeMap, BTreeSet};

use jiff::civil::Date;
use log::debug;

use crate::models::{PlanningCategory, PlanningStepView, SelectionCommitment, StepId};

/// Initial selection: every Required and Recommended step.
pub fn init_selection(views: &[PlanningStepView]) -> BTreeSet<StepId> {
    views
        .iter()
        .filter(|view| view.category.is_preselected())
        .map(PlanningStepView::id)
        .collect()
}

/// Flips membership of `id`, leaving Required and unknown steps untouched.
pub fn toggle(
    views: &[PlanningStepView],
    id: StepId,
    selection: &BTreeSet<StepId>,
) -> BTreeSet<StepId> {
    let mut next = selection.clone();
    match views.iter().find(|view| view.id() == id) {
        Some(view) if view.category == PlanningCategory::Required => {
            debug!("Ignoring toggle of required step {id}");
        }
        Some(_) => {
            if !next.remove(&id) {
                next.insert(id);
            }
        }
        None => debug!("Ignoring toggle of unknown step {id}"),
    }
    next
}

/// Freezes a selection into an ascending commitment stamped with `today`.
pub fn commit(
    selection: &BTreeSet<StepId>,
    owner_id: Option<String>,
    today: Date,
) -> SelectionCommitment {
    SelectionCommitment::new(owner_id, today, selection.iter().copied())
}

/// One planning pass: the categorized views and the user's current
/// selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Planning {
    views: Vec<PlanningStepView>,
    selection: BTreeSet<StepId>,
}

impl Planning {
    /// Starts a pass with the default selection.
    pub fn new(views: Vec<PlanningStepView>) -> Self {
        let selection = init_selection(&views);
        Self { views, selection }
    }

    /// Categorized steps in catalog order.
    pub fn views(&self) -> &[PlanningStepView] {
        &self.views
    }

    /// Looks up the view of a step.
    pub fn view(&self, id: StepId) -> Option<&PlanningStepView> {
        self.views.iter().find(|view| view.id() == id)
    }

    /// Currently selected ids, ascending.
    pub fn selection(&self) -> &BTreeSet<StepId> {
        &self.selection
    }

    /// Flips a step's membership; returns true when the selection changed.
    pub fn toggle(&mut self, id: StepId) -> bool {
        let next = toggle(&self.views, id, &self.selection);
        let changed = next != self.selection;
        self.selection = next;
        changed
    }

    /// Ensures a step is (or is not) selected; returns true when the
    /// selection changed.
    pub fn set_selected(&mut self, id: StepId, selected: bool) -> bool {
        if self.is_selected(id) == selected {
            return false;
        }
        self.toggle(id)
    }

    /// True when `id` is part of the selection.
    pub fn is_selected(&self, id: StepId) -> bool {
        self.selection.contains(&id)
    }

    /// Number of selected steps.
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Number of steps offered in this pass.
    pub fn total_count(&self) -> usize {
        self.views.len()
    }

    /// Views grouped by category in display order; empty groups are omitted.
    pub fn groups(&self) -> BTreeMap<PlanningCategory, Vec<&PlanningStepView>> {
        let mut groups: BTreeMap<PlanningCategory, Vec<&PlanningStepView>> = BTreeMap::new();
        for view in &self.views {
            groups.entry(view.category).or_default().push(view);
        }
        groups
    }

    /// Freezes the current selection.
    pub fn commit(&self, owner_id: Option<String>, today: Date) -> SelectionCommitment {
        commit(&self.selection, owner_id, today)
    }
}
