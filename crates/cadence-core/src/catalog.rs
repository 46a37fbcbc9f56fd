//! The static step catalog.
//!
//! The catalog is an immutable input: it is loaded once, sorted by id and
//! shared read-only by the planning engine and the walk-through controller.

use std::{collections::BTreeSet, path::Path};

use log::debug;

use crate::{
    error::{FileSystemResultExt, Result, RoutineError},
    models::{StepDefinition, StepId},
};

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.json");

/// Ordered, read-only list of step definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    steps: Vec<StepDefinition>,
}

impl Catalog {
    /// Creates a catalog, ordering steps ascending by id.
    ///
    /// # Errors
    ///
    /// Returns `RoutineError::InvalidInput` when two steps share an id.
    pub fn new(mut steps: Vec<StepDefinition>) -> Result<Self> {
        steps.sort_by_key(|step| step.id);

        let mut seen = BTreeSet::new();
        for step in &steps {
            if !seen.insert(step.id) {
                return Err(RoutineError::invalid_input("id")
                    .with_reason(format!("Duplicate step id {} in catalog", step.id)));
            }
        }

        Ok(Self { steps })
    }

    /// Parses a catalog from a JSON array of step definitions.
    pub fn from_json(json: &str) -> Result<Self> {
        let steps: Vec<StepDefinition> = serde_json::from_str(json)?;
        Self::new(steps)
    }

    /// Loads a catalog from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).fs_context(path)?;
        let catalog = Self::from_json(&json)?;
        debug!("Loaded {} steps from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// The catalog bundled with the library.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Looks up a step by id.
    pub fn get(&self, id: StepId) -> Option<&StepDefinition> {
        self.steps
            .binary_search_by_key(&id, |step| step.id)
            .ok()
            .map(|index| &self.steps[index])
    }

    /// Returns true when the catalog contains `id`.
    pub fn contains(&self, id: StepId) -> bool {
        self.get(id).is_some()
    }

    /// Ids of every non-optional step.
    pub fn required_ids(&self) -> BTreeSet<StepId> {
        self.steps
            .iter()
            .filter(|step| step.is_required())
            .map(|step| step.id)
            .collect()
    }

    /// Steps in ascending id order.
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Iterates over the steps in ascending id order.
    pub fn iter(&self) -> std::slice::Iter<'_, StepDefinition> {
        self.steps.iter()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the catalog has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a StepDefinition;
    type IntoIter = std::slice::Iter<'a, StepDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: StepId, is_optional: bool) -> StepDefinition {
        StepDefinition {
            id,
            title: format!("Step {id}"),
            description: String::new(),
            is_optional,
            actions: vec![],
            products: vec![],
            preferred_product: None,
            timer_duration_seconds: None,
            notes: None,
        }
    }

    #[test]
    fn test_catalog_sorts_by_id() {
        let catalog = Catalog::new(vec![step(3, true), step(1, false), step(2, true)])
            .expect("Failed to build catalog");
        let ids: Vec<StepId> = catalog.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_catalog_rejects_duplicate_ids() {
        let err = Catalog::new(vec![step(1, false), step(1, true)]).unwrap_err();
        assert!(matches!(err, RoutineError::InvalidInput { .. }));
    }

    #[test]
    fn test_catalog_lookup_and_required_ids() {
        let catalog = Catalog::new(vec![step(1, false), step(2, true), step(5, false)])
            .expect("Failed to build catalog");
        assert_eq!(catalog.get(2).map(|s| s.id), Some(2));
        assert!(catalog.get(4).is_none());
        assert_eq!(catalog.required_ids().into_iter().collect::<Vec<_>>(), vec![1, 5]);
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().expect("Builtin catalog should parse");
        assert!(!catalog.is_empty());
        assert!(!catalog.required_ids().is_empty());
        assert!(catalog.iter().any(StepDefinition::has_timer));
    }

    #[test]
    fn test_from_json_defaults_optional_fields() {
        let catalog = Catalog::from_json(r#"[{"id": 7, "title": "Rinse"}]"#)
            .expect("Failed to parse catalog");
        let rinse = catalog.get(7).expect("Step should exist");
        assert!(rinse.is_required());
        assert!(rinse.actions.is_empty());
        assert_eq!(rinse.timer_duration_seconds, None);
    }
}
