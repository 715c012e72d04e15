//! The set of catalogue entries the user picked.

use serde::Serialize;

use crate::catalogue::CatalogueEntry;

/// Selected ids in the order they were added; generation iterates this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns `true` if it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|existing| existing == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Add `id` unless it is already selected. Returns `true` if it was added.
    pub fn add(&mut self, id: &str) -> bool {
        if self.has(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Replace the selection with every catalogue id.
    pub fn select_all(&mut self, catalogue: &[CatalogueEntry]) {
        self.ids = catalogue.iter().map(|entry| entry.id.clone()).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn has(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Select exactly `target` when it is catalogued; otherwise leave the
    /// selection untouched.
    pub fn seed(&mut self, target: Option<&str>, catalogue: &[CatalogueEntry]) -> bool {
        let Some(target) = target else {
            return false;
        };
        match catalogue.iter().find(|entry| entry.id == target) {
            Some(entry) => {
                self.ids = vec![entry.id.clone()];
                true
            }
            None => false,
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
