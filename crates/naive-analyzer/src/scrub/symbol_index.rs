use dashmap::DashMap;

use crate::scrub::types::Occurrence;

/// Mapping from symbol name to the occurrences discovered for it.
///
/// Mutated only by the scrubber, read by the searcher. Concurrent
/// per-file appends during the scan fan-out land on independent map
/// entries, which `DashMap` makes safe without an external lock.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    map: DashMap<String, Vec<Occurrence>>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    pub fn insert(
        &self,
        name: String,
        occurrence: Occurrence,
    ) {
        self.map.entry(name).or_default().push(occurrence);
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Vec<Occurrence> {
        self.map.get(name).map(|v| v.clone()).unwrap_or_default()
    }

    /// Drop every entry. Called at the `idle` transition of a scrub
    /// cycle; a new cycle never merges with a prior index.
    pub fn clear(&self) {
        self.map.clear();
    }

    pub fn symbol_count(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn symbol_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.map.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }
}
