//! Append-only producer history per parameter path.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct ProvenanceTracker {
    history: BTreeMap<String, Vec<String>>,
}

impl ProvenanceTracker {
    /// Append `source` to the history for `path`.
    pub fn record(&mut self, path: &str, source: &str) {
        match self.history.get_mut(path) {
            Some(sources) => sources.push(source.to_string()),
            None => {
                self.history
                    .insert(path.to_string(), vec![source.to_string()]);
            }
        }
    }

    /// Producers for `path` in write order.
    pub fn sources(&self, path: &str) -> Option<&[String]> {
        self.history.get(path).map(Vec::as_slice)
    }

    /// Whether at least one producer has been recorded for `path`.
    pub fn is_recorded(&self, path: &str) -> bool {
        self.history
            .get(path)
            .is_some_and(|sources| !sources.is_empty())
    }

    /// Owned snapshot of the whole history.
    pub fn export(&self) -> BTreeMap<String, Vec<String>> {
        self.history.clone()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}
