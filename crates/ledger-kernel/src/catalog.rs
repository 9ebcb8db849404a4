//! Keyed stores for derivation metadata and document content.
//!
//! Catalogs accept overwrites; an id collision raises an advisory and the
//! later record wins.

use crate::advisory::{Advisory, AdvisoryBus};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// A record that can live in a [`Catalog`].
pub trait CatalogRecord: Clone + Serialize + DeserializeOwned {
    /// Catalog key for this record.
    fn catalog_id(&self) -> String;

    /// Advisory raised when a record with the same id is replaced.
    fn replaced_advisory(id: String) -> Advisory;
}

#[derive(Debug, Clone)]
pub struct Catalog<R> {
    records: BTreeMap<String, R>,
}

impl<R> Default for Catalog<R> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<R: CatalogRecord> Catalog<R> {
    /// Store `record`, returning `true` when an existing id was replaced.
    pub fn add(&mut self, record: R, advisories: &mut AdvisoryBus) -> bool {
        let id = record.catalog_id();
        let replaced = self.records.insert(id.clone(), record).is_some();
        if replaced {
            advisories.raise(R::replaced_advisory(id));
        }
        replaced
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.get(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.records.values()
    }

    /// Owned snapshot keyed by id.
    pub fn export(&self) -> BTreeMap<String, R> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
