//! The registry facade.
//!
//! One [`Registry`] owns the entry store, provenance tracker, mismatch log,
//! both catalogs, and the advisory bus behind a single lock. Derivation
//! units receive `&Registry`; every operation takes the lock for its whole
//! duration, so readers observe complete pre- or post-write states.

use crate::advisory::{Advisory, AdvisoryBus};
use crate::config::RegistryConfig;
use crate::entry::{EntryStore, ParameterEntry, ParameterWrite, WriteJournal};
use crate::error::RegistryError;
use crate::formula::{FormulaCatalog, FormulaRecord};
use crate::mismatch::{MismatchLog, MismatchRecord};
use crate::provenance::ProvenanceTracker;
use crate::section::{SectionCatalog, SectionRecord};
use crate::status::ParamStatus;
use crate::value::ParamValue;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::mpsc::Receiver;

pub const REGISTRY_EXPORT_KIND: &str = "ledger.registry_export.v1";
pub const REGISTRY_EXPORT_SCHEMA: u32 = 1;

#[derive(Debug, Default)]
struct RegistryState {
    entries: EntryStore,
    provenance: ProvenanceTracker,
    mismatches: MismatchLog,
    formulas: FormulaCatalog,
    sections: SectionCatalog,
    advisories: AdvisoryBus,
}

impl RegistryState {
    fn clear(&mut self) {
        self.entries.clear();
        self.provenance.clear();
        self.mismatches.clear();
        self.formulas.clear();
        self.sections.clear();
    }
}

/// Aggregate counts for diagnostics output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrySummary {
    pub parameters: usize,
    pub by_status: BTreeMap<ParamStatus, usize>,
    pub formulas: usize,
    pub sections: usize,
    pub mismatches: usize,
}

#[derive(Debug, Default)]
pub struct Registry {
    config: RegistryConfig,
    state: Mutex<RegistryState>,
}

impl Registry {
    /// Build a registry over `config`, rejecting out-of-range settings.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        Ok(Self {
            config: config.validated()?,
            state: Mutex::new(RegistryState::default()),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ── Parameters ──

    pub fn has(&self, path: &str) -> bool {
        self.state.lock().entries.has(path)
    }

    pub fn get(&self, path: &str) -> Result<ParamValue, RegistryError> {
        self.state.lock().entries.get(path)
    }

    /// Numeric convenience read; non-numeric values are reported as absent.
    pub fn get_f64(&self, path: &str) -> Result<Option<f64>, RegistryError> {
        self.get(path).map(|value| value.as_f64())
    }

    pub fn get_entry(&self, path: &str) -> Option<ParameterEntry> {
        self.state.lock().entries.entry(path).cloned()
    }

    pub fn set(
        &self,
        path: impl Into<String>,
        value: impl Into<ParamValue>,
        source: impl Into<String>,
        status: ParamStatus,
    ) -> Result<(), RegistryError> {
        self.write(ParameterWrite::new(path, value, source, status))
    }

    pub fn write(&self, write: ParameterWrite) -> Result<(), RegistryError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.entries.write(
            write,
            &self.config,
            WriteJournal {
                provenance: &mut state.provenance,
                mismatches: &mut state.mismatches,
                advisories: &mut state.advisories,
            },
        )
    }

    pub fn paths(&self) -> Vec<String> {
        self.state.lock().entries.paths()
    }

    pub fn paths_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.state.lock().entries.paths_with_prefix(prefix)
    }

    /// Producers that have written `path`, in write order.
    pub fn provenance(&self, path: &str) -> Vec<String> {
        self.state
            .lock()
            .provenance
            .sources(path)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    // ── Catalogs ──

    /// Returns `true` when an existing formula with the same id was replaced.
    pub fn add_formula(&self, record: FormulaRecord) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.formulas.add(record, &mut state.advisories)
    }

    pub fn get_formula(&self, id: &str) -> Option<FormulaRecord> {
        self.state.lock().formulas.get(id).cloned()
    }

    pub fn has_formula(&self, id: &str) -> bool {
        self.state.lock().formulas.has(id)
    }

    /// Returns `true` when an existing section with the same key was replaced.
    ///
    /// A section whose key matches an existing one under a different
    /// id/sub-id split is rejected with `SectionKeyConflict`.
    pub fn add_section(&self, record: SectionRecord) -> Result<bool, RegistryError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let key = record.key();
        if let Some(existing) = state.sections.get(&key)
            && record.key_conflicts_with(existing)
        {
            return Err(RegistryError::SectionKeyConflict { key });
        }
        Ok(state.sections.add(record, &mut state.advisories))
    }

    pub fn get_section(&self, key: &str) -> Option<SectionRecord> {
        self.state.lock().sections.get(key).cloned()
    }

    pub fn has_section(&self, key: &str) -> bool {
        self.state.lock().sections.has(key)
    }

    // ── Exports ──

    pub fn export_parameters(&self) -> BTreeMap<String, ParameterEntry> {
        self.state.lock().entries.export()
    }

    pub fn export_formulas(&self) -> BTreeMap<String, FormulaRecord> {
        self.state.lock().formulas.export()
    }

    pub fn export_sections(&self) -> BTreeMap<String, SectionRecord> {
        self.state.lock().sections.export()
    }

    pub fn export_provenance(&self) -> BTreeMap<String, Vec<String>> {
        self.state.lock().provenance.export()
    }

    /// Every export in one JSON document, taken under a single lock.
    pub fn export_json(&self) -> Value {
        let state = self.state.lock();
        json!({
            "schema": REGISTRY_EXPORT_SCHEMA,
            "registryKind": REGISTRY_EXPORT_KIND,
            "parameters": state.entries.export(),
            "formulas": state.formulas.export(),
            "sections": state.sections.export(),
            "provenance": state.provenance.export(),
            "mismatches": state.mismatches.all(),
            "contentDigest": content_digest(&state),
        })
    }

    // ── Diagnostics ──

    pub fn mismatches(&self) -> Vec<MismatchRecord> {
        self.state.lock().mismatches.all()
    }

    /// Structural issues across the registry; never fails.
    pub fn validate(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut issues = state.entries.validate(&state.provenance);
        for section in state.sections.records() {
            for formula_id in section.cited_formulas() {
                if !state.formulas.has(formula_id) {
                    issues.push(format!(
                        "section {} cites unknown formula {formula_id}",
                        section.key()
                    ));
                }
            }
        }
        issues
    }

    /// SHA-256 over parameter values, formulas, and sections.
    ///
    /// Write timestamps and provenance are excluded, so two registries fed
    /// the same content in the same final state share a digest.
    pub fn content_digest(&self) -> String {
        content_digest(&self.state.lock())
    }

    pub fn summary(&self) -> RegistrySummary {
        let state = self.state.lock();
        let mut by_status = BTreeMap::new();
        for entry in state.entries.entries() {
            *by_status.entry(entry.status).or_insert(0) += 1;
        }
        RegistrySummary {
            parameters: state.entries.len(),
            by_status,
            formulas: state.formulas.len(),
            sections: state.sections.len(),
            mismatches: state.mismatches.len(),
        }
    }

    /// Receive every advisory raised from now on.
    ///
    /// The queue holds [`SUBSCRIBER_QUEUE_CAPACITY`] advisories; while it is
    /// full, new advisories for this subscriber are dropped. The mismatch log
    /// keeps the complete history regardless.
    ///
    /// [`SUBSCRIBER_QUEUE_CAPACITY`]: crate::advisory::SUBSCRIBER_QUEUE_CAPACITY
    pub fn subscribe(&self) -> Receiver<Advisory> {
        self.state.lock().advisories.subscribe()
    }

    // ── Lifecycle ──

    /// Clear every entry, catalog, and log in one step.
    ///
    /// Subscribers stay attached.
    pub fn reset(&self) {
        self.state.lock().clear();
        tracing::info!("registry reset");
    }
}

#[derive(Serialize)]
struct DigestView<'a> {
    parameters: BTreeMap<&'a str, DigestEntry<'a>>,
    formulas: BTreeMap<String, FormulaRecord>,
    sections: BTreeMap<String, SectionRecord>,
}

#[derive(Serialize)]
struct DigestEntry<'a> {
    value: &'a ParamValue,
    source: &'a str,
    status: ParamStatus,
}

fn content_digest(state: &RegistryState) -> String {
    let view = DigestView {
        parameters: state
            .entries
            .entries()
            .map(|entry| {
                (
                    entry.path.as_str(),
                    DigestEntry {
                        value: &entry.value,
                        source: &entry.source,
                        status: entry.status,
                    },
                )
            })
            .collect(),
        formulas: state.formulas.export(),
        sections: state.sections.export(),
    };
    // Serializing plain maps of owned data cannot fail.
    let canonical = serde_json::to_vec(&view).unwrap_or_default();
    let hash = Sha256::digest(&canonical);
    format!("{hash:x}")
}
