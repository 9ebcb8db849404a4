//! Parameter entries and the store that guards them.
//!
//! The store owns the overwrite rule: an AUTHORITATIVE entry only yields to
//! a writer whose source carries the authoritative marker. Every accepted
//! write leaves one provenance record, and a materially different rewrite
//! leaves one mismatch record.

use crate::advisory::AdvisoryBus;
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::mismatch::{self, MismatchLog, MismatchRecord};
use crate::provenance::ProvenanceTracker;
use crate::status::ParamStatus;
use crate::value::ParamValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque auxiliary notes attached to an entry (units, derivation text, ...).
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// One named, typed value in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub path: String,
    pub value: ParamValue,
    pub source: String,
    pub status: ParamStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,

    // ── External comparison data ──
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_value: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_uncertainty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_source: Option<String>,

    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

/// A reference value supplied alongside a write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub value: ParamValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A pending write: the required fields plus optional extras.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterWrite {
    pub path: String,
    pub value: ParamValue,
    pub source: String,
    pub status: ParamStatus,
    pub uncertainty: Option<f64>,
    pub metadata: Metadata,
    pub reference: Option<Reference>,
}

impl ParameterWrite {
    pub fn new(
        path: impl Into<String>,
        value: impl Into<ParamValue>,
        source: impl Into<String>,
        status: ParamStatus,
    ) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
            source: source.into(),
            status,
            uncertainty: None,
            metadata: Metadata::new(),
            reference: None,
        }
    }

    pub fn uncertainty(mut self, uncertainty: f64) -> Self {
        self.uncertainty = Some(uncertainty);
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }
}

/// Side-effect sinks a write may append to.
pub struct WriteJournal<'a> {
    pub provenance: &'a mut ProvenanceTracker,
    pub mismatches: &'a mut MismatchLog,
    pub advisories: &'a mut AdvisoryBus,
}

#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: BTreeMap<String, ParameterEntry>,
}

impl EntryStore {
    pub fn has(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Result<ParamValue, RegistryError> {
        self.entries
            .get(path)
            .map(|entry| entry.value.clone())
            .ok_or_else(|| RegistryError::not_found(path))
    }

    pub fn entry(&self, path: &str) -> Option<&ParameterEntry> {
        self.entries.get(path)
    }

    /// Apply `write`, enforcing the authoritative-overwrite rule.
    ///
    /// On `ImmutableOverwrite` nothing is mutated and nothing is journaled.
    pub fn write(
        &mut self,
        write: ParameterWrite,
        config: &RegistryConfig,
        journal: WriteJournal<'_>,
    ) -> Result<(), RegistryError> {
        let now = Utc::now();
        let ParameterWrite {
            path,
            value,
            source,
            status,
            uncertainty,
            metadata,
            reference,
        } = write;

        let Some(existing) = self.entries.get_mut(&path) else {
            tracing::debug!(%path, %source, %status, "parameter created");
            journal.provenance.record(&path, &source);
            let (reference_value, reference_uncertainty, reference_source) = split(reference);
            self.entries.insert(
                path.clone(),
                ParameterEntry {
                    path,
                    value,
                    source,
                    status,
                    uncertainty,
                    reference_value,
                    reference_uncertainty,
                    reference_source,
                    created_at: now,
                    metadata,
                },
            );
            return Ok(());
        };

        if existing.status.is_write_protected() && !config.is_authoritative_source(&source) {
            return Err(RegistryError::ImmutableOverwrite {
                path,
                existing_source: existing.source.clone(),
                attempted_source: source,
            });
        }

        if let Some(hit) = mismatch::detect(&existing.value, &value, config.mismatch_tolerance) {
            journal.mismatches.append(
                MismatchRecord {
                    path: path.clone(),
                    previous_value: existing.value.clone(),
                    previous_source: existing.source.clone(),
                    new_value: value.clone(),
                    new_source: source.clone(),
                    relative_difference: hit.relative_difference(),
                    recorded_at: now,
                },
                journal.advisories,
            );
        }

        tracing::debug!(%path, %source, %status, "parameter updated");
        journal.provenance.record(&path, &source);
        existing.value = value;
        existing.source = source;
        existing.status = status;
        existing.uncertainty = uncertainty;
        existing.metadata = metadata;
        existing.created_at = now;
        if reference.is_some() {
            let (reference_value, reference_uncertainty, reference_source) = split(reference);
            existing.reference_value = reference_value;
            existing.reference_uncertainty = reference_uncertainty;
            existing.reference_source = reference_source;
        }
        Ok(())
    }

    /// Report structural problems; never fails.
    pub fn validate(&self, provenance: &ProvenanceTracker) -> Vec<String> {
        self.entries
            .values()
            .filter(|entry| entry.status == ParamStatus::Derived)
            .filter(|entry| !provenance.is_recorded(&entry.path))
            .map(|entry| {
                format!(
                    "derived parameter {} has no provenance (source: {})",
                    entry.path, entry.source
                )
            })
            .collect()
    }

    /// All paths in sorted order.
    pub fn paths(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Paths under a hierarchical prefix such as `"gauge."`.
    pub fn paths_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .range(prefix.to_string()..)
            .take_while(|(path, _)| path.starts_with(prefix))
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ParameterEntry> {
        self.entries.values()
    }

    /// Owned snapshot of every entry.
    pub fn export(&self) -> BTreeMap<String, ParameterEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn split(reference: Option<Reference>) -> (Option<ParamValue>, Option<f64>, Option<String>) {
    match reference {
        Some(Reference {
            value,
            uncertainty,
            source,
        }) => (Some(value), uncertainty, source),
        None => (None, None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Harness {
        store: EntryStore,
        provenance: ProvenanceTracker,
        mismatches: MismatchLog,
        advisories: AdvisoryBus,
        config: RegistryConfig,
    }

    impl Harness {
        fn write(&mut self, write: ParameterWrite) -> Result<(), RegistryError> {
            self.store.write(
                write,
                &self.config,
                WriteJournal {
                    provenance: &mut self.provenance,
                    mismatches: &mut self.mismatches,
                    advisories: &mut self.advisories,
                },
            )
        }
    }

    fn entry(path: &str, status: ParamStatus) -> ParameterEntry {
        ParameterEntry {
            path: path.to_string(),
            value: ParamValue::Number(1.0),
            source: "out_of_band".to_string(),
            status,
            uncertainty: None,
            reference_value: None,
            reference_uncertainty: None,
            reference_source: None,
            created_at: Utc::now(),
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn blocked_overwrite_leaves_no_trace() {
        let mut h = Harness::default();
        h.write(ParameterWrite::new(
            "ckm.theta_c",
            0.227,
            "AUTHORITATIVE:PDG",
            ParamStatus::Authoritative,
        ))
        .expect("first write succeeds");

        let err = h
            .write(ParameterWrite::new(
                "ckm.theta_c",
                0.5,
                "flavor_mod",
                ParamStatus::Derived,
            ))
            .expect_err("non-authoritative overwrite must fail");
        assert!(matches!(
            err,
            RegistryError::ImmutableOverwrite { ref path, ref existing_source, ref attempted_source }
                if path == "ckm.theta_c"
                    && existing_source == "AUTHORITATIVE:PDG"
                    && attempted_source == "flavor_mod"
        ));

        let kept = h.store.entry("ckm.theta_c").expect("entry kept");
        assert_eq!(kept.value, ParamValue::Number(0.227));
        assert_eq!(kept.status, ParamStatus::Authoritative);
        assert_eq!(h.provenance.sources("ckm.theta_c").map(<[String]>::len), Some(1));
        assert!(h.mismatches.is_empty());
    }

    #[test]
    fn overwrite_replaces_extras_but_keeps_reference() {
        let mut h = Harness::default();
        h.write(
            ParameterWrite::new("mass.top", 172.5, "AUTHORITATIVE:PDG", ParamStatus::Derived)
                .uncertainty(0.3)
                .meta("units", "GeV")
                .reference(Reference {
                    value: ParamValue::Number(172.69),
                    uncertainty: Some(0.3),
                    source: Some("PDG 2024".to_string()),
                }),
        )
        .expect("initial write");
        h.write(ParameterWrite::new(
            "mass.top",
            172.6,
            "yukawa_mod",
            ParamStatus::Predicted,
        ))
        .expect("overwrite");

        let stored = h.store.entry("mass.top").expect("entry");
        assert_eq!(stored.source, "yukawa_mod");
        assert_eq!(stored.status, ParamStatus::Predicted);
        assert_eq!(stored.uncertainty, None);
        assert!(stored.metadata.is_empty());
        assert_eq!(stored.reference_value, Some(ParamValue::Number(172.69)));
        assert_eq!(stored.reference_source.as_deref(), Some("PDG 2024"));
    }

    #[test]
    fn validate_flags_derived_entries_without_provenance() {
        let mut h = Harness::default();
        h.store
            .entries
            .insert("orphan".to_string(), entry("orphan", ParamStatus::Derived));
        h.store
            .entries
            .insert("seeded".to_string(), entry("seeded", ParamStatus::Geometric));
        h.write(ParameterWrite::new("ok", 2.0, "mod", ParamStatus::Derived))
            .expect("write");

        let issues = h.store.validate(&h.provenance);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("orphan"), "unexpected issue: {}", issues[0]);
    }

    #[test]
    fn prefix_lookup_is_hierarchical() {
        let mut h = Harness::default();
        for path in ["gauge.alpha_gut", "gauge.m_gut", "gaugeless", "topology.b3"] {
            h.write(ParameterWrite::new(path, 1.0, "mod", ParamStatus::Heuristic))
                .expect("write");
        }
        assert_eq!(
            h.store.paths_with_prefix("gauge."),
            vec!["gauge.alpha_gut".to_string(), "gauge.m_gut".to_string()]
        );
        assert_eq!(h.store.paths().len(), 4);
    }

    #[test]
    fn get_missing_path_is_not_found() {
        let h = Harness::default();
        let err = h.store.get("nope").expect_err("missing path");
        assert_eq!(
            err,
            RegistryError::NotFound {
                path: "nope".to_string()
            }
        );
    }
}
