//! TOML seed documents: initial parameters, formulas, and sections.
//!
//! ```toml
//! [[parameter]]
//! path = "topology.b3"
//! value = 24
//! source = "AUTHORITATIVE:TCS187"
//! status = "GEOMETRIC"
//!
//! [[formula]]
//! id = "alpha-gut"
//! label = "Unified coupling"
//! expression = "alpha_GUT = 1 / b3"
//! ```
//!
//! Entries are applied in document order through the normal write path,
//! so seeds obey the same overwrite and mismatch rules as derivation units.

use crate::entry::{Metadata, ParameterWrite, Reference};
use crate::error::RegistryError;
use crate::formula::FormulaRecord;
use crate::registry::Registry;
use crate::section::SectionRecord;
use crate::status::ParamStatus;
use crate::value::ParamValue;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedDocument {
    #[serde(default, rename = "parameter")]
    pub parameters: Vec<SeedParameter>,
    #[serde(default, rename = "formula")]
    pub formulas: Vec<FormulaRecord>,
    #[serde(default, rename = "section")]
    pub sections: Vec<SectionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedParameter {
    pub path: String,
    pub value: ParamValue,
    pub source: String,
    pub status: ParamStatus,
    #[serde(default)]
    pub uncertainty: Option<f64>,
    #[serde(default)]
    pub reference_value: Option<ParamValue>,
    #[serde(default)]
    pub reference_uncertainty: Option<f64>,
    #[serde(default)]
    pub reference_source: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl SeedParameter {
    fn into_write(self) -> ParameterWrite {
        let mut write = ParameterWrite::new(self.path, self.value, self.source, self.status)
            .metadata(self.metadata);
        write.uncertainty = self.uncertainty;
        if let Some(value) = self.reference_value {
            write = write.reference(Reference {
                value,
                uncertainty: self.reference_uncertainty,
                source: self.reference_source,
            });
        }
        write
    }
}

/// What a seed application wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub parameters: usize,
    pub formulas: usize,
    pub sections: usize,
    pub replaced_records: usize,
}

impl SeedDocument {
    pub fn from_toml_str(text: &str) -> Result<Self, RegistryError> {
        toml::from_str(text).map_err(|e| RegistryError::Seed(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| RegistryError::Seed(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Write every record into `registry`, stopping at the first blocked write
    /// or section key conflict.
    ///
    /// Writes applied before the failure stay applied.
    pub fn apply(self, registry: &Registry) -> Result<SeedReport, RegistryError> {
        let mut report = SeedReport::default();
        for parameter in self.parameters {
            registry.write(parameter.into_write())?;
            report.parameters += 1;
        }
        for formula in self.formulas {
            if registry.add_formula(formula) {
                report.replaced_records += 1;
            }
            report.formulas += 1;
        }
        for section in self.sections {
            if registry.add_section(section)? {
                report.replaced_records += 1;
            }
            report.sections += 1;
        }
        Ok(report)
    }
}
