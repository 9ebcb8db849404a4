//! Formula records: derivation metadata for one closed-form result.

use crate::advisory::Advisory;
use crate::catalog::{Catalog, CatalogRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type FormulaCatalog = Catalog<FormulaRecord>;

/// Ordered derivation steps plus the references they lean on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationTrail {
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaRecord {
    pub id: String,
    pub label: String,
    /// Symbolic expression, e.g. `alpha_GUT = 1 / b3`.
    pub expression: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Parameter paths consumed.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Parameter paths produced.
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub derivation: DerivationTrail,
    /// Symbol -> meaning.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub terms: BTreeMap<String, String>,
}

impl FormulaRecord {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            expression: expression.into(),
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            derivation: DerivationTrail::default(),
            terms: BTreeMap::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn input(mut self, path: impl Into<String>) -> Self {
        self.inputs.push(path.into());
        self
    }

    pub fn output(mut self, path: impl Into<String>) -> Self {
        self.outputs.push(path.into());
        self
    }

    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.derivation.steps.push(step.into());
        self
    }

    pub fn cite(mut self, reference: impl Into<String>) -> Self {
        self.derivation.references.push(reference.into());
        self
    }

    pub fn term(mut self, symbol: impl Into<String>, meaning: impl Into<String>) -> Self {
        self.terms.insert(symbol.into(), meaning.into());
        self
    }
}

impl CatalogRecord for FormulaRecord {
    fn catalog_id(&self) -> String {
        self.id.clone()
    }

    fn replaced_advisory(id: String) -> Advisory {
        Advisory::FormulaReplaced { id }
    }
}
