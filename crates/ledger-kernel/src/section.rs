//! Section records: document content assembled by derivation units.

use crate::advisory::Advisory;
use crate::catalog::{Catalog, CatalogRecord};
use serde::{Deserialize, Serialize};

pub type SectionCatalog = Catalog<SectionRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalloutKind {
    Note,
    Warning,
    Insight,
    Caveat,
}

/// One block of section content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    FormulaRef {
        formula_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    List {
        items: Vec<String>,
        #[serde(default)]
        ordered: bool,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Callout {
        kind: CalloutKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_id: Option<String>,
    pub title: String,
    #[serde(rename = "abstract", default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formula_refs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub param_refs: Vec<String>,
}

impl SectionRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sub_id: None,
            title: title.into(),
            summary: String::new(),
            content: Vec::new(),
            formula_refs: Vec::new(),
            param_refs: Vec::new(),
        }
    }

    pub fn sub_id(mut self, sub_id: impl Into<String>) -> Self {
        self.sub_id = Some(sub_id.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn block(mut self, block: ContentBlock) -> Self {
        self.content.push(block);
        self
    }

    pub fn cites_formula(mut self, formula_id: impl Into<String>) -> Self {
        self.formula_refs.push(formula_id.into());
        self
    }

    pub fn cites_param(mut self, path: impl Into<String>) -> Self {
        self.param_refs.push(path.into());
        self
    }

    /// `id`, or `id.sub_id` for subsections.
    pub fn key(&self) -> String {
        match &self.sub_id {
            Some(sub) => format!("{}.{sub}", self.id),
            None => self.id.clone(),
        }
    }

    /// Whether `other` has the same key but a different id/sub-id split.
    pub fn key_conflicts_with(&self, other: &SectionRecord) -> bool {
        self.key() == other.key() && (self.id != other.id || self.sub_id != other.sub_id)
    }

    /// Formula ids cited either in `formula_refs` or inline blocks.
    pub fn cited_formulas(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.formula_refs.iter().map(String::as_str).collect();
        for block in &self.content {
            if let ContentBlock::FormulaRef { formula_id, .. } = block
                && !ids.contains(&formula_id.as_str())
            {
                ids.push(formula_id);
            }
        }
        ids
    }
}

impl CatalogRecord for SectionRecord {
    fn catalog_id(&self) -> String {
        self.key()
    }

    fn replaced_advisory(id: String) -> Advisory {
        Advisory::SectionReplaced { id }
    }
}
