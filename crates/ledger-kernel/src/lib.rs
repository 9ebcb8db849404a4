//! # Ledger Kernel
//!
//! A shared registry for derivation pipelines: named parameters with
//! provenance, formula metadata, and document sections.
//!
//! The kernel does not derive anything. It records what derivation units
//! write, who wrote it, and where two writers disagreed. Values marked
//! AUTHORITATIVE are protected from overwrite by non-authoritative sources.
//!
//! ## Architecture
//!
//! ```text
//! Registry              ← Facade: one lock over everything below
//!     │
//! EntryStore            ← Parameter entries + the overwrite rule
//!     ├── ProvenanceTracker   ← path → ordered producer ids
//!     └── MismatchLog         ← recorded disagreements
//!     │
//! FormulaCatalog        ← id → FormulaRecord
//! SectionCatalog        ← id[.sub] → SectionRecord
//!     │
//! AdvisoryBus           ← tracing + subscriber fan-out for non-fatal events
//! ```

pub mod advisory;
pub mod catalog;
pub mod config;
pub mod derivation;
pub mod entry;
pub mod error;
pub mod formula;
pub mod global;
pub mod mismatch;
pub mod provenance;
pub mod registry;
pub mod section;
pub mod seed;
pub mod status;
pub mod value;

pub use advisory::{Advisory, SUBSCRIBER_QUEUE_CAPACITY};
pub use catalog::{Catalog, CatalogRecord};
pub use config::{DEFAULT_AUTHORITATIVE_PREFIX, DEFAULT_MISMATCH_TOLERANCE, RegistryConfig};
pub use derivation::{
    Derivation, FnDerivation, UnitOutcome, derivation, run_parallel, run_sequential,
};
pub use entry::{Metadata, ParameterEntry, ParameterWrite, Reference};
pub use error::RegistryError;
pub use formula::{DerivationTrail, FormulaRecord};
pub use global::{init_instance, instance, reset_instance};
pub use mismatch::{Disagreement, MismatchRecord};
pub use registry::{REGISTRY_EXPORT_KIND, REGISTRY_EXPORT_SCHEMA, Registry, RegistrySummary};
pub use section::{CalloutKind, ContentBlock, SectionRecord};
pub use seed::{SeedDocument, SeedParameter, SeedReport};
pub use status::ParamStatus;
pub use value::ParamValue;
