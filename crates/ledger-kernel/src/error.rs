//! Error types for registry operations.

/// Errors arising from registry reads, blocked writes, or invalid setup.
///
/// Mismatches and catalog id collisions are not errors; they surface as
/// [`Advisory`](crate::advisory::Advisory) values instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// No parameter entry exists for the requested path.
    #[error("parameter not found: {path}")]
    NotFound { path: String },

    /// A non-authoritative source tried to replace an AUTHORITATIVE entry.
    #[error(
        "cannot overwrite authoritative parameter {path} (held by {existing_source}) from {attempted_source}"
    )]
    ImmutableOverwrite {
        path: String,
        existing_source: String,
        attempted_source: String,
    },

    /// Two sections split the same catalog key differently, such as id
    /// `3.2` against id `3` with sub-id `2`.
    #[error(
        "section key {key} is already held by a section with a different id/sub-id split"
    )]
    SectionKeyConflict { key: String },

    /// A status string outside the closed status set.
    #[error("invalid parameter status: {0}")]
    InvalidStatus(String),

    /// The process-wide instance was configured after first use.
    #[error("registry instance already initialized")]
    AlreadyInitialized,

    /// Registry configuration could not be loaded or is out of range.
    #[error("config error: {0}")]
    Config(String),

    /// A seed document could not be parsed or applied.
    #[error("seed error: {0}")]
    Seed(String),

    /// A derivation unit failed; carries the unit id.
    #[error("derivation {unit} failed: {source}")]
    Derivation {
        unit: String,
        #[source]
        source: Box<RegistryError>,
    },

    /// A derivation unit panicked while running on a worker thread.
    #[error("derivation {unit} panicked")]
    Panicked { unit: String },
}

impl RegistryError {
    pub(crate) fn not_found(path: &str) -> Self {
        Self::NotFound {
            path: path.to_string(),
        }
    }
}
