use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ledger",
    about = "Ledger: inspect a seeded parameter registry and its provenance",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the registry contents and settings come from.
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Path to a TOML seed document
    #[arg(long, default_value = "ledger.seed.toml")]
    pub seed: String,

    /// Optional registry config TOML (mismatch tolerance, authoritative prefix)
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export parameters, formulas, sections, provenance, and mismatches
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read one parameter entry
    Get {
        /// Parameter path, e.g. `gauge.alpha_gut`
        path: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report structural issues; exits non-zero when any are found
    Validate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the producers that wrote one parameter, in write order
    Provenance {
        /// Parameter path
        path: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
