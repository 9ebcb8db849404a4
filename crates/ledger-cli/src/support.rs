use crate::cli::SourceArgs;
use ledger_kernel::{Registry, RegistryConfig, SeedDocument, SeedReport, init_instance};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Install the process-wide registry and apply the seed document to it.
pub fn load_registry_or_exit(source: &SourceArgs) -> (&'static Registry, SeedReport) {
    let config = match &source.config {
        Some(path) => RegistryConfig::load(path).unwrap_or_else(|e| {
            eprintln!("error: failed to load config {path}: {e}");
            std::process::exit(1);
        }),
        None => RegistryConfig::default(),
    };

    let seed_path = PathBuf::from(&source.seed);
    if !seed_path.exists() {
        eprintln!("error: seed file not found: {}", seed_path.display());
        std::process::exit(1);
    }
    let seed = SeedDocument::load(&seed_path).unwrap_or_else(|e| {
        eprintln!("error: failed to load {}: {e}", seed_path.display());
        std::process::exit(1);
    });

    let registry = init_instance(config).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(2);
    });
    let report = seed.apply(registry).unwrap_or_else(|e| {
        eprintln!("error: failed to apply {}: {e}", seed_path.display());
        std::process::exit(1);
    });
    tracing::debug!(
        parameters = report.parameters,
        formulas = report.formulas,
        sections = report.sections,
        "seed applied"
    );
    (registry, report)
}

pub fn print_json_or_exit(payload: &impl Serialize, what: &str) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|err| {
        eprintln!("error: failed to render {what} json: {err}");
        std::process::exit(2);
    });
    println!("{rendered}");
}
