use crate::cli::SourceArgs;
use crate::support::{load_registry_or_exit, print_json_or_exit};
use serde_json::json;

pub fn run(path: String, source: SourceArgs, json_output: bool) {
    let (registry, _) = load_registry_or_exit(&source);

    if !registry.has(&path) {
        eprintln!("error: parameter not found: {path}");
        std::process::exit(1);
    }
    let sources = registry.provenance(&path);

    if json_output {
        print_json_or_exit(&json!({ "path": path, "sources": sources }), "provenance");
        return;
    }

    println!("ledger provenance");
    println!("  Path: {path}");
    for (idx, source) in sources.iter().enumerate() {
        println!("  {}. {source}", idx + 1);
    }
}
