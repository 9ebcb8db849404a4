use crate::cli::SourceArgs;
use crate::support::{load_registry_or_exit, print_json_or_exit};

pub fn run(path: String, source: SourceArgs, json_output: bool) {
    let (registry, _) = load_registry_or_exit(&source);

    let Some(entry) = registry.get_entry(&path) else {
        eprintln!("error: parameter not found: {path}");
        std::process::exit(1);
    };

    if json_output {
        print_json_or_exit(&entry, "parameter");
        return;
    }

    println!("ledger get");
    println!("  Path: {}", entry.path);
    println!("  Value: {}", entry.value);
    if let Some(uncertainty) = entry.uncertainty {
        println!("  Uncertainty: {uncertainty}");
    }
    println!("  Status: {}", entry.status);
    println!("  Source: {}", entry.source);
    if let Some(reference) = &entry.reference_value {
        let by = entry.reference_source.as_deref().unwrap_or("unknown");
        println!("  Reference: {reference} ({by})");
    }
}
