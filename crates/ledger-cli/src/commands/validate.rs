use crate::cli::SourceArgs;
use crate::support::{load_registry_or_exit, print_json_or_exit};
use serde_json::json;

pub fn run(source: SourceArgs, json_output: bool) {
    let (registry, _) = load_registry_or_exit(&source);
    let issues = registry.validate();
    let mismatches = registry.mismatches();

    if json_output {
        let payload = json!({
            "action": "validate",
            "result": if issues.is_empty() { "accepted" } else { "rejected" },
            "issues": issues,
            "mismatches": mismatches,
        });
        print_json_or_exit(&payload, "validation");
    } else {
        println!("ledger validate");
        println!("  Issues: {}", issues.len());
        for issue in &issues {
            println!("    - {issue}");
        }
        println!("  Mismatches: {}", mismatches.len());
        for record in &mismatches {
            println!(
                "    - {}: {} ({}) -> {} ({})",
                record.path,
                record.previous_value,
                record.previous_source,
                record.new_value,
                record.new_source
            );
        }
    }

    if !issues.is_empty() {
        std::process::exit(1);
    }
}
