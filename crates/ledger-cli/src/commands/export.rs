use crate::cli::SourceArgs;
use crate::support::{load_registry_or_exit, print_json_or_exit};
use ledger_kernel::ParamStatus;

pub fn run(source: SourceArgs, json_output: bool) {
    let (registry, report) = load_registry_or_exit(&source);

    if json_output {
        print_json_or_exit(&registry.export_json(), "registry export");
        return;
    }

    let summary = registry.summary();
    println!("ledger export");
    println!("  Seed: {}", source.seed);
    if report.replaced_records > 0 {
        println!("  Replaced catalog records: {}", report.replaced_records);
    }
    println!("  Parameters: {}", summary.parameters);
    for status in ParamStatus::ALL {
        if let Some(count) = summary.by_status.get(&status) {
            println!("    {status}: {count}");
        }
    }
    println!("  Formulas: {}", summary.formulas);
    println!("  Sections: {}", summary.sections);
    println!("  Mismatches: {}", summary.mismatches);
    println!("  Content digest: {}", registry.content_digest());
}
