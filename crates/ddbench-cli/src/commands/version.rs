//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - error bounds and results for decision-diagram simulator benchmarks",
        style("ddbench").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  ddbench-bounds   Arbitrary-precision error model");
    println!("  ddbench-results  Experiment loading, reconciliation and ground-truth errors");
    println!("  ddbench-cli      Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
