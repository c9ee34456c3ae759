//! Errors command implementation.
//!
//! Compute state-vector errors against ground-truth runs, or show reports
//! computed earlier.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use ddbench_results::{
    ErrorTable, ExperimentDir, LoadOptions, compute_errors_from_json, load_errors_from_json,
    load_json, select_ground_truths,
};

use super::common::{OutputFormat, or_dash, print_json, sci};

/// Execute `errors compute`.
pub fn execute_compute(exp_dir: &Path, errors_dir: &Path) -> Result<()> {
    let exp = ExperimentDir::new(exp_dir);
    let table = load_json(&exp, &LoadOptions::default())
        .with_context(|| format!("Failed to load results from {}", exp_dir.display()))?;

    let truths = select_ground_truths(&table);
    for (circuit, exp_id) in &truths {
        debug!("ground truth for {circuit}: exp_id {exp_id}");
    }
    println!(
        "{} {} run(s), {} circuit(s) with a ground truth",
        style("→").cyan().bold(),
        table.len(),
        truths.len()
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Comparing state vectors...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let errors = compute_errors_from_json(&table, &exp.json_dir(), errors_dir);
    spinner.finish_and_clear();
    let errors = errors?;

    println!(
        "{} Wrote {} error report(s) to {}",
        style("✓").green().bold(),
        errors.len(),
        style(errors_dir.display()).dim()
    );
    Ok(())
}

/// Execute `errors show`.
pub fn execute_show(errors_dir: &Path, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let errors = load_errors_from_json(errors_dir)
        .with_context(|| format!("Failed to load error reports from {}", errors_dir.display()))?;

    match format {
        OutputFormat::Json => print_json(&errors)?,
        OutputFormat::Table => print_errors(&errors),
    }
    Ok(())
}

fn print_errors(errors: &ErrorTable) {
    if errors.is_empty() {
        println!("No error reports found.");
        return;
    }

    println!("{} {} report(s):\n", style("→").cyan().bold(), errors.len());
    println!(
        "  {:>8}  {:>14}  {:>14}",
        style("EXP ID").bold(),
        style("MAX ABS").bold(),
        style("MAX REL").bold()
    );
    println!("  {}", "-".repeat(40));
    for report in errors.iter() {
        println!(
            "  {:>8}  {:>14}  {:>14}",
            report.exp_id,
            sci(report.max_error_abs),
            or_dash(report.max_error_rel.map(sci))
        );
    }
}
