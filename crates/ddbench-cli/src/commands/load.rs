//! Load command implementation.
//!
//! Load an experiment directory, reconcile its sources and print the table.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use ddbench_results::{
    CategoryConfig, ExperimentDir, ExperimentRecord, LoadOptions, ResultsTable, RunStatus,
    load_errors_from_json, load_experiment,
};

use super::common::{OutputFormat, or_dash, print_json, sci, styled_status};

/// Execute the load command.
pub fn execute(
    exp_dir: &Path,
    add_missing: bool,
    categories: Option<&Path>,
    errors_dir: Option<&Path>,
    format: &str,
) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let table = build_table(exp_dir, add_missing, categories, errors_dir)?;

    match format {
        OutputFormat::Json => print_json(&table)?,
        OutputFormat::Table => print_table(exp_dir, &table, categories.is_some()),
    }

    Ok(())
}

/// Load, categorise and merge errors as requested.
pub fn build_table(
    exp_dir: &Path,
    add_missing: bool,
    categories: Option<&Path>,
    errors_dir: Option<&Path>,
) -> Result<ResultsTable> {
    let exp = ExperimentDir::new(exp_dir);
    let mut table = load_experiment(&exp, &LoadOptions { add_missing })
        .with_context(|| format!("Failed to load experiment {}", exp_dir.display()))?;

    if let Some(path) = categories {
        let config = CategoryConfig::from_file(path)?;
        table.categorize(&config);
    }

    if let Some(dir) = errors_dir {
        let errors = load_errors_from_json(dir)
            .with_context(|| format!("Failed to load error reports from {}", dir.display()))?;
        table.merge_errors(&errors);
    }

    Ok(table)
}

/// Run count per status, in status order.
pub fn status_counts(table: &ResultsTable) -> BTreeMap<RunStatus, usize> {
    let mut counts = BTreeMap::new();
    for row in table {
        *counts.entry(row.status).or_insert(0) += 1;
    }
    counts
}

fn print_table(exp_dir: &Path, table: &ResultsTable, by_category: bool) {
    println!(
        "{} {} run(s) in {}:\n",
        style("→").cyan().bold(),
        table.len(),
        style(exp_dir.display()).dim()
    );

    if table.is_empty() {
        return;
    }

    println!(
        "  {:>8}  {:<12}  {:<24}  {:>7}  {:<18}  {:<16}  {}",
        style("EXP ID").bold(),
        style("TOOL").bold(),
        style("CIRCUIT").bold(),
        style("WORKERS").bold(),
        style("STATUS").bold(),
        style("CATEGORY").bold(),
        style("MAX ERROR").bold()
    );
    println!("  {}", "-".repeat(110));

    let rows: Vec<&ExperimentRecord> = if by_category {
        table.sorted_by_category()
    } else {
        table.iter().collect()
    };
    for row in rows {
        println!(
            "  {:>8}  {:<12}  {:<24}  {:>7}  {:<18}  {:<16}  {}",
            row.exp_id,
            or_dash(row.tool),
            or_dash(row.circuit.as_deref()),
            or_dash(row.workers),
            styled_status(row.status),
            or_dash(row.category.as_ref()),
            or_dash(row.f64_field("max_error_abs").map(sci)),
        );
    }

    println!();
    let summary: Vec<String> = status_counts(table)
        .into_iter()
        .map(|(status, count)| format!("{status}: {count}"))
        .collect();
    println!("  {}", summary.join(", "));
}
