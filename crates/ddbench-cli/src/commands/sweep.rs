//! Sweep command implementation.
//!
//! Tabulate `error2` against circuit depth, one column per δ.

use anyhow::Result;
use console::style;

use ddbench_bounds::{ErrorModel, ErrorSeries, Form};

use super::common::{OutputFormat, print_json, sci};

/// Execute the sweep command.
pub fn execute(
    n_min: u32,
    n_max: u32,
    deltas: &[f64],
    epsilon: f64,
    approx: bool,
    format: &str,
) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    if n_min > n_max {
        anyhow::bail!("--n-min ({n_min}) must not exceed --n-max ({n_max})");
    }

    let ns: Vec<u32> = (n_min..=n_max).collect();
    let form = Form::from_approx(approx);
    let series = ErrorModel::default().sweep_error2(&ns, deltas, epsilon, form)?;

    match format {
        OutputFormat::Json => print_json(&series)?,
        OutputFormat::Table => print_series(&ns, &series),
    }

    Ok(())
}

fn print_series(ns: &[u32], series: &[ErrorSeries]) {
    print!("  {:>5}", style("n").bold());
    for s in series {
        print!("  {:>12}", style(format!("δ={}", sci(s.delta))).bold());
    }
    println!();
    println!("  {}", "-".repeat(7 + 14 * series.len()));

    for (i, n) in ns.iter().enumerate() {
        print!("  {n:>5}");
        for s in series {
            print!("  {:>12}", sci(s.points[i].error));
        }
        println!();
    }
}
