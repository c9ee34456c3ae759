//! Bound command implementation.
//!
//! Evaluate both error contributions for one parameter set.

use anyhow::{Context, Result};
use console::style;
use serde_json::json;

use ddbench_bounds::{ErrorModel, ErrorParameters, Form};

use super::common::{OutputFormat, print_json, sci};

/// Execute the bound command.
pub fn execute(
    n: u32,
    epsilon: f64,
    delta: f64,
    approx: bool,
    precision: u64,
    format: &str,
) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let model = ErrorModel::new(precision)?;
    let params = ErrorParameters::from_f64(n, epsilon, delta).context("Invalid parameters")?;
    let form = Form::from_approx(approx);

    let breakdown = model.breakdown(&params, form)?.to_f64();

    match format {
        OutputFormat::Json => print_json(&json!({
            "n": n,
            "epsilon": epsilon,
            "delta": delta,
            "form": form,
            "precision": model.precision(),
            "error1": breakdown.error1,
            "error2": breakdown.error2,
            "total": breakdown.total,
        }))?,
        OutputFormat::Table => {
            println!(
                "{} Error bound for n = {}, ε = {}, δ = {} ({:?}, {} digits)",
                style("→").cyan().bold(),
                style(n).yellow(),
                sci(epsilon),
                sci(delta),
                form,
                model.precision()
            );
            println!("  error1 (floating point): {}", sci(breakdown.error1));
            println!("  error2 (truncation):     {}", sci(breakdown.error2));
            println!("  total:                   {}", style(sci(breakdown.total)).bold());
        }
    }

    Ok(())
}
