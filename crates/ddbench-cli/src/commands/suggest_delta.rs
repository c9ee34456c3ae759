//! Suggest-delta command implementation.

use anyhow::{Context, Result};
use console::style;

use ddbench_bounds::{ErrorModel, decimal};

use super::common::sci;

/// Execute the suggest-delta command.
pub fn execute(n: u32, epsilon: f64, target: f64) -> Result<()> {
    let model = ErrorModel::default();
    let eps = decimal::from_f64("epsilon", epsilon).context("Invalid epsilon")?;
    let target_dec = decimal::from_f64("target", target).context("Invalid target")?;

    let suggestion = model.suggest_delta(n, &eps, &target_dec)?;

    if suggestion.is_feasible() {
        println!(
            "{} δ = {} for n = {}, ε = {}, target = {}",
            style("✓").green().bold(),
            style(sci(suggestion.to_f64())).bold(),
            n,
            sci(epsilon),
            sci(target)
        );
    } else {
        println!(
            "{} No positive δ reaches target {} at n = {}: floating-point error alone is {}",
            style("✗").red().bold(),
            sci(target),
            n,
            sci(f64::from(n) * epsilon)
        );
        println!("  computed δ = {}", sci(suggestion.to_f64()));
    }

    Ok(())
}
