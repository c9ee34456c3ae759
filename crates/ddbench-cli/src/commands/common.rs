//! Shared helpers for CLI commands.

use anyhow::{Context, Result};
use console::{StyledObject, style};
use serde::Serialize;

use ddbench_results::RunStatus;

/// How a command prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self> {
        match format.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("Unknown output format: '{other}'. Available: table, json"),
        }
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{json}");
    Ok(())
}

/// Scientific notation with four significant digits.
pub fn sci(value: f64) -> String {
    format!("{value:.3e}")
}

/// Optional value or a dash.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn styled_status(status: RunStatus) -> StyledObject<&'static str> {
    let name = status.as_str();
    match status {
        RunStatus::Finished => style(name).green(),
        RunStatus::Timeout => style(name).yellow(),
        RunStatus::Unknown => style(name).dim(),
        _ => style(name).red(),
    }
}
