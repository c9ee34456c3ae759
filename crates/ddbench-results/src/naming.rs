//! Artifact filename conventions.
//!
//! Every per-run file is named `{circuit}_{tool}[_{workers}]_{exp_id}.{ext}`,
//! with the worker segment only present for multi-worker tools. The last
//! integer in the name is the experiment id.

use std::sync::LazyLock;

use regex::Regex;

use crate::record::Tool;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("integer pattern is valid"));

/// Last integer appearing anywhere in `filename`.
pub fn exp_id_from_filename(filename: &str) -> Option<u64> {
    INTEGER
        .find_iter(filename)
        .last()
        .and_then(|m| m.as_str().parse().ok())
}

/// Strip the final extension, if any.
pub fn file_stem(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map_or(filename, |(stem, _)| stem)
}

/// Circuit name: everything before `_{tool marker}`.
pub fn circuit_from_filename(filename: &str, tool: Tool) -> Option<String> {
    let marker = format!("_{}", tool.filename_marker());
    file_stem(filename)
        .split_once(marker.as_str())
        .map(|(circuit, _)| circuit.to_string())
        .filter(|circuit| !circuit.is_empty())
}

/// Information encoded in a log filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunName {
    pub tool: Option<Tool>,
    pub circuit: Option<String>,
    pub workers: Option<u32>,
    pub exp_id: u64,
}

/// Decode a run filename. `None` when it carries no experiment id.
///
/// Multi-worker tools read the worker count from the segment right after the
/// tool marker; single-worker tools always report one worker.
pub fn parse_run_name(filename: &str) -> Option<RunName> {
    let exp_id = exp_id_from_filename(filename)?;
    let tool = Tool::from_filename(filename);

    let (circuit, workers) = match tool {
        Some(tool) if tool.is_multi_worker() => {
            let parts: Vec<&str> = file_stem(filename).split('_').collect();
            match parts.iter().position(|p| *p == tool.filename_marker()) {
                Some(idx) => (
                    Some(parts[..idx].join("_")).filter(|c| !c.is_empty()),
                    parts.get(idx + 1).and_then(|w| w.parse().ok()),
                ),
                None => (circuit_from_filename(filename, tool), None),
            }
        }
        Some(tool) => (circuit_from_filename(filename, tool), Some(1)),
        None => (None, None),
    };

    Some(RunName {
        tool,
        circuit,
        workers,
        exp_id,
    })
}
