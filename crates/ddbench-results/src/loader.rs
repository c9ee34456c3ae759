//! Loaders for an experiment directory.
//!
//! ```text
//! <root>/
//!   json/   {circuit}_{tool}[_{workers}]_{exp_id}.json   statistics + state vector
//!   logs/   {circuit}_{tool}[_{workers}]_{exp_id}.log    simulator stdout/stderr
//!   meta/   *.json                                       free-form run metadata
//! ```
//!
//! Listings are fully materialised and sorted by filename before any file is
//! read, so row order is deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::backfill::{self, LEGACY_FIELDS};
use crate::error::{ResultsError, ResultsResult};
use crate::naming::{circuit_from_filename, exp_id_from_filename, file_stem, parse_run_name};
use crate::record::{ExperimentRecord, RunStatus, Tool};
use crate::status::infer_status;
use crate::table::{MetaTable, ResultsTable};

/// Paths of one experiment's artifact directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentDir {
    root: PathBuf,
}

impl ExperimentDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn json_dir(&self) -> PathBuf {
        self.root.join("json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.root.join("meta")
    }

    /// The json result file belonging to a log file.
    pub fn json_counterpart(&self, log_filename: &str) -> PathBuf {
        self.json_dir().join(format!("{}.json", file_stem(log_filename)))
    }
}

/// Options for [`load_json`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fill fields that older statistics formats lack.
    pub add_missing: bool,
}

/// Files in `dir` whose name ends with `suffix`, sorted by name.
pub(crate) fn list_files(dir: &Path, suffix: &str) -> ResultsResult<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| ResultsError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ResultsError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping non-UTF-8 filename {}", path.display());
            continue;
        };
        if name.ends_with(suffix) {
            files.push((name.to_string(), path.clone()));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

#[derive(Deserialize)]
struct ResultFile {
    statistics: Option<Map<String, Value>>,
}

fn record_from_json(filename: &str, path: &Path) -> Option<ExperimentRecord> {
    let Some(exp_id) = exp_id_from_filename(filename) else {
        warn!("No experiment id in {filename}, skipping");
        return None;
    };
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not read {}: {e}, skipping", path.display());
            return None;
        }
    };
    let stats = match serde_json::from_str::<ResultFile>(&content) {
        Ok(ResultFile {
            statistics: Some(stats),
        }) => stats,
        Ok(_) => {
            warn!("No statistics in {filename}, skipping");
            return None;
        }
        Err(e) => {
            warn!("Could not get json data from {filename}: {e}, skipping");
            return None;
        }
    };

    let mut record = ExperimentRecord::from_statistics(exp_id, RunStatus::Finished, stats);
    if let Some(tool) = Tool::from_filename(filename) {
        record.tool = Some(tool);
    }
    if record.tool == Some(Tool::Mqt) || record.workers.is_none() {
        record.workers = Some(1);
    }
    if record.circuit.is_none() {
        record.circuit = record
            .tool
            .and_then(|tool| circuit_from_filename(filename, tool));
    }
    Some(record)
}

/// One row per non-empty json result file with a `statistics` object.
///
/// Malformed files are logged and skipped. A missing `json/` directory is an
/// error.
pub fn load_json(exp_dir: &ExperimentDir, options: &LoadOptions) -> ResultsResult<ResultsTable> {
    let mut rows = Vec::new();
    let mut backfilled = 0usize;
    for (filename, path) in list_files(&exp_dir.json_dir(), ".json")? {
        let empty = fs::metadata(&path)
            .map(|m| m.len() == 0)
            .map_err(|e| ResultsError::io(&path, e))?;
        if empty {
            debug!("{filename} is empty, leaving it to the log loader");
            continue;
        }
        let Some(mut record) = record_from_json(&filename, &path) else {
            continue;
        };
        if options.add_missing {
            backfilled += backfill::apply(LEGACY_FIELDS, &mut record);
        }
        rows.push(record);
    }
    info!(
        rows = rows.len(),
        backfilled,
        "loaded json results from {}",
        exp_dir.root().display()
    );
    Ok(ResultsTable::new(rows))
}

/// Runs that did not finish, inferred from their logs.
///
/// The first row is always the `exp_id` 0 sentinel so the table is never
/// empty.
pub fn load_logs(exp_dir: &ExperimentDir) -> ResultsResult<ResultsTable> {
    let mut rows = vec![ExperimentRecord::sentinel()];
    for (filename, path) in list_files(&exp_dir.logs_dir(), ".log")? {
        let Some(name) = parse_run_name(&filename) else {
            warn!("No experiment id in {filename}, skipping");
            continue;
        };
        let status = match infer_status(&path, &exp_dir.json_counterpart(&filename), name.tool) {
            Ok(status) => status,
            Err(e) => {
                warn!("{e}, skipping");
                continue;
            }
        };
        if status.is_finished() {
            continue;
        }
        let mut record = ExperimentRecord::new(name.exp_id, status);
        record.tool = name.tool;
        record.circuit = name.circuit;
        record.workers = name.workers;
        rows.push(record);
    }
    info!(failures = rows.len() - 1, "loaded run logs");
    Ok(ResultsTable::new(rows))
}

/// Raw metadata rows, one per parseable `meta/*.json` object.
pub fn load_meta(exp_dir: &ExperimentDir) -> ResultsResult<MetaTable> {
    let mut rows = Vec::new();
    for (filename, path) in list_files(&exp_dir.meta_dir(), ".json")? {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not read meta file {filename}: {e}, skipping");
                continue;
            }
        };
        match serde_json::from_str::<Map<String, Value>>(&content) {
            Ok(row) => rows.push(row),
            Err(e) => warn!("Could not parse meta file {filename}: {e}, skipping"),
        }
    }
    Ok(MetaTable { rows })
}

/// Load json results, append failed runs from `logs/` and merge `meta/`.
///
/// `logs/` and `meta/` are optional; `json/` is not.
pub fn load_experiment(
    exp_dir: &ExperimentDir,
    options: &LoadOptions,
) -> ResultsResult<ResultsTable> {
    let mut table = load_json(exp_dir, options)?;
    if exp_dir.logs_dir().is_dir() {
        table = table.with_failures(&load_logs(exp_dir)?);
    }
    if exp_dir.meta_dir().is_dir() {
        table.merge_meta(&load_meta(exp_dir)?);
    }
    Ok(table)
}
