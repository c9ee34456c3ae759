//! State-vector errors against a ground-truth run.
//!
//! For every circuit the run with the highest precision, zero tolerance and
//! a single worker is taken as ground truth. Every other run of the circuit
//! is compared amplitude by amplitude and summarised as the worst absolute
//! and relative error.
//!
//! The ground truth is itself a finite-precision result. Where the exact
//! amplitude is zero but the reference holds a tiny non-zero value, the
//! relative error is meaningless and shows up as an outlier; exact zeros are
//! suppressed, near-zeros are not.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ResultsError, ResultsResult};
use crate::loader::list_files;
use crate::naming::{circuit_from_filename, exp_id_from_filename};
use crate::record::{ExperimentRecord, Tool};
use crate::table::ResultsTable;

/// Worst-case amplitude errors of one benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub exp_id: u64,
    pub max_error_abs: f64,
    /// `None` when no amplitude has a finite relative error.
    #[serde(default)]
    pub max_error_rel: Option<f64>,
}

/// Error reports ordered by source filename.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorTable {
    rows: Vec<ErrorReport>,
}

impl ErrorTable {
    pub fn new(rows: Vec<ErrorReport>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ErrorReport] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorReport> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, exp_id: u64) -> Option<&ErrorReport> {
        self.rows.iter().find(|r| r.exp_id == exp_id)
    }
}

/// Rebuild complex amplitudes from `[re, im]` pairs.
pub fn to_complex_vector(pairs: &[[f64; 2]]) -> Vec<Complex64> {
    pairs.iter().map(|[re, im]| Complex64::new(*re, *im)).collect()
}

/// Maximum absolute and relative amplitude error of `bench` against `truth`.
///
/// Relative errors that are not finite (x/0, 0/0) are left out of the
/// maximum. `None` if the vectors are empty or differ in length.
pub fn amplitude_errors(truth: &[Complex64], bench: &[Complex64]) -> Option<(f64, Option<f64>)> {
    if truth.is_empty() || truth.len() != bench.len() {
        return None;
    }

    let mut max_abs = 0.0f64;
    let mut max_rel: Option<f64> = None;
    for (t, b) in truth.iter().zip(bench) {
        let abs = (t - b).norm();
        max_abs = max_abs.max(abs);
        let rel = abs / t.norm();
        if rel.is_finite() {
            max_rel = Some(max_rel.map_or(rel, |m| m.max(rel)));
        }
    }
    Some((max_abs, max_rel))
}

fn is_ground_truth_candidate(record: &ExperimentRecord) -> bool {
    record.tolerance() == Some(0.0) && record.workers_or_default() == 1
}

/// Ground-truth `exp_id` per circuit.
///
/// A run qualifies when it has the highest precision among all runs of its
/// circuit, zero tolerance and one worker. Several qualifying runs resolve to
/// the lowest `exp_id`. Circuits without a qualifying run are absent.
pub fn select_ground_truths(table: &ResultsTable) -> BTreeMap<String, u64> {
    let mut by_circuit: BTreeMap<&str, Vec<&ExperimentRecord>> = BTreeMap::new();
    for record in table.iter().filter(|r| r.status.is_finished()) {
        if let Some(circuit) = record.circuit.as_deref() {
            by_circuit.entry(circuit).or_default().push(record);
        }
    }

    let mut truths = BTreeMap::new();
    for (circuit, runs) in by_circuit {
        let Some(max_precision) = runs
            .iter()
            .filter_map(|r| r.precision())
            .reduce(f64::max)
        else {
            continue;
        };
        let mut candidates: Vec<u64> = runs
            .iter()
            .filter(|r| r.precision() == Some(max_precision) && is_ground_truth_candidate(r))
            .map(|r| r.exp_id)
            .collect();
        candidates.sort_unstable();
        if candidates.len() > 1 {
            warn!(
                "Circuit {circuit} has {} ground-truth candidates {:?}, using exp_id {}",
                candidates.len(),
                candidates,
                candidates[0]
            );
        }
        if let Some(&first) = candidates.first() {
            truths.insert(circuit.to_string(), first);
        }
    }
    truths
}

#[derive(Deserialize)]
struct StateVectorFile {
    #[serde(default)]
    state_vector: Option<Vec<[f64; 2]>>,
}

/// Read the state vector of a result file. Logs and returns `None` if the
/// file cannot be read or parsed or has no `state_vector`.
fn read_state_vector(path: &Path) -> Option<Vec<Complex64>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not read {}: {e}, skipping", path.display());
            return None;
        }
    };
    match serde_json::from_str::<StateVectorFile>(&content) {
        Ok(StateVectorFile {
            state_vector: Some(pairs),
        }) => Some(to_complex_vector(&pairs)),
        Ok(_) => {
            warn!("No state vector in {}, skipping", path.display());
            None
        }
        Err(e) => {
            warn!("Could not get json data from {}: {e}, skipping", path.display());
            None
        }
    }
}

fn circuit_for(table: &ResultsTable, exp_id: u64, filename: &str) -> Option<String> {
    table
        .get(exp_id)
        .and_then(|r| r.circuit.clone())
        .or_else(|| {
            Tool::from_filename(filename).and_then(|tool| circuit_from_filename(filename, tool))
        })
}

/// Create `dir` and its parents, failing if `dir` itself already exists.
fn create_output_dir(dir: &Path) -> ResultsResult<()> {
    if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ResultsError::io(parent, e))?;
    }
    fs::create_dir(dir).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => ResultsError::OutputExists(dir.to_path_buf()),
        _ => ResultsError::io(dir, e),
    })
}

/// Compare every non-ground-truth result file in `json_dir` against its
/// circuit's ground truth and persist one report per run in `errors_dir`.
///
/// `errors_dir` must not exist yet; it is created (with parents) before any
/// comparison runs. Files that cannot be paired or parsed are skipped with a
/// warning and leave no output behind.
pub fn compute_errors_from_json(
    table: &ResultsTable,
    json_dir: &Path,
    errors_dir: &Path,
) -> ResultsResult<ErrorTable> {
    create_output_dir(errors_dir)?;

    let truths = select_ground_truths(table);
    let truth_ids: HashMap<u64, &str> = truths.iter().map(|(c, id)| (*id, c.as_str())).collect();

    // circuit -> ground-truth filename, and (filename, exp_id, circuit) for benchmarks
    let mut truth_files: HashMap<String, String> = HashMap::new();
    let mut benchmarks: Vec<(String, u64, Option<String>)> = Vec::new();
    for (filename, _) in list_files(json_dir, ".json")? {
        let Some(exp_id) = exp_id_from_filename(&filename) else {
            warn!("No experiment id in {filename}, skipping");
            continue;
        };
        if let Some(circuit) = truth_ids.get(&exp_id) {
            truth_files
                .entry((*circuit).to_string())
                .or_insert_with(|| filename.clone());
        } else {
            let circuit = circuit_for(table, exp_id, &filename);
            benchmarks.push((filename, exp_id, circuit));
        }
    }

    let mut truth_vectors: HashMap<String, Option<Vec<Complex64>>> = HashMap::new();
    let mut rows = Vec::new();
    for (filename, exp_id, circuit) in benchmarks {
        let Some(truth_file) = circuit.as_ref().and_then(|c| truth_files.get(c)) else {
            warn!("No ground truth for {filename}, skipping");
            continue;
        };

        let truth = truth_vectors
            .entry(truth_file.clone())
            .or_insert_with(|| read_state_vector(&json_dir.join(truth_file)));
        let Some(truth) = truth.as_deref() else {
            warn!("Ground truth {truth_file} has no usable state vector, skipping {filename}");
            continue;
        };
        let Some(bench) = read_state_vector(&json_dir.join(&filename)) else {
            continue;
        };
        let Some((max_error_abs, max_error_rel)) = amplitude_errors(truth, &bench) else {
            warn!(
                "{filename} has {} amplitudes, ground truth {truth_file} has {}, skipping",
                bench.len(),
                truth.len()
            );
            continue;
        };

        let report = ErrorReport {
            exp_id,
            max_error_abs,
            max_error_rel,
        };
        let output = errors_dir.join(&filename);
        let json =
            serde_json::to_string_pretty(&report).map_err(|e| ResultsError::json(&output, e))?;
        fs::write(&output, json).map_err(|e| ResultsError::io(&output, e))?;
        debug!(exp_id, max_error_abs, ?max_error_rel, "wrote error report");
        rows.push(report);
    }

    info!(
        "Computed {} error reports against {} ground truths",
        rows.len(),
        truth_files.len()
    );
    Ok(ErrorTable::new(rows))
}

/// Reload reports written by [`compute_errors_from_json`], ordered by
/// filename.
pub fn load_errors_from_json(errors_dir: &Path) -> ResultsResult<ErrorTable> {
    let mut rows = Vec::new();
    for (filename, path) in list_files(errors_dir, "")? {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not read error report {filename}: {e}, skipping");
                continue;
            }
        };
        match serde_json::from_str::<ErrorReport>(&content) {
            Ok(report) => rows.push(report),
            Err(e) => warn!("Could not parse error report {filename}: {e}, skipping"),
        }
    }
    Ok(ErrorTable::new(rows))
}
