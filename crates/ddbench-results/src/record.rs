//! Experiment records: one row per simulator run.
//!
//! A record has a small required core (`exp_id`, `tool`, `circuit`,
//! `workers`, `status`) and an open map of tool-specific statistics whose
//! shape changes between simulator versions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category::Category;

/// `exp_id` of the anchor row that `load_logs` always emits.
pub const SENTINEL_EXP_ID: u64 = 0;

/// Keys lifted out of the statistics map into the record core.
pub const CORE_KEYS: &[&str] = &["exp_id", "tool", "circuit", "workers", "status"];

/// Simulator that produced a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tool {
    /// Q-Sylvan, multi-threaded decision-diagram simulator.
    #[serde(rename = "q-sylvan")]
    QSylvan,
    /// MQT DDSIM, single-threaded decision-diagram simulator.
    #[serde(rename = "mqt")]
    Mqt,
    /// Quokka#, state-vector simulator.
    #[serde(rename = "quokkasharp")]
    QuokkaSharp,
}

impl Tool {
    /// Every known tool, in filename-matching order.
    pub const ALL: [Tool; 3] = [Tool::QSylvan, Tool::Mqt, Tool::QuokkaSharp];

    /// Display name used in tables and JSON.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::QSylvan => "q-sylvan",
            Tool::Mqt => "mqt",
            Tool::QuokkaSharp => "quokkasharp",
        }
    }

    /// Token identifying the tool inside artifact filenames.
    pub fn filename_marker(&self) -> &'static str {
        match self {
            Tool::QSylvan => "qsylvan",
            Tool::Mqt => "mqt",
            Tool::QuokkaSharp => "quokkasharp",
        }
    }

    /// Whether runs of this tool carry a worker-count filename segment.
    pub fn is_multi_worker(&self) -> bool {
        matches!(self, Tool::QSylvan)
    }

    /// Infer the tool from a filename by substring match.
    pub fn from_filename(filename: &str) -> Option<Tool> {
        Tool::ALL
            .into_iter()
            .find(|tool| filename.contains(tool.filename_marker()))
    }

    /// Parse a tool name as written in statistics (`q-sylvan` or `qsylvan`).
    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name() == name || tool.filename_marker() == name)
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Completed and wrote its statistics.
    Finished,
    /// Killed by the experiment runner's time limit.
    Timeout,
    /// Edge-weight table of the decision diagram overflowed.
    WeightTableFull,
    /// Node table of the decision diagram overflowed.
    NodeTableFull,
    /// Crashed, e.g. on a failed assertion.
    Error,
    /// Log text did not match any known marker.
    Unknown,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Finished => "FINISHED",
            RunStatus::Timeout => "TIMEOUT",
            RunStatus::WeightTableFull => "WEIGHT_TABLE_FULL",
            RunStatus::NodeTableFull => "NODE_TABLE_FULL",
            RunStatus::Error => "ERROR",
            RunStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, RunStatus::Finished)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One simulator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    /// Join key across json, log, meta and error tables.
    pub exp_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<Tool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<u32>,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Tool-specific statistics and merged metadata.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ExperimentRecord {
    /// A record with only the core populated.
    pub fn new(exp_id: u64, status: RunStatus) -> Self {
        Self {
            exp_id,
            tool: None,
            circuit: None,
            workers: None,
            status,
            category: None,
            fields: Map::new(),
        }
    }

    /// The `{exp_id: 0}` anchor row of the log table.
    pub fn sentinel() -> Self {
        Self::new(SENTINEL_EXP_ID, RunStatus::Unknown)
    }

    pub fn is_sentinel(&self) -> bool {
        self.exp_id == SENTINEL_EXP_ID && self.tool.is_none() && self.circuit.is_none()
    }

    /// Build a record from a statistics object, lifting core keys out of it.
    ///
    /// `exp_id` and `status` inside the statistics are discarded; the caller
    /// supplies the authoritative values.
    pub fn from_statistics(exp_id: u64, status: RunStatus, mut stats: Map<String, Value>) -> Self {
        let mut record = Self::new(exp_id, status);
        record.tool = stats
            .get("tool")
            .and_then(Value::as_str)
            .and_then(Tool::from_name);
        record.circuit = stats
            .get("circuit")
            .and_then(Value::as_str)
            .map(str::to_string);
        record.workers = stats
            .get("workers")
            .and_then(Value::as_u64)
            .and_then(|w| u32::try_from(w).ok());
        for key in CORE_KEYS {
            stats.remove(*key);
        }
        record.fields = stats;
        record
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn f64_field(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    pub fn u64_field(&self, key: &str) -> Option<u64> {
        self.fields.get(key).and_then(Value::as_u64)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Set a field unless it is already present. Returns whether it was set.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) -> bool {
        if self.fields.contains_key(key) {
            return false;
        }
        self.fields.insert(key.to_string(), value.into());
        true
    }

    /// Numeric precision the simulator was run with.
    pub fn precision(&self) -> Option<f64> {
        self.f64_field("precision")
    }

    /// Pruning tolerance the simulator was run with.
    pub fn tolerance(&self) -> Option<f64> {
        self.f64_field("tolerance")
    }

    /// Worker count, defaulting to a single worker.
    pub fn workers_or_default(&self) -> u32 {
        self.workers.unwrap_or(1)
    }
}
