//! Circuit categories for grouping and legend ordering.
//!
//! A circuit's family is the leading `_`-separated token of its name. The
//! family is looked up in a [`CategoryConfig`] under one chosen taxonomy.
//! Labels carry a separate numeric rank so that ordering never depends on
//! the label text.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ResultsError, ResultsResult};
use crate::record::ExperimentRecord;

/// Family whose category is derived from decision-diagram sharing.
pub const SHARING_FAMILY: &str = "KetGPT";

/// A display label with its sort rank. Orders by rank, then label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Category {
    pub rank: u32,
    pub label: String,
}

impl Category {
    pub fn new(rank: u32, label: impl Into<String>) -> Self {
        Self {
            rank,
            label: label.into(),
        }
    }

    /// `(rank, label)` ordering key.
    pub fn sort_key(&self) -> (u32, &str) {
        (self.rank, &self.label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Category configuration file.
///
/// ```json
/// {
///   "circuit_types": { "qft": { "domain": "arithmetic", "structure": "structured" } },
///   "use_category": "domain",
///   "order": ["arithmetic", "search"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// family → (taxonomy → label)
    pub circuit_types: BTreeMap<String, BTreeMap<String, String>>,
    /// Taxonomy to apply.
    pub use_category: String,
    /// Labels in legend order.
    pub order: Vec<String>,
}

impl CategoryConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> ResultsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ResultsError::io(path, e))?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| ResultsError::json(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the selected taxonomy exists for at least one family.
    pub fn validate(&self) -> ResultsResult<()> {
        if self.use_category.is_empty() {
            return Err(ResultsError::InvalidConfig(
                "use_category must not be empty".into(),
            ));
        }
        if !self.circuit_types.is_empty()
            && !self
                .circuit_types
                .values()
                .any(|t| t.contains_key(&self.use_category))
        {
            return Err(ResultsError::InvalidConfig(format!(
                "no circuit type defines taxonomy '{}'",
                self.use_category
            )));
        }
        Ok(())
    }

    /// Rank of a label: its position in `order`, or after every ordered label.
    pub fn rank_of(&self, label: &str) -> u32 {
        let pos = self
            .order
            .iter()
            .position(|l| l == label)
            .unwrap_or_else(|| {
                warn!("Category '{label}' missing from order, sorting it last");
                self.order.len()
            });
        u32::try_from(pos).unwrap_or(u32::MAX)
    }

    /// Category of a circuit name, ignoring sharing-derived families.
    pub fn lookup(&self, circuit: &str) -> Option<Category> {
        let family = circuit_family(circuit);
        let label = self.circuit_types.get(family)?.get(&self.use_category);
        match label {
            Some(label) => Some(Category::new(self.rank_of(label), label.clone())),
            None => {
                warn!(
                    "Circuit type '{family}' has no '{}' category, using family name",
                    self.use_category
                );
                Some(Category::new(0, family))
            }
        }
    }
}

/// Leading `_`-separated token of a circuit name.
pub fn circuit_family(circuit: &str) -> &str {
    circuit.split('_').next().unwrap_or(circuit)
}

/// Category for one record. `None` if the record has no circuit.
pub fn assign_category(config: &CategoryConfig, record: &ExperimentRecord) -> Option<Category> {
    let circuit = record.circuit.as_deref()?;
    if let Some(category) = config.lookup(circuit) {
        return Some(category);
    }
    let family = circuit_family(circuit);
    if family == SHARING_FAMILY {
        return Some(sharing_category(record));
    }
    Some(Category::new(0, family))
}

/// Classify how compactly the run's decision diagram represents its state.
///
/// Uses the larger of `final_nodes`/`max_nodes` against `n_qubits`, with
/// missing statistics read as zero:
///
/// | condition                    | label          | rank |
/// |------------------------------|----------------|------|
/// | run did not finish           | unknown        | 4    |
/// | `nodes <= q·ln(q)`           | high sharing   | 3    |
/// | `nodes >= 2^(q-2)`           | no sharing     | 1    |
/// | otherwise                    | some sharing   | 2    |
pub fn sharing_category(record: &ExperimentRecord) -> Category {
    let nodes = record
        .f64_field("final_nodes")
        .unwrap_or(0.0)
        .max(record.f64_field("max_nodes").unwrap_or(0.0));
    let qubits = record.f64_field("n_qubits").unwrap_or(0.0);

    if !record.status.is_finished() {
        Category::new(4, "unknown")
    } else if nodes <= qubits * qubits.ln() {
        Category::new(3, "high sharing")
    } else if nodes >= 2f64.powf(qubits - 2.0) {
        Category::new(1, "no sharing")
    } else {
        Category::new(2, "some sharing")
    }
}
