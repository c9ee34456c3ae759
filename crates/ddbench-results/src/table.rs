//! Tables of experiment records and the joins between them.
//!
//! The json-derived table is primary. Every other source is joined onto it
//! by `exp_id` with left-merge semantics: rows of the primary table are never
//! dropped or duplicated, unmatched rows of the other side are ignored.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::category::{CategoryConfig, assign_category};
use crate::fidelity::ErrorTable;
use crate::record::{CORE_KEYS, ExperimentRecord};

/// Ordered rows of experiment records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultsTable {
    rows: Vec<ExperimentRecord>,
}

impl ResultsTable {
    pub fn new(rows: Vec<ExperimentRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ExperimentRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExperimentRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row with the given id.
    pub fn get(&self, exp_id: u64) -> Option<&ExperimentRecord> {
        self.rows.iter().find(|r| r.exp_id == exp_id)
    }

    pub fn contains(&self, exp_id: u64) -> bool {
        self.get(exp_id).is_some()
    }

    /// Distinct circuit names, sorted.
    pub fn circuits(&self) -> BTreeSet<&str> {
        self.rows
            .iter()
            .filter_map(|r| r.circuit.as_deref())
            .collect()
    }

    /// Append the failed runs of a log table that have no row yet.
    ///
    /// The log sentinel is never appended.
    #[must_use]
    pub fn with_failures(mut self, logs: &ResultsTable) -> Self {
        let mut known: BTreeSet<u64> = self.rows.iter().map(|r| r.exp_id).collect();
        let mut added = 0usize;
        for row in logs.iter() {
            if row.is_sentinel() || known.contains(&row.exp_id) {
                continue;
            }
            known.insert(row.exp_id);
            self.rows.push(row.clone());
            added += 1;
        }
        debug!(added, "appended failed runs from logs");
        self
    }

    /// Left-merge metadata rows onto matching records.
    ///
    /// Existing fields and core keys are never overwritten.
    pub fn merge_meta(&mut self, meta: &MetaTable) {
        let index = index_first(
            meta.rows.iter().filter_map(|m| meta_exp_id(m).map(|id| (id, m))),
            "meta",
        );
        for row in &mut self.rows {
            let Some(extra) = index.get(&row.exp_id) else {
                continue;
            };
            for (key, value) in *extra {
                if CORE_KEYS.contains(&key.as_str()) {
                    continue;
                }
                row.set_default(key, value.clone());
            }
        }
    }

    /// Left-merge error reports as `max_error_abs` / `max_error_rel` fields.
    pub fn merge_errors(&mut self, errors: &ErrorTable) {
        let index = index_first(errors.iter().map(|e| (e.exp_id, e)), "errors");
        for row in &mut self.rows {
            if let Some(report) = index.get(&row.exp_id) {
                row.fields
                    .insert("max_error_abs".into(), Value::from(report.max_error_abs));
                row.fields.insert(
                    "max_error_rel".into(),
                    report.max_error_rel.map_or(Value::Null, Value::from),
                );
            }
        }
    }

    /// Attach a category to every record that has a circuit.
    pub fn categorize(&mut self, config: &CategoryConfig) {
        for row in &mut self.rows {
            row.category = assign_category(config, row);
        }
    }

    /// Rows ordered by category (rank, label), then `exp_id`. Uncategorised
    /// rows come last.
    pub fn sorted_by_category(&self) -> Vec<&ExperimentRecord> {
        let mut rows: Vec<_> = self.rows.iter().collect();
        rows.sort_by(|a, b| match (&a.category, &b.category) {
            (Some(x), Some(y)) => x.cmp(y).then(a.exp_id.cmp(&b.exp_id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.exp_id.cmp(&b.exp_id),
        });
        rows
    }
}

impl<'a> IntoIterator for &'a ResultsTable {
    type Item = &'a ExperimentRecord;
    type IntoIter = std::slice::Iter<'a, ExperimentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Raw metadata rows, one per meta file, keys as written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaTable {
    pub rows: Vec<Map<String, Value>>,
}

impl MetaTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn meta_exp_id(row: &Map<String, Value>) -> Option<u64> {
    match row.get("exp_id")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Index the right side of a join by key, keeping the first of duplicates.
fn index_first<'a, T>(
    items: impl Iterator<Item = (u64, &'a T)>,
    source: &str,
) -> HashMap<u64, &'a T> {
    let mut index = HashMap::new();
    for (key, item) in items {
        if index.contains_key(&key) {
            warn!("Duplicate exp_id {key} in {source} table, keeping first");
            continue;
        }
        index.insert(key, item);
    }
    index
}
