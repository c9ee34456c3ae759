//! Backfill of fields that older result formats do not contain.
//!
//! Each rule names the statistics schema version that introduced the field
//! and the value runs of earlier versions implicitly used, so historical data
//! can be tabulated next to current runs.

use serde_json::Value;

use crate::record::ExperimentRecord;

/// A field default for records predating `since_schema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackfillRule {
    pub field: &'static str,
    pub default: i64,
    pub since_schema: u32,
}

/// Fields added after the first statistics schema.
pub const LEGACY_FIELDS: &[BackfillRule] = &[
    BackfillRule {
        field: "reorder",
        default: 2,
        since_schema: 2,
    },
    BackfillRule {
        field: "wgt_inv_caching",
        default: 1,
        since_schema: 2,
    },
];

/// Apply every rule whose field is absent. Returns how many were filled.
pub fn apply(rules: &[BackfillRule], record: &mut ExperimentRecord) -> usize {
    rules
        .iter()
        .filter(|r| record.set_default(r.field, Value::from(r.default)))
        .count()
}
