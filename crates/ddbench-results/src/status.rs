//! Termination status inference from run logs.
//!
//! When a run produced no statistics its log is the only evidence of what
//! happened. Each tool has an ordered rule table; the first matching marker
//! decides the status.
//!
//! ```text
//!   empty log ──→ json counterpart empty? ──→ TIMEOUT / FINISHED
//!   text      ──→ rule table (first match) ──→ status
//!                        │
//!                        └── no match ──→ UNKNOWN (logged)
//! ```

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{ResultsError, ResultsResult};
use crate::record::{RunStatus, Tool};

/// Text pattern a rule looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Text contains the substring.
    Contains(&'static str),
    /// Text contains every substring, anywhere.
    ContainsAll(&'static [&'static str]),
    /// Text is exactly one line and contains the substring.
    SingleLineContaining(&'static str),
}

impl Marker {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Marker::Contains(s) => text.contains(s),
            Marker::ContainsAll(all) => all.iter().all(|s| text.contains(s)),
            Marker::SingleLineContaining(s) => text.lines().count() == 1 && text.contains(s),
        }
    }
}

/// What a matched rule concludes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Status(RunStatus),
    /// Decide as if the log were empty.
    AsEmptyLog,
}

/// One `(marker → outcome)` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRule {
    pub marker: Marker,
    pub outcome: Outcome,
}

const fn rule(marker: Marker, status: RunStatus) -> StatusRule {
    StatusRule {
        marker,
        outcome: Outcome::Status(status),
    }
}

const QSYLVAN_RULES: &[StatusRule] = &[
    rule(Marker::Contains("Amplitude table full"), RunStatus::WeightTableFull),
    rule(Marker::Contains("Unique table full"), RunStatus::NodeTableFull),
    rule(Marker::Contains("statistics"), RunStatus::Finished),
    rule(Marker::Contains("timeout"), RunStatus::Timeout),
    rule(Marker::ContainsAll(&["Assertion", "failed"]), RunStatus::Error),
    StatusRule {
        marker: Marker::SingleLineContaining("WARNING"),
        outcome: Outcome::AsEmptyLog,
    },
];

const QUOKKASHARP_RULES: &[StatusRule] = &[rule(Marker::Contains("timeout"), RunStatus::Timeout)];

/// Rule table for a tool, in evaluation order.
pub fn rules_for(tool: Option<Tool>) -> &'static [StatusRule] {
    match tool {
        Some(Tool::QSylvan) => QSYLVAN_RULES,
        Some(Tool::QuokkaSharp) => QUOKKASHARP_RULES,
        Some(Tool::Mqt) | None => &[],
    }
}

/// First matching rule outcome for non-empty log text.
pub fn classify_text(tool: Option<Tool>, text: &str) -> Option<Outcome> {
    rules_for(tool)
        .iter()
        .find(|r| r.marker.matches(text))
        .map(|r| r.outcome)
}

/// Whether the json counterpart of a log exists and is zero bytes.
///
/// The experiment runner creates the json file up front, so an empty one
/// means the simulator never got to write its statistics.
pub fn json_is_empty(json_path: &Path) -> bool {
    fs::metadata(json_path).is_ok_and(|m| m.is_file() && m.len() == 0)
}

fn empty_log_status(json_path: &Path) -> RunStatus {
    if json_is_empty(json_path) {
        RunStatus::Timeout
    } else {
        RunStatus::Finished
    }
}

/// Infer how the run behind `log_path` terminated.
///
/// `json_path` is the run's json result file, consulted for empty logs.
pub fn infer_status(
    log_path: &Path,
    json_path: &Path,
    tool: Option<Tool>,
) -> ResultsResult<RunStatus> {
    let bytes = fs::read(log_path).map_err(|e| ResultsError::io(log_path, e))?;
    if bytes.is_empty() {
        return Ok(empty_log_status(json_path));
    }

    let text = String::from_utf8_lossy(&bytes);
    let status = match classify_text(tool, &text) {
        Some(Outcome::Status(status)) => status,
        Some(Outcome::AsEmptyLog) => empty_log_status(json_path),
        None => {
            warn!(
                "Could not get termination status from {}",
                log_path.display()
            );
            RunStatus::Unknown
        }
    };
    debug!(log = %log_path.display(), %status, "classified log");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qsylvan_rule_order() {
        let tool = Some(Tool::QSylvan);
        // table-full wins over the statistics marker printed before it
        let text = "statistics so far\nUnique table full\n";
        assert_eq!(
            classify_text(tool, text),
            Some(Outcome::Status(RunStatus::NodeTableFull))
        );
        assert_eq!(
            classify_text(tool, "Amplitude table full\nUnique table full"),
            Some(Outcome::Status(RunStatus::WeightTableFull))
        );
        assert_eq!(
            classify_text(tool, "sim: Assertion `x' failed.\n"),
            Some(Outcome::Status(RunStatus::Error))
        );
        assert_eq!(
            classify_text(tool, "slurmstepd: timeout reached\n"),
            Some(Outcome::Status(RunStatus::Timeout))
        );
    }

    #[test]
    fn test_single_warning_line_defers_to_empty_log_rule() {
        let tool = Some(Tool::QSylvan);
        assert_eq!(
            classify_text(tool, "WARNING: low memory\n"),
            Some(Outcome::AsEmptyLog)
        );
        // two lines no longer match
        assert_eq!(classify_text(tool, "WARNING: a\nWARNING: b\n"), None);
    }

    #[test]
    fn test_other_tools() {
        assert_eq!(
            classify_text(Some(Tool::QuokkaSharp), "timeout after 3600s"),
            Some(Outcome::Status(RunStatus::Timeout))
        );
        assert_eq!(classify_text(Some(Tool::Mqt), "timeout"), None);
        assert_eq!(classify_text(None, "statistics"), None);
    }

    #[test]
    fn test_marker_matching() {
        assert!(Marker::ContainsAll(&["a", "b"]).matches("b then a"));
        assert!(!Marker::ContainsAll(&["a", "b"]).matches("only a"));
        assert!(Marker::SingleLineContaining("W").matches("W"));
    }
}
