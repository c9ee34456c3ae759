//! `ddbench-results` - loading and reconciling benchmark runs of
//! decision-diagram quantum simulators.
//!
//! An experiment directory holds three views of the same runs, keyed by
//! `exp_id`:
//!
//! - `json/`: statistics and final state vector of runs that finished
//! - `logs/`: simulator output, the only trace of runs that did not
//! - `meta/`: free-form metadata written by the experiment runner
//!
//! [`load_experiment`] turns them into one [`ResultsTable`]. Ground-truth
//! state-vector errors are computed with [`compute_errors_from_json`] and
//! merged back with [`ResultsTable::merge_errors`].
//!
//! ```rust,no_run
//! use ddbench_results::{ExperimentDir, LoadOptions, load_experiment};
//!
//! let exp = ExperimentDir::new("results/2024-06-exp1");
//! let table = load_experiment(&exp, &LoadOptions { add_missing: true })?;
//! for row in &table {
//!     println!("{} {:?} {}", row.exp_id, row.circuit, row.status);
//! }
//! # Ok::<(), ddbench_results::ResultsError>(())
//! ```

pub mod backfill;
pub mod category;
pub mod error;
pub mod fidelity;
pub mod loader;
pub mod naming;
pub mod record;
pub mod status;
pub mod table;

pub use category::{Category, CategoryConfig, assign_category, sharing_category};
pub use error::{ResultsError, ResultsResult};
pub use fidelity::{
    ErrorReport, ErrorTable, amplitude_errors, compute_errors_from_json, load_errors_from_json,
    select_ground_truths,
};
pub use loader::{ExperimentDir, LoadOptions, load_experiment, load_json, load_logs, load_meta};
pub use record::{ExperimentRecord, RunStatus, SENTINEL_EXP_ID, Tool};
pub use status::infer_status;
pub use table::{MetaTable, ResultsTable};
