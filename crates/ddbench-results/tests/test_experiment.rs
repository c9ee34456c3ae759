//! End-to-end tests over temporary experiment directories.

use std::fs;
use std::path::Path;

use ddbench_results::{
    CategoryConfig, ExperimentDir, LoadOptions, ResultsError, RunStatus, SENTINEL_EXP_ID, Tool,
    compute_errors_from_json, load_errors_from_json, load_experiment, load_json, load_logs,
    load_meta,
};
use serde_json::json;
use tempfile::TempDir;

fn experiment() -> (TempDir, ExperimentDir) {
    let dir = tempfile::tempdir().unwrap();
    for sub in ["json", "logs", "meta"] {
        fs::create_dir(dir.path().join(sub)).unwrap();
    }
    let exp = ExperimentDir::new(dir.path());
    (dir, exp)
}

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn result_json(stats: serde_json::Value, state_vector: serde_json::Value) -> String {
    json!({"statistics": stats, "state_vector": state_vector}).to_string()
}

// ============================================================================
// load_json
// ============================================================================

#[test]
fn test_single_qsylvan_result() {
    let (_dir, exp) = experiment();
    write(
        &exp.json_dir().join("foo_qsylvan_1_7.json"),
        r#"{"statistics": {"workers": 2}}"#,
    );

    let table = load_json(&exp, &LoadOptions::default()).unwrap();
    assert_eq!(table.len(), 1);
    let row = &table.rows()[0];
    assert_eq!(row.exp_id, 7);
    assert_eq!(row.tool, Some(Tool::QSylvan));
    assert_eq!(row.workers, Some(2));
    assert_eq!(row.circuit.as_deref(), Some("foo"));
    assert_eq!(row.status, RunStatus::Finished);
}

#[test]
fn test_add_missing_backfills_legacy_fields() {
    let (_dir, exp) = experiment();
    write(
        &exp.json_dir().join("a_qsylvan_1_1.json"),
        r#"{"statistics": {"reorder": 0}}"#,
    );
    write(&exp.json_dir().join("b_qsylvan_1_2.json"), r#"{"statistics": {}}"#);

    let plain = load_json(&exp, &LoadOptions::default()).unwrap();
    assert!(plain.get(2).unwrap().field("reorder").is_none());

    let table = load_json(&exp, &LoadOptions { add_missing: true }).unwrap();
    assert_eq!(table.get(1).unwrap().u64_field("reorder"), Some(0));
    assert_eq!(table.get(1).unwrap().u64_field("wgt_inv_caching"), Some(1));
    assert_eq!(table.get(2).unwrap().u64_field("reorder"), Some(2));
}

#[test]
fn test_rows_follow_filename_order_and_skip_bad_files() {
    let (_dir, exp) = experiment();
    write(&exp.json_dir().join("c_mqt_3.json"), r#"{"statistics": {}}"#);
    write(&exp.json_dir().join("a_mqt_9.json"), r#"{"statistics": {}}"#);
    write(&exp.json_dir().join("b_mqt_5.json"), "{ truncated");
    write(&exp.json_dir().join("notes.txt"), "ignored");

    let table = load_json(&exp, &LoadOptions::default()).unwrap();
    let ids: Vec<u64> = table.iter().map(|r| r.exp_id).collect();
    assert_eq!(ids, vec![9, 3]);
}

// ============================================================================
// load_logs
// ============================================================================

#[test]
fn test_empty_json_and_log_is_timeout() {
    let (_dir, exp) = experiment();
    write(&exp.json_dir().join("ghz_qsylvan_1_4.json"), "");
    write(&exp.logs_dir().join("ghz_qsylvan_1_4.log"), "");

    let logs = load_logs(&exp).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs.rows()[0].exp_id, SENTINEL_EXP_ID);
    let row = logs.get(4).unwrap();
    assert_eq!(row.status, RunStatus::Timeout);
    assert_eq!(row.circuit.as_deref(), Some("ghz"));
    assert_eq!(row.workers, Some(1));

    assert!(load_json(&exp, &LoadOptions::default()).unwrap().is_empty());
}

#[test]
fn test_finished_logs_are_omitted() {
    let (_dir, exp) = experiment();
    write(&exp.json_dir().join("qft_qsylvan_8_1.json"), r#"{"statistics": {}}"#);
    write(&exp.logs_dir().join("qft_qsylvan_8_1.log"), "");
    write(
        &exp.logs_dir().join("qft_qsylvan_8_2.log"),
        "printing statistics\n",
    );
    write(
        &exp.logs_dir().join("qft_qsylvan_8_3.log"),
        "run\nUnique table full\n",
    );
    write(&exp.logs_dir().join("qft_mqt_4.log"), "segfault\n");

    let logs = load_logs(&exp).unwrap();
    let rows: Vec<(u64, RunStatus)> = logs.iter().map(|r| (r.exp_id, r.status)).collect();
    assert_eq!(
        rows,
        vec![
            (0, RunStatus::Unknown),
            (4, RunStatus::Unknown),
            (3, RunStatus::NodeTableFull),
        ]
    );
    assert_eq!(logs.get(3).unwrap().workers, Some(8));
}

#[test]
fn test_logs_without_runs_still_have_sentinel() {
    let (_dir, exp) = experiment();
    let logs = load_logs(&exp).unwrap();
    assert_eq!(logs.len(), 1);
    assert!(logs.rows()[0].is_sentinel());
}

// ============================================================================
// reconciliation
// ============================================================================

#[test]
fn test_load_experiment_reconciles_sources() {
    let (_dir, exp) = experiment();
    write(
        &exp.json_dir().join("grover_4_qsylvan_1_1.json"),
        r#"{"statistics": {"n_qubits": 4}}"#,
    );
    write(&exp.json_dir().join("grover_4_qsylvan_2_2.json"), "");
    write(&exp.logs_dir().join("grover_4_qsylvan_2_2.log"), "");
    write(
        &exp.meta_dir().join("run1.json"),
        r#"{"exp_id": 1, "node": "n01", "n_qubits": 99}"#,
    );
    write(&exp.meta_dir().join("run7.json"), r#"{"exp_id": 7, "node": "n07"}"#);
    write(&exp.meta_dir().join("broken.json"), "[");

    assert_eq!(load_meta(&exp).unwrap().len(), 2);

    let table = load_experiment(&exp, &LoadOptions::default()).unwrap();
    assert_eq!(table.len(), 2);
    let first = table.get(1).unwrap();
    assert_eq!(first.str_field("node"), Some("n01"));
    assert_eq!(first.u64_field("n_qubits"), Some(4));
    let second = table.get(2).unwrap();
    assert_eq!(second.status, RunStatus::Timeout);
    assert_eq!(second.workers, Some(2));
    assert!(!table.contains(7));
}

#[test]
fn test_non_utf8_meta_file_is_skipped() {
    let (_dir, exp) = experiment();
    write(&exp.json_dir().join("ghz_qsylvan_1_1.json"), r#"{"statistics": {}}"#);
    write(&exp.meta_dir().join("good.json"), r#"{"exp_id": 1, "node": "n01"}"#);
    fs::write(exp.meta_dir().join("bad.json"), [0xff, 0xfe]).unwrap();

    assert_eq!(load_meta(&exp).unwrap().len(), 1);
    let table = load_experiment(&exp, &LoadOptions::default()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(1).unwrap().str_field("node"), Some("n01"));
}

#[test]
fn test_load_experiment_without_logs_or_meta() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("json")).unwrap();
    write(
        &dir.path().join("json").join("a_mqt_1.json"),
        r#"{"statistics": {}}"#,
    );
    let table = load_experiment(&ExperimentDir::new(dir.path()), &LoadOptions::default()).unwrap();
    assert_eq!(table.len(), 1);
}

#[test]
fn test_categorize_from_config_file() {
    let (dir, exp) = experiment();
    write(&exp.json_dir().join("qft_5_mqt_1.json"), r#"{"statistics": {}}"#);
    let config_path = dir.path().join("categories.json");
    write(
        &config_path,
        r#"{"circuit_types": {"qft": {"domain": "arithmetic"}}, "use_category": "domain", "order": ["arithmetic"]}"#,
    );

    let config = CategoryConfig::from_file(&config_path).unwrap();
    let mut table = load_experiment(&exp, &LoadOptions::default()).unwrap();
    table.categorize(&config);
    let category = table.get(1).unwrap().category.clone().unwrap();
    assert_eq!(category.label, "arithmetic");
    assert_eq!(category.rank, 0);
}

// ============================================================================
// ground-truth errors
// ============================================================================

fn ground_truth_experiment() -> (TempDir, ExperimentDir) {
    let (dir, exp) = experiment();
    let truth = result_json(
        json!({"precision": 128, "tolerance": 0.0, "workers": 1}),
        json!([[0.6, 0.0], [0.0, 0.8]]),
    );
    let bench = result_json(
        json!({"precision": 64, "tolerance": 1e-6, "workers": 4}),
        json!([[0.5, 0.0], [0.0, 0.8]]),
    );
    write(&exp.json_dir().join("X_qsylvan_1_1.json"), &truth);
    write(&exp.json_dir().join("X_qsylvan_4_2.json"), &bench);
    (dir, exp)
}

#[test]
fn test_one_report_per_benchmark_run() {
    let (dir, exp) = ground_truth_experiment();
    let table = load_json(&exp, &LoadOptions::default()).unwrap();
    let errors_dir = dir.path().join("out").join("errors");

    let errors = compute_errors_from_json(&table, &exp.json_dir(), &errors_dir).unwrap();
    assert_eq!(errors.len(), 1);
    let report = errors.get(2).unwrap();
    assert!((report.max_error_abs - 0.1).abs() < 1e-12);
    assert!((report.max_error_rel.unwrap() - 0.1 / 0.6).abs() < 1e-12);

    assert!(errors_dir.join("X_qsylvan_4_2.json").is_file());
    assert!(!errors_dir.join("X_qsylvan_1_1.json").exists());
}

#[test]
fn test_existing_errors_dir_is_rejected() {
    let (dir, exp) = ground_truth_experiment();
    let table = load_json(&exp, &LoadOptions::default()).unwrap();
    let errors_dir = dir.path().join("errors");
    fs::create_dir(&errors_dir).unwrap();

    let err = compute_errors_from_json(&table, &exp.json_dir(), &errors_dir).unwrap_err();
    assert!(matches!(err, ResultsError::OutputExists(ref p) if p == &errors_dir));
    assert_eq!(fs::read_dir(&errors_dir).unwrap().count(), 0);
}

#[test]
fn test_reload_matches_computed_errors() {
    let (dir, exp) = ground_truth_experiment();
    write(
        &exp.json_dir().join("X_qsylvan_2_3.json"),
        &result_json(json!({"precision": 32}), json!([[0.0, 0.0], [0.0, 1.0]])),
    );
    let table = load_json(&exp, &LoadOptions::default()).unwrap();
    let errors_dir = dir.path().join("errors");

    let computed = compute_errors_from_json(&table, &exp.json_dir(), &errors_dir).unwrap();
    let reloaded = load_errors_from_json(&errors_dir).unwrap();
    assert_eq!(computed.len(), 2);
    assert_eq!(computed, reloaded);
}

#[test]
fn test_unpairable_files_are_skipped() {
    let (dir, exp) = ground_truth_experiment();
    // no ground truth for circuit Y
    write(
        &exp.json_dir().join("Y_qsylvan_4_5.json"),
        &result_json(json!({"precision": 64, "tolerance": 1e-3}), json!([[1.0, 0.0]])),
    );
    // wrong length
    write(
        &exp.json_dir().join("X_qsylvan_4_6.json"),
        &result_json(json!({"precision": 64}), json!([[1.0, 0.0]])),
    );
    // no state vector
    write(
        &exp.json_dir().join("X_qsylvan_4_8.json"),
        r#"{"statistics": {"precision": 64}}"#,
    );
    let table = load_json(&exp, &LoadOptions::default()).unwrap();
    let errors_dir = dir.path().join("errors");

    let errors = compute_errors_from_json(&table, &exp.json_dir(), &errors_dir).unwrap();
    let ids: Vec<u64> = errors.iter().map(|r| r.exp_id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(fs::read_dir(&errors_dir).unwrap().count(), 1);
}

#[test]
fn test_ground_truth_without_state_vector_yields_no_reports() {
    let (dir, exp) = experiment();
    write(
        &exp.json_dir().join("X_qsylvan_1_1.json"),
        r#"{"statistics": {"precision": 128, "tolerance": 0.0, "workers": 1}}"#,
    );
    for name in ["X_qsylvan_4_2.json", "X_qsylvan_4_3.json"] {
        write(
            &exp.json_dir().join(name),
            &result_json(json!({"precision": 64}), json!([[1.0, 0.0]])),
        );
    }
    let table = load_json(&exp, &LoadOptions::default()).unwrap();
    let errors_dir = dir.path().join("errors");

    let errors = compute_errors_from_json(&table, &exp.json_dir(), &errors_dir).unwrap();
    assert!(errors.is_empty());
    assert_eq!(fs::read_dir(&errors_dir).unwrap().count(), 0);
}

#[test]
fn test_non_utf8_error_report_is_skipped() {
    let (dir, exp) = ground_truth_experiment();
    let table = load_json(&exp, &LoadOptions::default()).unwrap();
    let errors_dir = dir.path().join("errors");
    compute_errors_from_json(&table, &exp.json_dir(), &errors_dir).unwrap();
    fs::write(errors_dir.join("X_qsylvan_4_9.json"), [0xff, 0xfe]).unwrap();

    let errors = load_errors_from_json(&errors_dir).unwrap();
    let ids: Vec<u64> = errors.iter().map(|r| r.exp_id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn test_merge_errors_into_loaded_table() {
    let (dir, exp) = ground_truth_experiment();
    let mut table = load_json(&exp, &LoadOptions::default()).unwrap();
    let errors_dir = dir.path().join("errors");
    compute_errors_from_json(&table, &exp.json_dir(), &errors_dir).unwrap();

    table.merge_errors(&load_errors_from_json(&errors_dir).unwrap());
    assert_eq!(table.len(), 2);
    assert!(table.get(1).unwrap().field("max_error_abs").is_none());
    assert!(table.get(2).unwrap().f64_field("max_error_abs").is_some());
}
