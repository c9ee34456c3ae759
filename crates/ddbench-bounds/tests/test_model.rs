//! Tests for the exact and approximate error formulas.

use std::str::FromStr;

use ddbench_bounds::{BigDecimal, ErrorModel, ErrorParameters, Form};

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn relative_gap(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    ((a - b) / b).abs()
}

// ---------------------------------------------------------------------------
// error1
// ---------------------------------------------------------------------------

#[test]
fn error1_forms_agree_to_ten_significant_figures() {
    let model = ErrorModel::default();
    let eps = dec("1e-15");
    let exact = model.error1(10, &eps, Form::Exact).unwrap();
    let approx = model.error1(10, &eps, Form::Approximate).unwrap();

    assert!(exact >= approx);
    assert!(relative_gap(&exact, &approx) < dec("1e-10"));
}

#[test]
fn error1_exact_keeps_digits_lost_in_binary_floats() {
    let model = ErrorModel::default();
    let eps = dec("1e-17");
    let exact = model.error1(1000, &eps, Form::Exact).unwrap();

    // (1 + 1e-17) == 1 in f64, so the naive float formula gives zero.
    let naive = (1.0f64 + 1e-17).powi(1000) - 1.0;
    assert_eq!(naive, 0.0);
    assert_eq!(exact.with_prec(6), dec("1e-14"));
}

#[test]
fn error1_forms_converge_as_epsilon_shrinks() {
    let model = ErrorModel::default();
    let gap_large = {
        let eps = dec("1e-6");
        relative_gap(
            &model.error1(50, &eps, Form::Exact).unwrap(),
            &model.error1(50, &eps, Form::Approximate).unwrap(),
        )
    };
    let gap_small = {
        let eps = dec("1e-12");
        relative_gap(
            &model.error1(50, &eps, Form::Exact).unwrap(),
            &model.error1(50, &eps, Form::Approximate).unwrap(),
        )
    };
    assert!(gap_small < gap_large);
}

// ---------------------------------------------------------------------------
// error2
// ---------------------------------------------------------------------------

#[test]
fn error2_approximation_overshoots_by_at_most_delta() {
    let model = ErrorModel::default();
    let delta = dec("1e-10");
    let eps = dec("1e-15");
    for n in [0u32, 1, 5, 20, 40] {
        let exact = model.error2(n, &delta, &eps, Form::Exact).unwrap();
        let approx = model.error2(n, &delta, &eps, Form::Approximate).unwrap();
        assert!(exact >= &approx - &delta, "n = {n}");
    }
}

#[test]
fn error2_without_epsilon_is_geometric_sum() {
    let model = ErrorModel::default();
    let delta = dec("0.001");
    let zero = dec("0");
    let exact = model.error2(20, &delta, &zero, Form::Exact).unwrap();
    let approx = model.error2(20, &delta, &zero, Form::Approximate).unwrap();
    assert_eq!(exact, &approx - &delta);
}

#[test]
fn error2_large_n_does_not_overflow() {
    let model = ErrorModel::default();
    let value = model
        .error2(2000, &dec("1e-300"), &dec("1e-15"), Form::Exact)
        .unwrap();
    assert!(value > dec("1e300"));
}

// ---------------------------------------------------------------------------
// compute_error / suggest_delta
// ---------------------------------------------------------------------------

#[test]
fn compute_error_is_sum_of_terms() {
    let model = ErrorModel::default();
    let params = ErrorParameters::from_f64(16, 1e-15, 1e-9).unwrap();
    for form in [Form::Exact, Form::Approximate] {
        let e1 = model.error1(params.n, &params.epsilon, form).unwrap();
        let e2 = model
            .error2(params.n, &params.delta, &params.epsilon, form)
            .unwrap();
        assert_eq!(model.compute_error(&params, form).unwrap(), &e1 + &e2);
    }
}

#[test]
fn suggest_delta_positive_in_feasible_regime() {
    let model = ErrorModel::default();
    let suggestion = model
        .suggest_delta(20, &dec("1e-16"), &dec("1e-6"))
        .unwrap();
    assert!(suggestion.is_feasible());
    assert!(suggestion.to_f64() > 0.0);
}

#[test]
fn suggest_delta_deep_circuit_is_not_an_error() {
    let model = ErrorModel::default();
    let suggestion = model.suggest_delta(60, &dec("1e-16"), &dec("1e-3"));
    assert!(suggestion.is_ok());
}

#[test]
fn suggest_delta_round_trips_through_approximate_model() {
    let model = ErrorModel::default();
    let eps = dec("1e-16");
    let target = dec("1e-6");
    let n = 20;

    let delta = model.suggest_delta(n, &eps, &target).unwrap().value;
    let e1 = model.error1(n, &eps, Form::Approximate).unwrap();
    let e2 = model.error2(n, &delta, &eps, Form::Approximate).unwrap();

    let recovered = e1 + e2;
    assert!((recovered - &target).abs() <= &target * dec("1e-100"));
}

#[test]
fn models_with_different_precision_coexist() {
    let coarse = ErrorModel::new(20).unwrap();
    let fine = ErrorModel::default();
    let eps = dec("1e-15");

    let a = coarse.error1(7, &eps, Form::Exact).unwrap();
    let b = fine.error1(7, &eps, Form::Exact).unwrap();
    assert_eq!(coarse.precision(), 20);
    assert_eq!(fine.precision(), 128);
    assert_eq!(a.with_prec(10), b.with_prec(10));
}
