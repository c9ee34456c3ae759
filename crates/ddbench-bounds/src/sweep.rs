//! Error-vs-n series for a set of truncation thresholds.
//!
//! These are the curves of the "error bound vs n" plot: one series per δ,
//! one point per n, all sharing a single ε. Values leave decimal arithmetic
//! here.

use serde::{Deserialize, Serialize};

use crate::decimal;
use crate::error::BoundsResult;
use crate::model::{ErrorModel, Form};

/// One `(n, error)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub n: u32,
    pub error: f64,
}

/// `error2` as a function of `n` for a fixed δ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSeries {
    /// Truncation threshold of this series.
    pub delta: f64,
    /// Legend label, e.g. `$\delta = 1 \times 10^{-10}$`.
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

impl ErrorModel {
    /// Evaluate `error2` for every `(delta, n)` pair.
    ///
    /// Series follow the order of `deltas`; points follow the order of `ns`.
    pub fn sweep_error2(
        &self,
        ns: &[u32],
        deltas: &[f64],
        epsilon: f64,
        form: Form,
    ) -> BoundsResult<Vec<ErrorSeries>> {
        let eps = decimal::from_f64("epsilon", epsilon)?;
        let mut series = Vec::with_capacity(deltas.len());

        for &delta in deltas {
            let delta_dec = decimal::from_f64("delta", delta)?;
            let mut points = Vec::with_capacity(ns.len());
            for &n in ns {
                let error = self.error2(n, &delta_dec, &eps, form)?;
                points.push(SeriesPoint {
                    n,
                    error: decimal::to_f64(&error),
                });
            }
            series.push(ErrorSeries {
                delta,
                label: format!("$\\delta = {}$", latex_float(delta)),
                points,
            });
        }

        Ok(series)
    }
}

/// Render a float with two significant digits, switching to
/// `m \times 10^{e}` outside `1e-4 ..< 100`.
pub fn latex_float(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }

    let sci = format!("{value:.1e}");
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..2).contains(&exponent) {
        let decimals = usize::try_from(1 - exponent).unwrap_or(0);
        return trim_zeros(&format!("{value:.decimals$}")).to_string();
    }

    format!("{} \\times 10^{{{exponent}}}", trim_zeros(mantissa))
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
