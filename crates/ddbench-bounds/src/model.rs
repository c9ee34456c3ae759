//! Error bounds for approximate decision-diagram simulation.
//!
//! After `n` steps the accumulated error splits into two contributions:
//!
//!   error1 = (1 + ε)^n − 1                     ≈ n·ε
//!   error2 = δ · Σ_{j=0}^{n} 2^j (1 + ε)^j     ≈ δ · 2^(n+1)
//!
//! `error1` is the compounding relative error of `n` multiplications with
//! relative error ε. `error2` is a truncation of size δ at every level,
//! amplified by the doubling of the tree below it and by the floating-point
//! growth after it.
//!
//! The exact forms subtract values very close to 1, so they are evaluated in
//! decimal arithmetic at the precision carried by [`ErrorModel`].

use bigdecimal::BigDecimal;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::{self, ensure_non_negative, int_pow, pow_rounded, ten_pow_neg};
use crate::error::{BoundsError, BoundsResult};

/// Default number of significant decimal digits.
pub const DEFAULT_PRECISION: u64 = 128;

/// Extra digits carried through intermediate products.
const GUARD_DIGITS: u64 = 16;

/// Number of tree levels, `n + 1`, for a depth `n`.
fn levels(n: u32) -> BoundsResult<u32> {
    n.checked_add(1).ok_or(BoundsError::DepthOverflow(n))
}

/// Which form of a formula to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Form {
    /// Closed form / finite sum, evaluated in high precision.
    #[default]
    Exact,
    /// First-order asymptotic approximation.
    Approximate,
}

impl Form {
    /// Map an `approx` flag onto a form.
    pub fn from_approx(approx: bool) -> Self {
        if approx {
            Form::Approximate
        } else {
            Form::Exact
        }
    }
}

/// Inputs to the error formulas.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorParameters {
    /// Iteration count / circuit depth.
    pub n: u32,
    /// Per-operation relative floating-point error bound.
    pub epsilon: BigDecimal,
    /// Per-step truncation threshold.
    pub delta: BigDecimal,
}

impl ErrorParameters {
    /// Build parameters from decimals, rejecting negative `epsilon`/`delta`.
    pub fn new(n: u32, epsilon: BigDecimal, delta: BigDecimal) -> BoundsResult<Self> {
        ensure_non_negative("epsilon", &epsilon)?;
        ensure_non_negative("delta", &delta)?;
        Ok(Self { n, epsilon, delta })
    }

    /// Build parameters from floats via their shortest decimal rendering.
    pub fn from_f64(n: u32, epsilon: f64, delta: f64) -> BoundsResult<Self> {
        Self::new(
            n,
            decimal::from_f64("epsilon", epsilon)?,
            decimal::from_f64("delta", delta)?,
        )
    }
}

/// Both contributions and their sum for one parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBreakdown {
    /// Floating-point compounding term.
    pub error1: BigDecimal,
    /// Truncation term.
    pub error2: BigDecimal,
    /// `error1 + error2`.
    pub total: BigDecimal,
}

/// [`ErrorBreakdown`] converted for printing or plotting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakdownF64 {
    pub error1: f64,
    pub error2: f64,
    pub total: f64,
}

impl ErrorBreakdown {
    /// Convert to floats. Only call this at the presentation boundary.
    pub fn to_f64(&self) -> BreakdownF64 {
        BreakdownF64 {
            error1: decimal::to_f64(&self.error1),
            error2: decimal::to_f64(&self.error2),
            total: decimal::to_f64(&self.total),
        }
    }
}

/// A delta recommended for a target total error.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaSuggestion {
    /// `(target − n·ε) / 2^(n+1)`. Zero or negative when the target is
    /// already consumed by `error1`.
    pub value: BigDecimal,
}

impl DeltaSuggestion {
    /// Whether any positive delta meets the target.
    pub fn is_feasible(&self) -> bool {
        self.value > BigDecimal::zero()
    }

    /// Float value for printing.
    pub fn to_f64(&self) -> f64 {
        decimal::to_f64(&self.value)
    }
}

/// Error-bound evaluator with a fixed decimal precision.
///
/// Models with different precisions can be used side by side; nothing is
/// stored globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorModel {
    precision: u64,
}

impl Default for ErrorModel {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl ErrorModel {
    /// Create a model rounding to `precision` significant digits.
    pub fn new(precision: u64) -> BoundsResult<Self> {
        if precision == 0 {
            return Err(BoundsError::InvalidPrecision(precision));
        }
        Ok(Self { precision })
    }

    /// Significant digits of every result.
    pub fn precision(&self) -> u64 {
        self.precision
    }

    fn working_precision(&self) -> u64 {
        self.precision + GUARD_DIGITS
    }

    /// Floating-point compounding error after `n` multiplications.
    ///
    /// Exact: `(1+ε)^n − 1`. Approximate: `n·ε`.
    pub fn error1(&self, n: u32, epsilon: &BigDecimal, form: Form) -> BoundsResult<BigDecimal> {
        ensure_non_negative("epsilon", epsilon)?;
        let value = match form {
            Form::Exact => {
                let work = self.working_precision();
                let one = BigDecimal::one();
                let growth = pow_rounded(&(&one + epsilon), n, work);
                growth - one
            }
            Form::Approximate => BigDecimal::from(n) * epsilon,
        };
        Ok(value.with_prec(self.precision))
    }

    /// Truncation error accumulated over `n + 1` levels.
    ///
    /// Exact: `δ · Σ_{j=0}^{n} 2^j (1+ε)^j`, summed term by term.
    /// Approximate: `δ · 2^(n+1)`.
    pub fn error2(
        &self,
        n: u32,
        delta: &BigDecimal,
        epsilon: &BigDecimal,
        form: Form,
    ) -> BoundsResult<BigDecimal> {
        ensure_non_negative("delta", delta)?;
        ensure_non_negative("epsilon", epsilon)?;
        let k = levels(n)?;
        let value = match form {
            Form::Exact => {
                let work = self.working_precision();
                let ratio = (BigDecimal::from(2) * (BigDecimal::one() + epsilon)).with_prec(work);
                let mut term = BigDecimal::one();
                let mut sum = BigDecimal::zero();
                for _ in 0..k {
                    sum = (&sum + &term).with_prec(work);
                    term = (&term * &ratio).with_prec(work);
                }
                sum * delta
            }
            Form::Approximate => delta * int_pow(2, k),
        };
        Ok(value.with_prec(self.precision))
    }

    /// `error1 + error2`, both evaluated in the same form.
    pub fn compute_error(&self, params: &ErrorParameters, form: Form) -> BoundsResult<BigDecimal> {
        Ok(self.breakdown(params, form)?.total)
    }

    /// Both contributions and their sum.
    pub fn breakdown(&self, params: &ErrorParameters, form: Form) -> BoundsResult<ErrorBreakdown> {
        let error1 = self.error1(params.n, &params.epsilon, form)?;
        let error2 = self.error2(params.n, &params.delta, &params.epsilon, form)?;
        let total = &error1 + &error2;
        debug!(n = params.n, ?form, total = %total, "evaluated error bound");
        Ok(ErrorBreakdown {
            error1,
            error2,
            total,
        })
    }

    /// Invert the approximate model: the delta that makes
    /// `n·ε + δ·2^(n+1)` equal `target_error`.
    ///
    /// The result is returned as computed, including zero or negative values
    /// when `target_error <= n·ε`; check [`DeltaSuggestion::is_feasible`].
    pub fn suggest_delta(
        &self,
        n: u32,
        epsilon: &BigDecimal,
        target_error: &BigDecimal,
    ) -> BoundsResult<DeltaSuggestion> {
        ensure_non_negative("epsilon", epsilon)?;
        let k = levels(n)?;
        let budget = target_error - BigDecimal::from(n) * epsilon;
        // x / 2^k == x * 5^k * 10^-k, exact in decimal
        let value = (budget * int_pow(5, k) * ten_pow_neg(k)).with_prec(self.precision);
        let suggestion = DeltaSuggestion { value };
        if !suggestion.is_feasible() {
            debug!(n, epsilon = %epsilon, target = %target_error, "no feasible delta");
        }
        Ok(suggestion)
    }
}
