//! Decimal helpers shared by the error formulas.
//!
//! Every helper that rounds takes the precision explicitly; nothing here
//! reads ambient state.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{BoundsError, BoundsResult};

/// Convert a float to a decimal through its shortest round-tripping
/// representation, so `1e-15` becomes exactly 10⁻¹⁵.
pub fn from_f64(name: &'static str, value: f64) -> BoundsResult<BigDecimal> {
    if !value.is_finite() {
        return Err(BoundsError::NonFinite { name, value });
    }
    // `{:e}` of a finite f64 is always parseable.
    BigDecimal::from_str(&format!("{value:e}")).map_err(|_| BoundsError::NonFinite { name, value })
}

/// Convert a decimal to `f64` for presentation. NaN if the value has no
/// f64 rendering.
pub fn to_f64(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Reject negative inputs.
pub fn ensure_non_negative(name: &'static str, value: &BigDecimal) -> BoundsResult<()> {
    if *value < BigDecimal::zero() {
        return Err(BoundsError::Negative {
            name,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// `base^exp` with every intermediate product rounded to `prec` digits.
pub fn pow_rounded(base: &BigDecimal, mut exp: u32, prec: u64) -> BigDecimal {
    let mut result = BigDecimal::one();
    let mut acc = base.with_prec(prec);
    while exp > 0 {
        if exp & 1 == 1 {
            result = (&result * &acc).with_prec(prec);
        }
        exp >>= 1;
        if exp > 0 {
            acc = (&acc * &acc).with_prec(prec);
        }
    }
    result
}

/// `base^exp` for a small integer base, exact.
pub fn int_pow(base: u32, exp: u32) -> BigDecimal {
    BigDecimal::new(BigInt::from(base).pow(exp), 0)
}

/// `10^-exp`, exact.
pub fn ten_pow_neg(exp: u32) -> BigDecimal {
    BigDecimal::new(BigInt::one(), i64::from(exp))
}
