//! `ddbench-bounds` - numeric error bounds for approximate decision-diagram
//! simulation.
//!
//! Two contributions are modelled for a simulation of depth `n`:
//!
//! - **error1**: floating-point growth, `(1+ε)^n − 1 ≈ n·ε`
//! - **error2**: truncation with threshold δ, `δ·Σ 2^j (1+ε)^j ≈ δ·2^(n+1)`
//!
//! The exact forms are computed with arbitrary-precision decimals at a
//! precision chosen per [`ErrorModel`] (128 significant digits by default).
//! Conversion to `f64` happens only when values are printed or tabulated.
//!
//! # Quick start
//!
//! ```rust
//! use ddbench_bounds::{ErrorModel, ErrorParameters, Form};
//!
//! let model = ErrorModel::default();
//! let params = ErrorParameters::from_f64(20, 1e-15, 1e-10).unwrap();
//! let total = model.compute_error(&params, Form::Exact).unwrap();
//! assert!(total > params.delta);
//!
//! let delta = model
//!     .suggest_delta(20, &params.epsilon, &total)
//!     .unwrap();
//! assert!(delta.is_feasible());
//! ```

pub mod decimal;
pub mod error;
pub mod model;
pub mod sweep;

pub use bigdecimal::BigDecimal;
pub use error::{BoundsError, BoundsResult};
pub use model::{
    BreakdownF64, DEFAULT_PRECISION, DeltaSuggestion, ErrorBreakdown, ErrorModel, ErrorParameters,
    Form,
};
pub use sweep::{ErrorSeries, SeriesPoint, latex_float};
