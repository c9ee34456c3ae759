//! CLI command implementations.

pub mod bound;
pub mod common;
pub mod errors;
pub mod load;
pub mod suggest_delta;
pub mod sweep;
pub mod version;
