//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `VcError` as one variant
//! via a `From` impl, so `?` works across crate boundaries.

use thiserror::Error;

/// The top-level error type for `vc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum VcError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `vc-*` crates.
pub type VcResult<T> = Result<T, VcError>;
