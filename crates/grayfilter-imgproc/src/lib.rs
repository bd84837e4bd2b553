#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// border handling for out-of-bounds kernel taps.
pub mod border;

/// error types for the filtering operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// module containing parallization utilities.
pub mod parallel;

pub use crate::error::FilterError;
