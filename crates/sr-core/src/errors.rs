//! Error types for segmented regression.
//!
//! A flat `thiserror`-derived enum covers the error classes the
//! specification distinguishes: configuration mistakes the caller makes
//! before any computation runs, malformed input, and popping an
//! accumulator with nothing left in it. Numeric degeneracies (zero
//! x-variance, zero RSS) are deliberately *not* represented here — they
//! are absorbed into sentinel error values internally and never surface
//! to the caller.

use thiserror::Error;

/// The error type returned by [`crate::errors::Result`] operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Unknown scoring mode, or a non-positive epsilon. Raised at
    /// configuration time, before any data is touched.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Mismatched `xs`/`ys` lengths, malformed pairs, or empty input.
    /// Raised before any computation.
    #[error("invalid input: {0}")]
    Input(String),

    /// Attempted to pop a value from an accumulator holding none.
    #[error("cannot pop from an empty accumulator")]
    Empty,
}

/// Shorthand `Result` type used throughout the segmented-regression crates.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Equivalent to a `QL_REQUIRE`-style precondition check: returns
/// `Err(Error::Config(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use sr_core::{ensure_config, errors::Error};
/// fn with_mode(mode: &str) -> sr_core::errors::Result<()> {
///     ensure_config!(mode == "BIC" || mode == "AIC" || mode == "RSS", "unknown mode {mode}");
///     Ok(())
/// }
/// assert!(with_mode("BIC").is_ok());
/// assert!(with_mode("nope").is_err());
/// ```
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Config(format!($($msg)*)));
        }
    };
}

/// Returns `Err(Error::Input(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use sr_core::{ensure_input, errors::Error};
/// fn same_len(xs: &[f64], ys: &[f64]) -> sr_core::errors::Result<()> {
///     ensure_input!(xs.len() == ys.len(), "xs and ys must have the same length");
///     Ok(())
/// }
/// assert!(same_len(&[1.0], &[2.0]).is_ok());
/// assert!(same_len(&[1.0], &[]).is_err());
/// ```
#[macro_export]
macro_rules! ensure_input {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Input(format!($($msg)*)));
        }
    };
}
