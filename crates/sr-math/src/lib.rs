//! # sr-math
//!
//! Incremental statistics ([`stats::IncrementalStat`]), OLS significance
//! testing ([`ols`]), comparison helpers ([`comparison`]), and small
//! `nalgebra`-backed `Array`/`Matrix` newtypes used by the significance
//! collaborator's design-matrix solve.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod array;
pub mod comparison;
pub mod distributions;
pub mod linear_least_squares;
pub mod matrix;
pub mod matrix_utilities;
pub mod ols;
pub mod stats;
