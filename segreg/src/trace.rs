//! The diagnostic trace a split search leaves behind (§4.4).
//!
//! Every leaf or node produced by [`crate::splitter::compute_best_fit`]
//! carries one of these. It records the error of keeping the run unsplit,
//! the error observed at each boundary position the sweep visited, and the
//! error of the position ultimately chosen. It powers post-hoc diagnostics
//! only — nothing in [`crate::tree`] consults it during inference.

use sr_core::Real;

/// One boundary position visited while sweeping a candidate split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepStep {
    /// The `x` value at the boundary after the shift (the candidate
    /// threshold).
    pub threshold: Real,
    /// The combined left+right error at this boundary.
    pub error: Real,
}

/// The trace of one call to [`crate::splitter::compute_best_fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorTrace {
    /// The error of not splitting at all.
    pub nosplit_error: Real,
    /// Every boundary position visited during the sweep, in sweep order.
    pub sweep: Vec<SweepStep>,
    /// The error of the position that was ultimately chosen (`nosplit_error`
    /// if no split improved on it).
    pub best_error: Real,
}

impl ErrorTrace {
    /// `true` if the sweep found no position improving on `nosplit_error`.
    pub fn accepted_nosplit(&self) -> bool {
        self.best_error >= self.nosplit_error
    }
}
