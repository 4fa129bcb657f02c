//! Incremental moments accumulator.
//!
//! Generalizes the workspace's plain [`crate`] statistics helpers with two
//! things a segmented regression needs that a one-shot accumulator doesn't:
//! an undo (`pop`) that exactly reverses the most recent `add` in O(1), and
//! a configurable projection `φ` so the same accumulator shape can track
//! both `Σxᵢ` and `Σxᵢ²` style moments. Mean and variance are kept by
//! Welford's recurrence rather than by the naive `Σx`, `Σx²` formulas, since
//! the naive form loses precision by cancellation for large sums.

use sr_core::errors::{Error, Result};
use sr_core::Real;

/// A finite sequence of real numbers under a projection `φ`, supporting
/// O(1) `add`/`pop`/`mean`/`variance`/`sum` via Welford's online recurrence.
///
/// The insertion history is kept as a stack of `(mean, M2)` pairs so that
/// `pop` can restore the exact prior moments without recomputing from
/// scratch — this is what makes the splitter's boundary sweep (shifting one
/// observation at a time between two accumulators) an O(1)-per-step
/// operation instead of an O(n) one.
#[derive(Debug, Clone)]
pub struct IncrementalStat<F = fn(Real) -> Real>
where
    F: Fn(Real) -> Real,
{
    projection: F,
    values: Vec<Real>,
    /// `means[k]` is the mean of the first `k` projected values; `means[0] == 0`.
    means: Vec<Real>,
    /// `m2s[k]` is the sum of squared deviations from the mean of the first
    /// `k` projected values; `m2s[0] == 0`.
    m2s: Vec<Real>,
}

impl IncrementalStat<fn(Real) -> Real> {
    /// An accumulator over the raw values (`φ = identity`).
    pub fn identity() -> Self {
        Self::with_projection(|x| x)
    }

    /// An accumulator over the squared values (`φ(x) = x²`).
    pub fn squared() -> Self {
        Self::with_projection(|x| x * x)
    }
}

impl<F> IncrementalStat<F>
where
    F: Fn(Real) -> Real,
{
    /// An accumulator under an arbitrary projection `φ`.
    pub fn with_projection(projection: F) -> Self {
        Self {
            projection,
            values: Vec::new(),
            means: vec![0.0],
            m2s: vec![0.0],
        }
    }

    /// Number of elements currently held.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// `true` if no elements are held.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append `v` (the raw, unprojected value). O(1).
    pub fn add(&mut self, v: Real) {
        let phi = (self.projection)(v);
        let n = self.values.len() + 1;
        let prev_mean = *self.means.last().unwrap();
        let prev_m2 = *self.m2s.last().unwrap();
        let new_mean = prev_mean + (phi - prev_mean) / n as Real;
        let new_m2 = prev_m2 + (phi - prev_mean) * (phi - new_mean);
        self.values.push(v);
        self.means.push(new_mean);
        self.m2s.push(new_m2);
    }

    /// Remove and return the most recently added raw value. O(1).
    ///
    /// # Errors
    /// Returns [`Error::Empty`] if the accumulator holds nothing.
    pub fn pop(&mut self) -> Result<Real> {
        let v = self.values.pop().ok_or(Error::Empty)?;
        self.means.pop();
        self.m2s.pop();
        Ok(v)
    }

    /// The first raw value ever added, if any.
    pub fn first(&self) -> Option<Real> {
        self.values.first().copied()
    }

    /// The most recently added raw value, if any.
    pub fn last(&self) -> Option<Real> {
        self.values.last().copied()
    }

    /// Mean of the projected values. Defined as `0` when empty, so node
    /// scoring stays total rather than partial.
    pub fn mean(&self) -> Real {
        *self.means.last().unwrap()
    }

    /// Population variance (`M2 / n`) of the projected values. Defined as
    /// `0` when empty.
    pub fn variance(&self) -> Real {
        let n = self.values.len();
        if n == 0 {
            0.0
        } else {
            self.m2s.last().unwrap() / n as Real
        }
    }

    /// Population standard deviation.
    pub fn std(&self) -> Real {
        self.variance().sqrt()
    }

    /// Sum of the projected values (`mean * n`).
    pub fn sum(&self) -> Real {
        self.mean() * self.values.len() as Real
    }

    /// Forward iterator over the raw values, in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Real> + '_ {
        self.values.iter().copied()
    }

    /// Reverse iterator over the raw values, most-recently-added first.
    pub fn iter_rev(&self) -> impl Iterator<Item = Real> + '_ {
        self.values.iter().rev().copied()
    }
}
