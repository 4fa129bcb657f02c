//! Leaf (C2): a linear regression over one contiguous run of observations,
//! built atop six [`IncrementalStat`] instances.

use crate::config::{Mode, RegressionConfig};
use crate::trace::ErrorTrace;
use sr_core::errors::Result;
use sr_core::{ensure_input, format::format_scientific, Real};
use sr_math::comparison::close_enough;
use sr_math::ols::SignificanceTest;
use sr_math::stats::IncrementalStat;

/// ULPs of tolerance for deciding `x` is degenerate: `E[x²]` and `E[x]²`
/// are computed two different ways (Welford's recurrence vs. the raw
/// moment), so they agree only up to a handful of ULPs even when `x` is
/// truly constant.
const DEGENERACY_ULPS: u32 = 8;

/// Leaves with `n <= 5` observations are considered equivalent to anything
/// by the simplifier — too little evidence to justify keeping a split.
const MIN_POINTS_FOR_SIGNIFICANCE: usize = 5;

/// The p-value threshold below which a coefficient is "significant" (§4.5).
const SIGNIFICANCE_THRESHOLD: Real = 1e-3;

/// Tolerance added to confidence-interval overlap checks (§4.5).
const CI_OVERLAP_TOLERANCE: Real = 1e-3;

/// A contiguous run of `(x, y)` observations fitted as `y = αx + β`.
#[derive(Debug, Clone)]
pub struct Leaf {
    config: RegressionConfig,
    x: IncrementalStat,
    y: IncrementalStat,
    xy: IncrementalStat,
    x2: IncrementalStat,
    y2: IncrementalStat,
    cov_sum: IncrementalStat,
    trace: Option<ErrorTrace>,
}

impl Leaf {
    /// Build an empty leaf under `config`.
    pub fn empty(config: RegressionConfig) -> Self {
        Self {
            config,
            x: IncrementalStat::identity(),
            y: IncrementalStat::identity(),
            xy: IncrementalStat::identity(),
            x2: IncrementalStat::squared(),
            y2: IncrementalStat::squared(),
            cov_sum: IncrementalStat::identity(),
            trace: None,
        }
    }

    /// Build a leaf ingesting `xs`/`ys` pairwise, in order.
    pub fn new(xs: &[Real], ys: &[Real], config: RegressionConfig) -> Result<Self> {
        ensure_input!(
            xs.len() == ys.len(),
            "xs and ys must have the same length, got {} and {}",
            xs.len(),
            ys.len()
        );
        let mut leaf = Self::empty(config);
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            leaf.add(x, y);
        }
        Ok(leaf)
    }

    /// Number of observations held.
    pub fn len(&self) -> usize {
        self.x.count()
    }

    /// `true` if this leaf holds no observations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configuration this leaf was built with.
    pub fn config(&self) -> RegressionConfig {
        self.config
    }

    /// The split search that produced this leaf as a "no split beats it"
    /// outcome, if it went through the splitter. `None` for a leaf built
    /// directly via [`Self::new`]/[`Self::empty`] that hasn't been
    /// evaluated by [`crate::splitter`] yet.
    pub fn trace(&self) -> Option<&ErrorTrace> {
        self.trace.as_ref()
    }

    /// Attach a split-search trace. Used only by [`crate::splitter`].
    pub(crate) fn set_trace(&mut self, trace: ErrorTrace) {
        self.trace = Some(trace);
    }

    /// The smallest `x` added to this leaf.
    pub fn first(&self) -> Real {
        self.x.first().expect("first() on an empty leaf")
    }

    /// The most recently added `x`.
    pub fn last(&self) -> Real {
        self.x.last().expect("last() on an empty leaf")
    }

    /// Add the observation `(x, y)`.
    ///
    /// Order matters: `dx` is computed from the *pre*-update mean of `x`,
    /// while the covariance-sum push uses the *post*-update mean of `y` —
    /// this is the standard online-covariance recurrence.
    pub fn add(&mut self, x: Real, y: Real) {
        let dx = x - self.x.mean();
        self.x.add(x);
        self.y.add(y);
        self.xy.add(x * y);
        self.x2.add(x);
        self.y2.add(y);
        self.cov_sum.add(dx * (y - self.y.mean()));
    }

    /// Remove and return the most recently added observation.
    ///
    /// # Errors
    /// Returns [`sr_core::errors::Error::Empty`] if the leaf holds no
    /// observations.
    pub fn pop(&mut self) -> Result<(Real, Real)> {
        self.cov_sum.pop()?;
        self.xy.pop()?;
        self.x2.pop()?;
        self.y2.pop()?;
        let y = self.y.pop()?;
        let x = self.x.pop()?;
        Ok((x, y))
    }

    /// The observations in internal storage order, as parallel vectors.
    pub fn values(&self) -> (Vec<Real>, Vec<Real>) {
        (self.x.iter().collect(), self.y.iter().collect())
    }

    /// Mean of `x`.
    pub fn mean_x(&self) -> Real {
        self.x.mean()
    }

    /// Mean of `y`.
    pub fn mean_y(&self) -> Real {
        self.y.mean()
    }

    /// Population standard deviation of `x`.
    pub fn std_x(&self) -> Real {
        self.x.std()
    }

    /// Population standard deviation of `y`.
    pub fn std_y(&self) -> Real {
        self.y.std()
    }

    /// Covariance between `x` and `y`.
    pub fn cov(&self) -> Real {
        self.cov_sum.mean()
    }

    /// `true` if this leaf cannot support a non-degenerate fit: fewer than
    /// two observations, or all observations share the same `x`. Checked
    /// via `E[x²] ≈ E[x]²` (zero variance) rather than an exact `== 0.0`,
    /// since the two sides are accumulated independently and can differ by
    /// a few ULPs even when `x` is truly constant.
    pub fn is_degenerate(&self) -> bool {
        self.len() < 2 || close_enough(self.x2.mean(), self.mean_x().powi(2), DEGENERACY_ULPS)
    }

    /// The slope α = cov(x, y) / var(x). Meaningless if [`Self::is_degenerate`].
    pub fn slope(&self) -> Real {
        self.cov() / self.x.variance()
    }

    /// The intercept β = mean(y) − α·mean(x).
    pub fn intercept(&self) -> Real {
        self.mean_y() - self.slope() * self.mean_x()
    }

    /// Residual sum of squares, computed from the six accumulated moments
    /// in O(1) rather than by summing residuals directly.
    pub fn rss(&self) -> Real {
        if self.is_degenerate() {
            return Real::INFINITY;
        }
        let a = self.slope();
        let b = self.intercept();
        let n = self.len() as Real;
        let sx = self.x.sum();
        let sy = self.y.sum();
        let sx2 = self.x2.sum();
        let sy2 = self.y2.sum();
        let sxy = self.xy.sum();
        sy2 - 2.0 * (a * sxy + b * sy) + (a * a * sx2 + 2.0 * a * b * sx + n * b * b)
    }

    /// Mean squared error, `RSS / n`.
    pub fn mse(&self) -> Real {
        self.rss() / self.len() as Real
    }

    /// Number of free parameters: slope, intercept, residual σ.
    pub fn nb_params(&self) -> usize {
        3
    }

    /// The AIC of this leaf's fit.
    pub fn aic(&self) -> Real {
        self.config
            .information_criterion(self.rss(), self.len(), 2.0 * self.nb_params() as Real)
    }

    /// The BIC of this leaf's fit.
    pub fn bic(&self) -> Real {
        let penalty = self.nb_params() as Real * (self.len() as Real).ln();
        self.config.information_criterion(self.rss(), self.len(), penalty)
    }

    /// The scalar error used for split selection, depending on the
    /// configured mode. `+∞` for a degenerate leaf, so it never wins a
    /// comparison against a non-degenerate alternative.
    pub fn error(&self) -> Real {
        if self.is_degenerate() {
            return Real::INFINITY;
        }
        match self.config.mode() {
            Mode::Aic => self.aic(),
            Mode::Bic => self.bic(),
            Mode::Rss => {
                let mse = self.mse();
                if mse < 0.0 {
                    0.0
                } else {
                    mse.sqrt()
                }
            }
        }
    }

    /// Predict `y` at `x` using the fitted line. Unspecified (but does not
    /// panic) for a degenerate leaf.
    pub fn predict(&self, x: Real) -> Real {
        self.slope() * x + self.intercept()
    }

    /// Concatenate `self` followed by `other`'s points in reverse order —
    /// this is how the simplifier merges two leaves whose right-hand one
    /// is stored in descending-x order (§4.3's orientation convention).
    pub fn concat(&self, other: &Leaf) -> Result<Leaf> {
        let (mut xs, mut ys) = self.values();
        let (other_xs, other_ys) = other.values();
        xs.extend(other_xs.into_iter().rev());
        ys.extend(other_ys.into_iter().rev());
        Leaf::new(&xs, &ys, self.config)
    }

    /// Whether `self` and `other` are statistically indistinguishable,
    /// and whether that answer rests on a trustworthy significance test
    /// (§4.5). See [`Equivalence`].
    pub fn equivalence<T: SignificanceTest>(&self, other: &Leaf, test: &T) -> Equivalence {
        if self.len() <= MIN_POINTS_FOR_SIGNIFICANCE || other.len() <= MIN_POINTS_FOR_SIGNIFICANCE
        {
            return Equivalence::Same;
        }
        let (xs1, ys1) = self.values();
        let (xs2, ys2) = other.values();
        let (Ok(fit1), Ok(fit2)) = (test.fit(&xs1, &ys1), test.fit(&xs2, &ys2)) else {
            return Equivalence::Indeterminate;
        };

        let sig1 = fit1.intercept.is_significant(SIGNIFICANCE_THRESHOLD);
        let sig2 = fit2.intercept.is_significant(SIGNIFICANCE_THRESHOLD);
        if sig1 != sig2 {
            return Equivalence::Different;
        }
        if sig1 && sig2 && !ci_overlap(fit1.intercept.ci95, fit2.intercept.ci95) {
            return Equivalence::Different;
        }

        let sig1 = fit1.slope.is_significant(SIGNIFICANCE_THRESHOLD);
        let sig2 = fit2.slope.is_significant(SIGNIFICANCE_THRESHOLD);
        if sig1 != sig2 {
            return Equivalence::Different;
        }
        if sig1 && sig2 && !ci_overlap(fit1.slope.ci95, fit2.slope.ci95) {
            return Equivalence::Different;
        }

        Equivalence::Same
    }

    /// Whether `self` and `other` are statistically indistinguishable
    /// (§4.5), treating an indeterminate test (no trustworthy fit on
    /// either side) as equivalent.
    pub fn equivalent<T: SignificanceTest>(&self, other: &Leaf, test: &T) -> bool {
        !matches!(self.equivalence(other, test), Equivalence::Different)
    }
}

/// The outcome of comparing two leaves for the simplifier (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equivalence {
    /// Both fits agree closely enough to merge.
    Same,
    /// The fits disagree on a significant coefficient.
    Different,
    /// No trustworthy significance test could be run on one side; treated
    /// as [`Equivalence::Same`], but the simplifier logs this once.
    Indeterminate,
}

fn ci_overlap(a: (Real, Real), b: (Real, Real)) -> bool {
    !(a.1 < b.0 - CI_OVERLAP_TOLERANCE || a.0 - CI_OVERLAP_TOLERANCE > b.1)
}

impl std::fmt::Display for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_degenerate() {
            write!(f, "⊥")
        } else {
            write!(
                f,
                "y ~ {}x + {}",
                format_scientific(self.slope(), 3),
                format_scientific(self.intercept(), 3)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sr_math::ols::OlsSignificanceTest;

    fn config(mode: Mode) -> RegressionConfig {
        RegressionConfig::new(mode, 1e-6).unwrap()
    }

    #[test]
    fn pop_on_empty_leaf_is_an_error() {
        let mut leaf = Leaf::empty(config(Mode::Rss));
        assert_eq!(leaf.pop(), Err(sr_core::errors::Error::Empty));
    }

    #[test]
    fn fits_exact_line() {
        let xs: Vec<Real> = (0..10).map(|i| i as Real).collect();
        let ys: Vec<Real> = xs.iter().map(|&x| 2.0 * x + 5.0).collect();
        let leaf = Leaf::new(&xs, &ys, config(Mode::Rss)).unwrap();
        assert_relative_eq!(leaf.slope(), 2.0, max_relative = 1e-9);
        assert_relative_eq!(leaf.intercept(), 5.0, max_relative = 1e-9);
        assert!(leaf.rss().abs() < 1e-6);
    }

    #[test]
    fn rss_matches_from_scratch_sum() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.5, 7.0];
        let ys = [1.0, 2.2, 1.9, 3.5, 3.1, 5.0, 6.5];
        let leaf = Leaf::new(&xs, &ys, config(Mode::Rss)).unwrap();
        let from_scratch: Real = xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| (y - leaf.predict(x)).powi(2))
            .sum();
        assert_relative_eq!(leaf.rss(), from_scratch, max_relative = 1e-6);
    }

    #[test]
    fn degenerate_x_has_infinite_error() {
        let xs = [3.0; 5];
        let ys = [1.0, 2.0, 3.0, 4.0, 5.0];
        let leaf = Leaf::new(&xs, &ys, config(Mode::Bic)).unwrap();
        assert!(leaf.is_degenerate());
        assert_eq!(leaf.error(), Real::INFINITY);
    }

    #[test]
    fn push_then_pop_restores_fit() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let mut leaf = Leaf::new(&xs, &ys, config(Mode::Rss)).unwrap();
        let slope_before = leaf.slope();
        let intercept_before = leaf.intercept();
        leaf.add(100.0, -50.0);
        leaf.pop().unwrap();
        assert_relative_eq!(leaf.slope(), slope_before, max_relative = 1e-9);
        assert_relative_eq!(leaf.intercept(), intercept_before, max_relative = 1e-9);
    }

    #[test]
    fn concat_reverses_right_operand() {
        let left = Leaf::new(&[0.0, 1.0], &[0.0, 1.0], config(Mode::Rss)).unwrap();
        // `right` stores its points in descending order, as a right child does.
        let right = Leaf::new(&[3.0, 2.0], &[3.0, 2.0], config(Mode::Rss)).unwrap();
        let merged = left.concat(&right).unwrap();
        let (xs, _) = merged.values();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn short_leaves_are_always_equivalent() {
        let test = OlsSignificanceTest;
        let a = Leaf::new(&[0.0, 1.0, 2.0], &[0.0, 5.0, 1.0], config(Mode::Bic)).unwrap();
        let b = Leaf::new(&[3.0, 4.0, 5.0], &[-5.0, 3.0, 9.0], config(Mode::Bic)).unwrap();
        assert!(a.equivalent(&b, &test));
    }

    #[test]
    fn clearly_different_slopes_are_not_equivalent() {
        let test = OlsSignificanceTest;
        let xs: Vec<Real> = (0..20).map(|i| i as Real).collect();
        let a_ys: Vec<Real> = xs.iter().map(|&x| 2.0 * x).collect();
        let b_ys: Vec<Real> = xs.iter().map(|&x| -2.0 * x).collect();
        let a = Leaf::new(&xs, &a_ys, config(Mode::Bic)).unwrap();
        let b = Leaf::new(&xs, &b_ys, config(Mode::Bic)).unwrap();
        assert!(!a.equivalent(&b, &test));
    }

    #[test]
    fn degenerate_leaf_renders_as_bottom() {
        let leaf = Leaf::new(&[3.0; 4], &[1.0, 2.0, 3.0, 4.0], config(Mode::Bic)).unwrap();
        assert_eq!(leaf.to_string(), "⊥");
    }
}
