//! Ordinary least-squares fit with significance testing for `y ~ x`.
//!
//! This is the narrow collaborator the simplifier (the tree crate's
//! `simplifier` module) is built against: given the raw observations of a
//! leaf, fit the intercept and slope and report, for each coefficient, its
//! standard error, two-sided p-value, and 95% confidence interval. It
//! specializes [`crate::linear_least_squares::LinearLeastSquaresRegression`]
//! to the two-basis case `[1, x]` and layers on the t-test that general
//! regression doesn't need.

use crate::distributions::StudentTDistribution;
use crate::linear_least_squares::LinearLeastSquaresRegression;
use sr_core::{
    errors::{Error, Result},
    Real,
};

/// One fitted coefficient (intercept or slope) together with its
/// significance statistics.
#[derive(Debug, Clone, Copy)]
pub struct Coefficient {
    /// Point estimate.
    pub estimate: Real,
    /// Standard error of the estimate.
    pub std_error: Real,
    /// Two-sided p-value against the null hypothesis that the coefficient
    /// is zero.
    pub p_value: Real,
    /// 95% confidence interval `(lower, upper)`.
    pub ci95: (Real, Real),
}

impl Coefficient {
    /// Whether this coefficient is significant at the `1e-3` threshold used
    /// by the simplifier's equivalence predicate.
    pub fn is_significant(&self, threshold: Real) -> bool {
        self.p_value < threshold
    }
}

/// The result of fitting `y ~ x` by ordinary least squares.
#[derive(Debug, Clone, Copy)]
pub struct OlsFit {
    /// The intercept term β.
    pub intercept: Coefficient,
    /// The slope term α.
    pub slope: Coefficient,
}

impl OlsFit {
    /// Fit `y ~ x` over the given observations.
    ///
    /// Requires at least three observations (two degrees of freedom are
    /// needed for the residual variance estimate that standard errors rely
    /// on) and a non-degenerate design matrix (more than one distinct `x`).
    pub fn fit(xs: &[Real], ys: &[Real]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(Error::Input(
                "xs and ys must have the same length".into(),
            ));
        }
        let n = xs.len();
        if n < 3 {
            return Err(Error::Input(
                "at least three observations are required for a significance test".into(),
            ));
        }

        let x_mean: Real = xs.iter().sum::<Real>() / n as Real;
        let x_var: Real = xs.iter().map(|&x| (x - x_mean).powi(2)).sum::<Real>() / n as Real;
        if x_var <= 0.0 {
            return Err(Error::Input(
                "x has zero variance; no significance test is possible".into(),
            ));
        }

        let basis: [fn(Real) -> Real; 2] = [|_| 1.0, |x| x];
        let reg = LinearLeastSquaresRegression::new(xs, ys, &basis)?;
        let coefficients = reg.coefficients();
        let std_errors = reg.standard_errors();

        let intercept_est = coefficients[0];
        let slope_est = coefficients[1];
        let intercept_se = std_errors[0];
        let slope_se = std_errors[1];

        if !intercept_se.is_finite() || !slope_se.is_finite() {
            return Err(Error::Input(
                "design matrix is too close to singular for a significance test".into(),
            ));
        }

        let df = (n - 2) as Real;
        let t_dist = StudentTDistribution::new(df);
        let t_crit = t_dist.inverse_cdf(0.975);

        let coeff = |estimate: Real, se: Real| {
            // A perfect fit (se == 0) is maximally significant; avoid the
            // 0/0 that a literal t-statistic would produce in that case.
            let p_value = if se == 0.0 {
                0.0
            } else {
                2.0 * (1.0 - t_dist.cdf((estimate / se).abs()))
            };
            let margin = t_crit * se;
            Coefficient {
                estimate,
                std_error: se,
                p_value,
                ci95: (estimate - margin, estimate + margin),
            }
        };

        Ok(Self {
            intercept: coeff(intercept_est, intercept_se),
            slope: coeff(slope_est, slope_se),
        })
    }
}

/// Narrow interface the simplifier depends on, so that its equivalence
/// logic can be unit-tested against a stub without pulling in `nalgebra`
/// and `statrs`.
pub trait SignificanceTest {
    /// Fit `y ~ x`, or fail if the fit cannot be trusted (too few points,
    /// near-singular design matrix).
    fn fit(&self, xs: &[Real], ys: &[Real]) -> Result<OlsFit>;
}

/// The production [`SignificanceTest`], backed by [`OlsFit::fit`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OlsSignificanceTest;

impl SignificanceTest for OlsSignificanceTest {
    fn fit(&self, xs: &[Real], ys: &[Real]) -> Result<OlsFit> {
        OlsFit::fit(xs, ys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_line_is_highly_significant() {
        let xs: Vec<Real> = (0..30).map(|i| i as Real).collect();
        let ys: Vec<Real> = xs.iter().map(|&x| 2.0 * x + 5.0).collect();
        let fit = OlsFit::fit(&xs, &ys).unwrap();
        assert!(fit.slope.is_significant(1e-3));
        assert!((fit.slope.estimate - 2.0).abs() < 1e-6);
        assert!((fit.intercept.estimate - 5.0).abs() < 1e-6);
    }

    #[test]
    fn pure_noise_slope_is_not_significant() {
        // y is independent of x: alternating +1/-1 around a constant mean.
        let xs: Vec<Real> = (0..40).map(|i| i as Real).collect();
        let ys: Vec<Real> = (0..40)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let fit = OlsFit::fit(&xs, &ys).unwrap();
        assert!(!fit.slope.is_significant(1e-3));
    }

    #[test]
    fn too_few_points_errors() {
        assert!(OlsFit::fit(&[1.0, 2.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn degenerate_x_errors() {
        let xs = vec![3.0; 10];
        let ys: Vec<Real> = (0..10).map(|i| i as Real).collect();
        assert!(OlsFit::fit(&xs, &ys).is_err());
    }

    #[test]
    fn confidence_interval_contains_estimate() {
        let xs: Vec<Real> = (0..50).map(|i| i as Real * 0.3).collect();
        let ys: Vec<Real> = xs.iter().map(|&x| -1.5 * x + 2.0).collect();
        let fit = OlsFit::fit(&xs, &ys).unwrap();
        assert!(fit.slope.ci95.0 <= fit.slope.estimate);
        assert!(fit.slope.estimate <= fit.slope.ci95.1);
    }
}
