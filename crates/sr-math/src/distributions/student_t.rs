//! Student's t-distribution.
//!
//! Wraps the `statrs` crate's Student-t implementation. Used by [`crate::ols`]
//! to turn a coefficient's t-statistic into a p-value and confidence interval.

use sr_core::Real;
use statrs::distribution::{ContinuousCDF, Continuous, StudentsT};

/// Student's t-distribution with `df` degrees of freedom.
#[derive(Debug, Clone)]
pub struct StudentTDistribution {
    dist: StudentsT,
    df: Real,
}

impl StudentTDistribution {
    /// Create a Student-t distribution with the given degrees of freedom.
    ///
    /// # Panics
    /// Panics if `df <= 0`.
    pub fn new(df: Real) -> Self {
        assert!(df > 0.0, "degrees of freedom must be positive");
        Self {
            // location=0, scale=1 (standard t-distribution)
            dist: StudentsT::new(0.0, 1.0, df).expect("invalid degrees of freedom"),
            df,
        }
    }

    /// Degrees of freedom.
    pub fn df(&self) -> Real {
        self.df
    }

    /// Probability density function.
    pub fn pdf(&self, x: Real) -> Real {
        self.dist.pdf(x)
    }

    /// Cumulative distribution function P(T ≤ x).
    pub fn cdf(&self, x: Real) -> Real {
        self.dist.cdf(x)
    }

    /// Inverse CDF (quantile function).
    pub fn inverse_cdf(&self, p: Real) -> Real {
        assert!((0.0..=1.0).contains(&p), "p must be in [0, 1]");
        self.dist.inverse_cdf(p)
    }
}
