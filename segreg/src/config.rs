//! Scoring policy, epsilon, and the equality-under-noise predicate (C6).

use sr_core::errors::{Error, Result};
use sr_core::{ensure_config, Real};
use sr_math::comparison::close;

/// The objective a node is scored by. Lower is always better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Root-mean-square residual error.
    Rss,
    /// Akaike information criterion: `2p + n·ln(RSS)`.
    Aic,
    /// Bayesian information criterion: `p·ln(n) + n·ln(RSS)`.
    Bic,
}

impl Mode {
    /// Parse a mode name. Case-sensitive, matching the three names the
    /// public API accepts: `"RSS"`, `"AIC"`, `"BIC"`.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "RSS" => Ok(Mode::Rss),
            "AIC" => Ok(Mode::Aic),
            "BIC" => Ok(Mode::Bic),
            other => Err(Error::Config(format!(
                "unknown mode {other:?}; expected one of \"RSS\", \"AIC\", \"BIC\""
            ))),
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Bic
    }
}

/// Smallest positive subnormal `f64`, substituted for a non-positive or
/// near-zero RSS before taking its logarithm in AIC/BIC (§4.6). Shared by
/// [`crate::leaf::Leaf`] and [`crate::node::Node`], whose information
/// criteria both need the same guard.
pub const RSS_SENTINEL: Real = 2f64.powi(-1074);

/// Validated configuration shared by every node in a tree: the scoring
/// mode and the epsilon used both for the RSS subnormal guard and for the
/// equality-under-noise predicate.
///
/// Constructing a `RegressionConfig` performs every `ConfigError` check
/// up front (§7), so that once one exists, downstream code never has to
/// re-validate it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionConfig {
    mode: Mode,
    epsilon: Real,
}

impl RegressionConfig {
    /// Build a configuration, rejecting a non-positive epsilon.
    pub fn new(mode: Mode, epsilon: Real) -> Result<Self> {
        ensure_config!(epsilon > 0.0, "epsilon must be positive, got {epsilon}");
        Ok(Self { mode, epsilon })
    }

    /// The scoring mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The epsilon used for the subnormal-RSS guard and the
    /// equality-under-noise predicate.
    pub fn epsilon(&self) -> Real {
        self.epsilon
    }

    /// Whether two error values `a` and `b` are indistinguishable from
    /// noise under this configuration's mode (§4.6).
    ///
    /// RSS mode compares on `ε²` directly; AIC/BIC compare on the
    /// corresponding shift in log-space, `|log₂(ε²)|`.
    pub fn equal_under_noise(&self, a: Real, b: Real) -> bool {
        let tolerance = match self.mode {
            Mode::Rss => self.epsilon * self.epsilon,
            Mode::Aic | Mode::Bic => (self.epsilon * self.epsilon).log2().abs(),
        };
        close(a, b, tolerance)
    }

    /// Substitute [`RSS_SENTINEL`] for a non-positive or near-zero RSS, so
    /// that taking its logarithm in [`Self::information_criterion`] always
    /// stays finite.
    pub fn guarded_rss(&self, rss: Real) -> Real {
        if rss <= 0.0 || rss.abs() < self.epsilon * self.epsilon {
            log::trace!("RSS {rss:e} below noise floor, substituting sentinel {RSS_SENTINEL:e}");
            RSS_SENTINEL
        } else {
            rss
        }
    }

    /// `penalty + n·ln(RSS)`, the shared shape of both AIC (`penalty =
    /// 2p`) and BIC (`penalty = p·ln(n)`), with the RSS guarded against
    /// non-positive and near-zero values.
    pub fn information_criterion(&self, rss: Real, n: usize, param_penalty: Real) -> Real {
        param_penalty + n as Real * self.guarded_rss(rss).ln()
    }
}
