//! Node (C3): an internal split, owning exactly two children.

use crate::config::{Mode, RegressionConfig};
use crate::tree::Tree;
use crate::trace::ErrorTrace;
use sr_core::Real;

/// An internal split: every observation with `x <= threshold` lives in
/// `left`, every observation with `x > threshold` lives in `right`.
/// `threshold` is fixed at construction time to the maximum `x` the left
/// side held when the split was chosen (§9's orientation question) — it is
/// never re-derived from the children afterwards, so further recursive
/// splits of either side can't perturb it.
#[derive(Debug, Clone)]
pub struct Node {
    config: RegressionConfig,
    threshold: Real,
    left: Box<Tree>,
    right: Box<Tree>,
    trace: ErrorTrace,
}

impl Node {
    /// Build a node from its two children, the chosen threshold, and the
    /// trace of the search that chose it. Used only by
    /// [`crate::splitter::compute_best_fit`].
    pub(crate) fn new(
        config: RegressionConfig,
        threshold: Real,
        left: Tree,
        right: Tree,
        trace: ErrorTrace,
    ) -> Self {
        Self {
            config,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
            trace,
        }
    }

    /// The configuration this node (and every descendant) was built with.
    pub fn config(&self) -> RegressionConfig {
        self.config
    }

    /// The split point: the maximum `x` in the left subtree.
    pub fn threshold(&self) -> Real {
        self.threshold
    }

    /// The left subtree (`x <= threshold`).
    pub fn left(&self) -> &Tree {
        &self.left
    }

    /// The right subtree (`x > threshold`).
    pub fn right(&self) -> &Tree {
        &self.right
    }

    /// The trace of the search that chose this split.
    pub fn trace(&self) -> &ErrorTrace {
        &self.trace
    }

    /// Consume the node, returning its config, threshold, children, and
    /// trace. Used only by [`crate::simplifier`], which needs to rebuild
    /// (or replace) the node around simplified children.
    pub(crate) fn into_parts(self) -> (RegressionConfig, Real, Tree, Tree, ErrorTrace) {
        (self.config, self.threshold, *self.left, *self.right, self.trace)
    }

    /// Total observations under this node.
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// `true` if this node holds no observations (impossible for a
    /// well-formed tree, but kept for symmetry with [`crate::leaf::Leaf`]).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Residual sum of squares, aggregated additively from both children.
    pub fn rss(&self) -> Real {
        self.left.rss() + self.right.rss()
    }

    /// Mean squared error over the whole subtree, `RSS / n`.
    pub fn mse(&self) -> Real {
        self.rss() / self.len() as Real
    }

    /// Free parameters: the children's, plus one for this split.
    pub fn nb_params(&self) -> usize {
        self.left.nb_params() + self.right.nb_params() + 1
    }

    /// AIC computed over the aggregate RSS, n, and parameter count — not
    /// the sum of the children's AICs.
    pub fn aic(&self) -> Real {
        self.config
            .information_criterion(self.rss(), self.len(), 2.0 * self.nb_params() as Real)
    }

    /// BIC computed over the aggregate RSS, n, and parameter count.
    pub fn bic(&self) -> Real {
        let penalty = self.nb_params() as Real * (self.len() as Real).ln();
        self.config.information_criterion(self.rss(), self.len(), penalty)
    }

    /// The scalar error used for split selection. `+∞` if either side holds
    /// one or fewer observations, regardless of mode. Otherwise: RSS mode
    /// takes the size-weighted average of the children's errors; AIC/BIC
    /// mode recomputes the criterion over the aggregate.
    pub fn error(&self) -> Real {
        if self.left.len() <= 1 || self.right.len() <= 1 {
            return Real::INFINITY;
        }
        match self.config.mode() {
            Mode::Aic => self.aic(),
            Mode::Bic => self.bic(),
            Mode::Rss => {
                let n = self.len() as Real;
                let wl = self.left.len() as Real / n;
                let wr = self.right.len() as Real / n;
                wl * self.left.error() + wr * self.right.error()
            }
        }
    }

    /// Predict `y` at `x`: descend left if `x <= threshold`, else right.
    pub fn predict(&self, x: Real) -> Real {
        if x <= self.threshold {
            self.left.predict(x)
        } else {
            self.right.predict(x)
        }
    }

    /// Breakpoints in ascending order: the left subtree's, then this
    /// node's own threshold, then the right subtree's.
    pub fn breakpoints(&self) -> Vec<Real> {
        let mut bp = self.left.breakpoints();
        bp.push(self.threshold);
        bp.extend(self.right.breakpoints());
        bp
    }
}
