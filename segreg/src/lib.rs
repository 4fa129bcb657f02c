//! # segreg
//!
//! Segmented (piecewise) linear regression: fit a binary tree of linear
//! regressions over ordered `(x, y)` observations, splitting recursively
//! wherever doing so improves the chosen scoring criterion by more than
//! noise would explain.
//!
//! The entry point is [`compute_regression`]. It returns a [`Tree`], which
//! is either a single [`Leaf`] fit or a [`Node`] splitting the data into
//! two further subtrees.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod leaf;
pub mod node;
pub mod simplifier;
mod splitter;
pub mod trace;
pub mod tree;

pub use config::{Mode, RegressionConfig};
pub use leaf::{Equivalence, Leaf};
pub use node::Node;
pub use trace::{ErrorTrace, SweepStep};
pub use tree::Tree;

use sr_core::errors::Result;
use sr_core::{ensure_input, Real};
use sr_math::ols::OlsSignificanceTest;

/// Optional parameters to [`compute_regression`].
#[derive(Debug, Clone, Copy)]
pub struct RegressionOptions {
    /// The scoring mode. Defaults to [`Mode::Bic`].
    pub mode: Mode,
    /// The epsilon for the subnormal-RSS guard and the equality-under-noise
    /// predicate. Defaults to the smallest `|yᵢ|` in the input.
    pub epsilon: Option<Real>,
    /// Whether to run the simplifier over the split tree. Defaults to
    /// `false`.
    pub simplify: bool,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            epsilon: None,
            simplify: false,
        }
    }
}

/// Fit a segmented linear regression over `(xs, ys)`.
///
/// `xs` and `ys` need not be pre-sorted; they are paired up and sorted by
/// `x` internally, so the result is invariant to the input order. Returns
/// a [`Tree`]: a single [`Leaf`] if no split ever improved on keeping the
/// data whole, otherwise a [`Node`] recursively splitting it.
///
/// # Errors
/// `xs`/`ys` of mismatched length, empty input, or a non-finite
/// observation is an [`sr_core::errors::Error::Input`]. An unknown mode or
/// non-positive epsilon (explicit or defaulted to `min|yᵢ| == 0`) is an
/// [`sr_core::errors::Error::Config`].
pub fn compute_regression(
    xs: &[Real],
    ys: &[Real],
    options: RegressionOptions,
) -> Result<Tree> {
    ensure_input!(
        xs.len() == ys.len(),
        "xs and ys must have the same length, got {} and {}",
        xs.len(),
        ys.len()
    );
    ensure_input!(!xs.is_empty(), "at least one observation is required");
    ensure_input!(
        xs.iter().chain(ys.iter()).all(|v| v.is_finite()),
        "observations must be finite"
    );

    let mut pairs: Vec<(Real, Real)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    pairs.sort_by(|a, b| a.partial_cmp(b).expect("non-finite values were rejected above"));
    let xs_sorted: Vec<Real> = pairs.iter().map(|&(x, _)| x).collect();
    let ys_sorted: Vec<Real> = pairs.iter().map(|&(_, y)| y).collect();

    let epsilon = options
        .epsilon
        .unwrap_or_else(|| ys.iter().map(|y| y.abs()).fold(Real::INFINITY, Real::min));
    let config = RegressionConfig::new(options.mode, epsilon)?;

    let leaf = Leaf::new(&xs_sorted, &ys_sorted, config)?;
    let tree = splitter::compute_best_fit(config, leaf, Leaf::empty(config));

    if options.simplify {
        simplifier::simplify(tree, &OlsSignificanceTest)
    } else {
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_line_no_noise() {
        let xs: Vec<Real> = (0..100).map(|i| i as Real).collect();
        let ys: Vec<Real> = xs.iter().map(|&x| 2.0 * x + 5.0).collect();
        let tree = compute_regression(&xs, &ys, RegressionOptions::default()).unwrap();
        assert!(tree.is_leaf());
        assert!(tree.breakpoints().is_empty());
        if let Tree::Leaf(leaf) = &tree {
            assert_relative_eq!(leaf.slope(), 2.0, max_relative = 1e-6);
            assert_relative_eq!(leaf.intercept(), 5.0, max_relative = 1e-6);
        }
        assert!(tree.rss().abs() < 1e-6);
    }

    #[test]
    fn two_clean_segments_break_near_fifty() {
        let xs: Vec<Real> = (0..100).map(|i| i as Real).collect();
        let ys: Vec<Real> = xs
            .iter()
            .map(|&x| if x < 50.0 { 2.0 * x } else { (x - 50.0) + 100.0 })
            .collect();
        let tree = compute_regression(
            &xs,
            &ys,
            RegressionOptions {
                epsilon: Some(1.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!tree.is_leaf());
        let bp = tree.breakpoints();
        assert_eq!(bp.len(), 1);
        assert!(bp[0] >= 48.0 && bp[0] <= 51.0);
        if let Tree::Node(node) = &tree {
            let Tree::Leaf(left) = node.left() else {
                panic!("expected a leaf");
            };
            let Tree::Leaf(right) = node.right() else {
                panic!("expected a leaf");
            };
            assert_relative_eq!(left.slope(), 2.0, max_relative = 0.05);
            assert_relative_eq!(right.slope(), 1.0, max_relative = 0.05);
        }
    }

    #[test]
    fn constant_data_is_a_single_flat_leaf() {
        let xs: Vec<Real> = (0..10).map(|i| i as Real).collect();
        let ys = vec![7.0; 10];
        let tree =
            compute_regression(&xs, &ys, RegressionOptions { epsilon: Some(1.0), ..Default::default() })
                .unwrap();
        assert!(tree.is_leaf());
        if let Tree::Leaf(leaf) = &tree {
            assert_relative_eq!(leaf.slope(), 0.0, max_relative = 1e-9, epsilon = 1e-9);
            assert_relative_eq!(leaf.intercept(), 7.0, max_relative = 1e-9);
        }
        assert!(tree.rss().abs() < 1e-9);
    }

    #[test]
    fn degenerate_x_never_splits() {
        let xs = vec![3.0; 10];
        let ys: Vec<Real> = (0..10).map(|i| i as Real).collect();
        let tree =
            compute_regression(&xs, &ys, RegressionOptions { epsilon: Some(1.0), ..Default::default() })
                .unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.error(), Real::INFINITY);
    }

    #[test]
    fn noisy_single_line_bic_resists_spurious_splits() {
        // A deterministic stand-in for gaussian noise: a bounded
        // pseudo-random-looking perturbation with zero net bias.
        let xs: Vec<Real> = (0..1000).map(|i| i as Real).collect();
        let ys: Vec<Real> = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let noise = ((i * 2654435761) % 1000) as Real / 1000.0 - 0.5;
                3.0 * x - 1.0 + noise
            })
            .collect();
        let tree = compute_regression(
            &xs,
            &ys,
            RegressionOptions {
                mode: Mode::Bic,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(tree.is_leaf());
        if let Tree::Leaf(leaf) = &tree {
            assert_relative_eq!(leaf.slope(), 3.0, max_relative = 0.05);
            assert_relative_eq!(leaf.intercept(), -1.0, max_relative = 0.5, epsilon = 0.5);
        }
    }

    #[test]
    fn three_segments_simplify_to_three_leaves() {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for i in 0..30 {
            let x = i as Real;
            xs.push(x);
            ys.push(x);
        }
        for i in 30..60 {
            let x = i as Real;
            xs.push(x);
            ys.push(-2.0 * (x - 30.0) + 30.0);
        }
        for i in 60..90 {
            let x = i as Real;
            xs.push(x);
            ys.push(5.0 * (x - 60.0) - 30.0);
        }
        let tree = compute_regression(
            &xs,
            &ys,
            RegressionOptions {
                simplify: true,
                epsilon: Some(1.0),
                ..Default::default()
            },
        )
        .unwrap();
        let bp = tree.breakpoints();
        assert_eq!(bp.len(), 2);
        assert!((bp[0] - 29.0).abs() <= 1.0);
        assert!((bp[1] - 59.0).abs() <= 1.0);
    }

    #[test]
    fn input_order_invariance() {
        let xs = [3.0, 1.0, 4.0, 1.5, 2.0, 5.0, 0.5];
        let ys = [9.0, 3.0, 16.0, 6.75, 4.0, 25.0, 1.5];
        let opts = RegressionOptions {
            epsilon: Some(0.5),
            ..Default::default()
        };
        let tree_a = compute_regression(&xs, &ys, opts).unwrap();

        let mut indices: Vec<usize> = (0..xs.len()).collect();
        indices.reverse();
        let xs_b: Vec<Real> = indices.iter().map(|&i| xs[i]).collect();
        let ys_b: Vec<Real> = indices.iter().map(|&i| ys[i]).collect();
        let tree_b = compute_regression(&xs_b, &ys_b, opts).unwrap();

        assert_relative_eq!(tree_a.rss(), tree_b.rss(), max_relative = 1e-9);
        assert_eq!(tree_a.breakpoints(), tree_b.breakpoints());
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = compute_regression(&[0.0, 1.0], &[0.0], RegressionOptions::default());
        assert!(err.is_err());
    }

    #[test]
    fn rejects_empty_input() {
        let err = compute_regression(&[], &[], RegressionOptions::default());
        assert!(err.is_err());
    }

    #[test]
    fn rejects_a_zero_default_epsilon() {
        // min|y| == 0 with no explicit epsilon resolves to a non-positive
        // epsilon, which the config constructor rejects.
        let err = compute_regression(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0], RegressionOptions::default());
        assert!(err.is_err());
    }
}
