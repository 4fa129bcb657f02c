//! Post-hoc simplification (C5): bottom-up, merge any two sibling leaves
//! that a significance test can't tell apart into one.

use crate::leaf::{Equivalence, Leaf};
use crate::node::Node;
use crate::tree::Tree;
use sr_core::errors::Result;
use sr_math::ols::SignificanceTest;

/// Recursively simplify `tree`, merging adjacent leaves the significance
/// test `test` considers equivalent. Idempotent: simplifying an
/// already-simplified tree returns it unchanged.
pub fn simplify<T: SignificanceTest>(tree: Tree, test: &T) -> Result<Tree> {
    let mut warned = false;
    simplify_rec(tree, test, &mut warned)
}

fn simplify_rec<T: SignificanceTest>(tree: Tree, test: &T, warned: &mut bool) -> Result<Tree> {
    match tree {
        Tree::Leaf(leaf) => Ok(Tree::Leaf(leaf)),
        Tree::Node(node) => {
            let (config, threshold, left, right, trace) = node.into_parts();
            let left = simplify_rec(left, test, warned)?;
            let right = simplify_rec(right, test, warned)?;
            if let (Tree::Leaf(left_leaf), Tree::Leaf(right_leaf)) = (&left, &right) {
                let merged = left_leaf.concat(right_leaf)?;
                if should_merge(left_leaf, right_leaf, &merged, test, warned) {
                    let mut merged = merged;
                    merged.set_trace(trace);
                    return Ok(Tree::Leaf(merged));
                }
            }
            Ok(Tree::Node(Node::new(config, threshold, left, right, trace)))
        }
    }
}

/// Two leaves merge if either they're already equivalent, or the merged
/// fit is itself equivalent to one of them — mirroring the idea that a
/// three-way split with no significant difference anywhere should collapse
/// to one line.
fn should_merge<T: SignificanceTest>(
    left: &Leaf,
    right: &Leaf,
    merged: &Leaf,
    test: &T,
    warned: &mut bool,
) -> bool {
    for (a, b) in [(left, right), (merged, left), (merged, right)] {
        match a.equivalence(b, test) {
            Equivalence::Same => return true,
            Equivalence::Indeterminate => {
                if !*warned {
                    log::warn!(
                        "no trustworthy significance fit on at least one leaf; \
                         treating it as equivalent to its neighbor"
                    );
                    *warned = true;
                }
                return true;
            }
            Equivalence::Different => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Mode, RegressionConfig};
    use crate::splitter::compute_best_fit;
    use sr_core::Real;
    use sr_math::ols::OlsSignificanceTest;

    fn config(mode: Mode) -> RegressionConfig {
        RegressionConfig::new(mode, 1e-6).unwrap()
    }

    #[test]
    fn short_segments_collapse_to_one_leaf() {
        let cfg = config(Mode::Bic);
        // Two tiny, noisy halves: too few points per side for the
        // significance test to object, so they should merge.
        let xs = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        let ys = [0.0, 1.1, 1.9, 9.8, 11.2, 11.9];
        let leaf = Leaf::new(&xs, &ys, cfg).unwrap();
        let tree = compute_best_fit(cfg, leaf, Leaf::empty(cfg));
        let simplified = simplify(tree, &OlsSignificanceTest).unwrap();
        assert!(simplified.is_leaf());
    }

    #[test]
    fn clearly_distinct_segments_stay_split() {
        let cfg = config(Mode::Bic);
        let xs: Vec<Real> = (0..40).map(|i| i as Real).collect();
        let ys: Vec<Real> = xs
            .iter()
            .map(|&x| if x < 20.0 { x } else { -3.0 * x + 60.0 })
            .collect();
        let leaf = Leaf::new(&xs, &ys, cfg).unwrap();
        let tree = compute_best_fit(cfg, leaf, Leaf::empty(cfg));
        let simplified = simplify(tree, &OlsSignificanceTest).unwrap();
        assert!(!simplified.is_leaf());
    }

    #[test]
    fn simplifying_twice_is_idempotent() {
        let cfg = config(Mode::Bic);
        let xs: Vec<Real> = (0..40).map(|i| i as Real).collect();
        let ys: Vec<Real> = xs
            .iter()
            .map(|&x| if x < 20.0 { x } else { -3.0 * x + 60.0 })
            .collect();
        let leaf = Leaf::new(&xs, &ys, cfg).unwrap();
        let tree = compute_best_fit(cfg, leaf, Leaf::empty(cfg));
        let once = simplify(tree, &OlsSignificanceTest).unwrap();
        let twice = simplify(once.clone(), &OlsSignificanceTest).unwrap();
        assert_eq!(once.breakpoints(), twice.breakpoints());
    }
}
