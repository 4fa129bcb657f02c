//! The split search (C4): given a leaf, decide whether splitting it in two
//! beats keeping it whole, and if so, where.
//!
//! The search starts from one side full and the other empty, then shifts
//! observations one at a time across the boundary, recomputing the
//! combined error in O(1) at every position by leaning on
//! [`crate::leaf::Leaf`]'s O(1) `add`/`pop`. Whichever side starts full
//! dictates the sweep direction; the empty side accumulates observations
//! in exactly the order the full side discards them, which is what keeps
//! it sorted (ascending if it's filling up from an ascending left, or
//! descending if it's filling up from the end of a descending right) —
//! no separate bookkeeping is needed, the orientation simply falls out of
//! the sweep direction.

use crate::config::{Mode, RegressionConfig};
use crate::leaf::Leaf;
use crate::node::Node;
use crate::trace::{ErrorTrace, SweepStep};
use crate::tree::Tree;
use sr_core::Real;

/// The error of a would-be node over the two leaves forming it, without
/// building one — the combine rule [`Node::error`] uses, at leaf
/// granularity so the sweep can call it once per shift.
fn pair_error(config: RegressionConfig, left: &Leaf, right: &Leaf) -> Real {
    let (nl, nr) = (left.len(), right.len());
    if nl <= 1 || nr <= 1 {
        return Real::INFINITY;
    }
    let n = nl + nr;
    match config.mode() {
        Mode::Rss => {
            let wl = nl as Real / n as Real;
            let wr = nr as Real / n as Real;
            wl * left.error() + wr * right.error()
        }
        Mode::Aic => {
            let p = left.nb_params() + right.nb_params() + 1;
            config.information_criterion(left.rss() + right.rss(), n, 2.0 * p as Real)
        }
        Mode::Bic => {
            let p = left.nb_params() + right.nb_params() + 1;
            let penalty = p as Real * (n as Real).ln();
            config.information_criterion(left.rss() + right.rss(), n, penalty)
        }
    }
}

/// Decide whether `(left, right)` should be split further, recursing into
/// both sides if so. `left` and `right` must already satisfy the
/// orientation invariant: one of them empty, the other holding every
/// observation ascending (if it's `left`) or descending (if it's `right`).
pub(crate) fn compute_best_fit(config: RegressionConfig, mut left: Leaf, mut right: Leaf) -> Tree {
    let total = left.len() + right.len();
    let left_to_right = right.is_empty();
    debug_assert!(left_to_right || left.is_empty());

    let mut nosplit = if left_to_right {
        left.clone()
    } else {
        right.clone()
    };
    let nosplit_error = nosplit.error();

    let mut lowest_error = pair_error(config, &left, &right);
    let mut best_shifts = 0usize;
    let mut sweep = Vec::with_capacity(total.saturating_sub(1));

    for shift in 1..total {
        if left_to_right {
            let (x, y) = left.pop().expect("shift count is bounded by left's observation count");
            right.add(x, y);
        } else {
            let (x, y) = right.pop().expect("shift count is bounded by right's observation count");
            left.add(x, y);
        }
        let threshold = left.last();
        let error = pair_error(config, &left, &right);
        sweep.push(SweepStep { threshold, error });
        if error < lowest_error {
            lowest_error = error;
            best_shifts = shift;
        }
    }

    let improves = lowest_error < nosplit_error;
    let within_noise = improves && config.equal_under_noise(lowest_error, nosplit_error);
    if improves && within_noise {
        log::trace!(
            "best split error {lowest_error:e} beats nosplit {nosplit_error:e} only within \
             noise tolerance; refusing the split"
        );
    }

    if improves && !within_noise {
        for _ in best_shifts..total.saturating_sub(1) {
            if left_to_right {
                let (x, y) = right.pop().expect("rewind count is bounded by right's observation count");
                left.add(x, y);
            } else {
                let (x, y) = left.pop().expect("rewind count is bounded by left's observation count");
                right.add(x, y);
            }
        }
        let threshold = left.last();
        let trace = ErrorTrace {
            nosplit_error,
            sweep,
            best_error: lowest_error,
        };
        let left_tree = compute_best_fit(config, left, Leaf::empty(config));
        let right_tree = compute_best_fit(config, Leaf::empty(config), right);
        Tree::Node(Node::new(config, threshold, left_tree, right_tree, trace))
    } else {
        nosplit.set_trace(ErrorTrace {
            nosplit_error,
            sweep,
            best_error: lowest_error,
        });
        Tree::Leaf(nosplit)
    }
}
