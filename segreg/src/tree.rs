//! The regression tree: a sum type of [`Leaf`] and [`Node`], with the
//! operations clients actually use dispatched uniformly over both.

use crate::leaf::Leaf;
use crate::node::Node;
use crate::trace::ErrorTrace;
use sr_core::Real;
use std::fmt;

/// A fitted piecewise-linear regression: either a single line over all the
/// data, or a split into two subtrees.
#[derive(Debug, Clone)]
pub enum Tree {
    /// A single linear fit over a contiguous run of observations.
    Leaf(Leaf),
    /// An internal split into two subtrees.
    Node(Node),
}

impl Tree {
    /// Number of observations under this (sub)tree.
    pub fn len(&self) -> usize {
        match self {
            Tree::Leaf(leaf) => leaf.len(),
            Tree::Node(node) => node.len(),
        }
    }

    /// `true` if this (sub)tree holds no observations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Residual sum of squares over the whole (sub)tree.
    pub fn rss(&self) -> Real {
        match self {
            Tree::Leaf(leaf) => leaf.rss(),
            Tree::Node(node) => node.rss(),
        }
    }

    /// Mean squared error, `RSS / n`.
    pub fn mse(&self) -> Real {
        match self {
            Tree::Leaf(leaf) => leaf.mse(),
            Tree::Node(node) => node.mse(),
        }
    }

    /// Total free parameters in this (sub)tree.
    pub fn nb_params(&self) -> usize {
        match self {
            Tree::Leaf(leaf) => leaf.nb_params(),
            Tree::Node(node) => node.nb_params(),
        }
    }

    /// Akaike information criterion over the whole (sub)tree.
    pub fn aic(&self) -> Real {
        match self {
            Tree::Leaf(leaf) => leaf.aic(),
            Tree::Node(node) => node.aic(),
        }
    }

    /// Bayesian information criterion over the whole (sub)tree.
    pub fn bic(&self) -> Real {
        match self {
            Tree::Leaf(leaf) => leaf.bic(),
            Tree::Node(node) => node.bic(),
        }
    }

    /// The scalar error used for split selection, under this (sub)tree's
    /// configured mode.
    pub fn error(&self) -> Real {
        match self {
            Tree::Leaf(leaf) => leaf.error(),
            Tree::Node(node) => node.error(),
        }
    }

    /// Predict `y` at `x`.
    pub fn predict(&self, x: Real) -> Real {
        match self {
            Tree::Leaf(leaf) => leaf.predict(x),
            Tree::Node(node) => node.predict(x),
        }
    }

    /// Every split threshold in this (sub)tree, in ascending `x` order.
    pub fn breakpoints(&self) -> Vec<Real> {
        match self {
            Tree::Leaf(_) => Vec::new(),
            Tree::Node(node) => node.breakpoints(),
        }
    }

    /// The trace of the split search that produced this (sub)tree, if any.
    /// Always present once a tree has gone through
    /// [`crate::splitter::compute_best_fit`]; `None` only for a bare leaf
    /// built directly and never submitted to the splitter.
    pub fn trace(&self) -> Option<&ErrorTrace> {
        match self {
            Tree::Leaf(leaf) => leaf.trace(),
            Tree::Node(node) => Some(node.trace()),
        }
    }

    /// `true` if this is a [`Tree::Leaf`].
    pub fn is_leaf(&self) -> bool {
        matches!(self, Tree::Leaf(_))
    }

    /// Render as a Graphviz `digraph` in DOT syntax, one box node per split
    /// and one plain node per leaf.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph Tree {\n");
        let mut next_id = 0usize;
        self.write_dot(&mut out, &mut next_id);
        out.push_str("}\n");
        out
    }

    fn write_dot(&self, out: &mut String, next_id: &mut usize) -> usize {
        let id = *next_id;
        *next_id += 1;
        match self {
            Tree::Leaf(leaf) => {
                out.push_str(&format!("  n{id} [label=\"{leaf}\"];\n"));
            }
            Tree::Node(node) => {
                out.push_str(&format!(
                    "  n{id} [label=\"x ≤ {:.3e}?\", shape=box];\n",
                    node.threshold()
                ));
                let left_id = node.left().write_dot(out, next_id);
                let right_id = node.right().write_dot(out, next_id);
                out.push_str(&format!("  n{id} -> n{left_id} [label=\"yes\"];\n"));
                out.push_str(&format!("  n{id} -> n{right_id} [label=\"no\"];\n"));
            }
        }
        id
    }
}

fn tabulate(s: &str, pad: &str, except_first: bool) -> String {
    s.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 && except_first {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Leaf(leaf) => write!(f, "{leaf}"),
            Tree::Node(node) => {
                let split = format!("x ≤ {:.3e}?", node.threshold());
                let left_str = tabulate(&node.left().to_string(), "│", true);
                let left_str = format!("└──{left_str}");
                let left_str = tabulate(&left_str, "    ", false);

                let right_str = tabulate(&node.right().to_string(), " ", true);
                let right_str = format!("└──{right_str}");
                let right_str = tabulate(&right_str, "    ", false);

                write!(f, "{split}\n{left_str}\n{right_str}")
            }
        }
    }
}
