//! End-to-end scenarios exercised purely through the public API.

use segreg::{compute_regression, Mode, RegressionOptions};

#[test]
fn single_clean_line_never_splits() {
    let xs: Vec<f64> = (0..100).map(|i| i as f64).collect();
    let ys: Vec<f64> = xs.iter().map(|&x| -4.0 * x + 11.0).collect();
    let tree = compute_regression(&xs, &ys, RegressionOptions::default()).unwrap();
    assert!(tree.is_leaf());
    assert!(tree.breakpoints().is_empty());
    assert!(tree.to_string().starts_with("y ~"));
}

#[test]
fn two_segments_round_trip_through_dot_export() {
    let xs: Vec<f64> = (0..60).map(|i| i as f64).collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|&x| if x < 30.0 { x } else { 60.0 - x })
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
    let dot = tree.to_dot();
    assert!(dot.starts_with("digraph Tree {"));
    assert!(dot.trim_end().ends_with('}'));
    assert_eq!(tree.breakpoints().len(), 1);
}

#[test]
fn simplify_collapses_statistically_indistinguishable_leaves() {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for i in 0..15 {
        xs.push(i as f64);
        ys.push(2.0 * i as f64 + 1.0);
    }
    for i in 15..30 {
        // Same line, continued: a spurious split here would get simplified away.
        xs.push(i as f64);
        ys.push(2.0 * i as f64 + 1.0);
    }
    let tree = compute_regression(
        &xs,
        &ys,
        RegressionOptions {
            mode: Mode::Rss,
            epsilon: Some(0.1),
            simplify: true,
        },
    )
    .unwrap();
    assert!(tree.is_leaf());
}

#[test]
fn rejects_bad_config_and_bad_input() {
    assert!(compute_regression(&[1.0], &[1.0, 2.0], RegressionOptions::default()).is_err());
    assert!(compute_regression(&[], &[], RegressionOptions::default()).is_err());
}
