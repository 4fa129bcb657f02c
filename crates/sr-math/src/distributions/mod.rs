//! Probability distributions, delegating to the `statrs` crate.

pub mod student_t;

pub use student_t::StudentTDistribution;
