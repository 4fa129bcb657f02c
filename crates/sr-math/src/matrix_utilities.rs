//! Matrix decomposition utilities.
//!
//! Only the singular value decomposition is needed here: both
//! [`crate::linear_least_squares`] and [`crate::ols`] solve their normal
//! equations through SVD rather than direct inversion, since the design
//! matrix can be ill-conditioned for small or near-degenerate leaves.

use crate::array::Array;
use crate::matrix::Matrix;

/// Singular value decomposition `U * diag(S) * Vt = A`.
pub struct SVD {
    /// Left singular vectors (column unitary matrix).
    pub u: Matrix,
    /// Singular values (as an array, in descending order).
    pub singular_values: Array,
    /// Right singular vectors transposed.
    pub v_t: Matrix,
}

impl SVD {
    /// Compute the SVD of `m`.
    pub fn new(m: &Matrix) -> Self {
        let svd = m.inner().clone().svd(true, true);
        let u = svd.u.expect("U computed");
        let v_t = svd.v_t.expect("Vt computed");
        let sv = svd.singular_values;
        Self {
            u: Matrix::from(u),
            singular_values: Array::from(sv.clone_owned()),
            v_t: Matrix::from(v_t),
        }
    }
}
