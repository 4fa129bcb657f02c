//! `Matrix` — a two-dimensional matrix of reals.
//!
//! This is a thin newtype around `nalgebra::DMatrix<f64>` that exposes
//! indexing, transpose, multiplication, determinant, inverse, etc. Used by
//! [`crate::ols`] to build the two-column `[1, x]` design matrix for the
//! simplifier's significance test.

use crate::array::Array;
use nalgebra::DMatrix;
use sr_core::Real;
use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

/// A dynamically-sized 2D matrix of `Real` values (row-major access).
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(DMatrix<Real>);

impl Matrix {
    /// Create a zero-filled `rows × cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self(DMatrix::zeros(rows, cols))
    }

    /// Create a matrix filled with `value`.
    pub fn from_element(rows: usize, cols: usize, value: Real) -> Self {
        Self(DMatrix::from_element(rows, cols, value))
    }

    /// Create an identity matrix of size `n × n`.
    pub fn identity(n: usize) -> Self {
        Self(DMatrix::identity(n, n))
    }

    /// Create from a row-major data slice.
    pub fn from_row_slice(rows: usize, cols: usize, data: &[Real]) -> Self {
        Self(DMatrix::from_row_slice(rows, cols, data))
    }

    /// Create from column-major data slice (nalgebra's native layout).
    pub fn from_column_slice(rows: usize, cols: usize, data: &[Real]) -> Self {
        Self(DMatrix::from_column_slice(rows, cols, data))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    /// Return `true` if the matrix is square.
    pub fn is_square(&self) -> bool {
        self.0.nrows() == self.0.ncols()
    }

    /// Return `true` if all elements are zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&x| x == 0.0)
    }

    /// Borrow the inner `DMatrix`.
    pub fn inner(&self) -> &DMatrix<Real> {
        &self.0
    }

    /// Consume and return the inner `DMatrix`.
    pub fn into_inner(self) -> DMatrix<Real> {
        self.0
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Determinant (only for square matrices).
    pub fn determinant(&self) -> Real {
        self.0.determinant()
    }

    /// Inverse (returns `None` if the matrix is singular or not square).
    pub fn try_inverse(&self) -> Option<Self> {
        self.0.clone().try_inverse().map(Self)
    }

    /// Trace (sum of diagonal elements).
    pub fn trace(&self) -> Real {
        self.0.trace()
    }

    /// Frobenius norm.
    pub fn norm(&self) -> Real {
        self.0.norm()
    }

    /// Diagonal elements as an `Array`.
    pub fn diagonal(&self) -> Array {
        let n = self.0.nrows().min(self.0.ncols());
        let data: Vec<Real> = (0..n).map(|i| self.0[(i, i)]).collect();
        Array::from_vec(data)
    }

    /// Extract a row as an `Array`.
    pub fn row(&self, i: usize) -> Array {
        let data: Vec<Real> = self.0.row(i).iter().copied().collect();
        Array::from_vec(data)
    }

    /// Extract a column as an `Array`.
    pub fn column(&self, j: usize) -> Array {
        let data: Vec<Real> = self.0.column(j).iter().copied().collect();
        Array::from_vec(data)
    }

    /// Matrix-vector product `M * v`.
    pub fn mul_vec(&self, v: &Array) -> Array {
        Array::from((&self.0 * v.inner()).clone_owned())
    }

    /// Element-wise apply.
    pub fn map<F: Fn(Real) -> Real>(&self, f: F) -> Self {
        Self(self.0.map(f))
    }

    /// Multiply every element by `scalar`.
    pub fn scale(&self, scalar: Real) -> Self {
        Self(&self.0 * scalar)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> Real {
        self.0.sum()
    }
}

// ── From / Into ───────────────────────────────────────────────────────────────

impl From<DMatrix<Real>> for Matrix {
    fn from(m: DMatrix<Real>) -> Self {
        Self(m)
    }
}

impl From<Matrix> for DMatrix<Real> {
    fn from(m: Matrix) -> Self {
        m.0
    }
}

// ── Indexing ──────────────────────────────────────────────────────────────────

impl Index<(usize, usize)> for Matrix {
    type Output = Real;
    fn index(&self, (i, j): (usize, usize)) -> &Real {
        &self.0[(i, j)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Real {
        &mut self.0[(i, j)]
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

impl Add for &Matrix {
    type Output = Matrix;
    fn add(self, rhs: &Matrix) -> Matrix {
        Matrix(&self.0 + &rhs.0)
    }
}

impl Add for Matrix {
    type Output = Matrix;
    fn add(self, rhs: Matrix) -> Matrix {
        Matrix(self.0 + rhs.0)
    }
}

impl Sub for &Matrix {
    type Output = Matrix;
    fn sub(self, rhs: &Matrix) -> Matrix {
        Matrix(&self.0 - &rhs.0)
    }
}

impl Sub for Matrix {
    type Output = Matrix;
    fn sub(self, rhs: Matrix) -> Matrix {
        Matrix(self.0 - rhs.0)
    }
}

impl Mul for &Matrix {
    type Output = Matrix;
    fn mul(self, rhs: &Matrix) -> Matrix {
        Matrix(&self.0 * &rhs.0)
    }
}

impl Mul for Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Matrix) -> Matrix {
        Matrix(self.0 * rhs.0)
    }
}

impl Mul<Real> for &Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Real) -> Matrix {
        Matrix(&self.0 * rhs)
    }
}

impl Mul<Real> for Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Real) -> Matrix {
        Matrix(self.0 * rhs)
    }
}

impl Neg for &Matrix {
    type Output = Matrix;
    fn neg(self) -> Matrix {
        Matrix(-&self.0)
    }
}

impl Neg for Matrix {
    type Output = Matrix;
    fn neg(self) -> Matrix {
        Matrix(-self.0)
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.0.nrows() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for j in 0..self.0.ncols() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.0[(i, j)])?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
