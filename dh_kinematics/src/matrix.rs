//! Dense row-major matrices and the linear algebra the kinematics solvers
//! rely on: products, sub-matrix extraction, LU decomposition with partial
//! pivoting, substitution and inversion.
//!
//! Every stored value is rounded with [`round_default`], so results are
//! deterministic and directly comparable.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, Result};
use crate::precision::round_default;

/// Pivots smaller than this are treated as zero.
const PIVOT_EPSILON: f64 = 1e-12;

/// Rectangular matrix stored as rows of columns.
///
/// All rows have the same length. Deserialization goes through
/// [`Matrix::from_rows`], so ragged input is rejected there too.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    data: Vec<Vec<f64>>,
}

impl Matrix {
    /// Build from explicit rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            let width = first.len();
            if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
                return Err(KinematicsError::DimensionMismatch(format!(
                    "row {} has {} columns, expected {}",
                    index,
                    row.len(),
                    width
                )));
            }
        }
        Ok(Self { data: rows })
    }

    /// Square identity matrix of size `n`.
    pub fn identity(n: usize) -> Self {
        let mut m = create_matrix(n, n, 0.0);
        for i in 0..n {
            m.data[i][i] = 1.0;
        }
        m
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    pub fn row_slices(&self) -> impl Iterator<Item = &[f64]> {
        self.data.iter().map(Vec::as_slice)
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
    }

    /// Apply `f` to every element, producing a new matrix of the same shape.
    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&v| f(v)).collect())
                .collect(),
        }
    }

    /// Round every element to the engine precision.
    pub fn rounded(&self) -> Matrix {
        self.map(round_default)
    }

    pub fn transpose(&self) -> Matrix {
        transpose(self)
    }
}

impl Index<usize> for Matrix {
    type Output = [f64];

    fn index(&self, row: usize) -> &[f64] {
        &self.data[row]
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row]
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = KinematicsError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Matrix::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(m: Matrix) -> Self {
        m.data
    }
}

impl<const R: usize, const C: usize> From<[[f64; C]; R]> for Matrix {
    fn from(rows: [[f64; C]; R]) -> Self {
        Matrix {
            data: rows.iter().map(|row| row.to_vec()).collect(),
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

/// A `rows x cols` matrix filled with `fill`. Zero rows give an empty
/// matrix; zero columns give `rows` empty rows.
pub fn create_matrix(rows: usize, cols: usize, fill: f64) -> Matrix {
    Matrix {
        data: vec![vec![fill; cols]; rows],
    }
}

pub fn create_vector(size: usize, fill: f64) -> Vec<f64> {
    vec![fill; size]
}

// ============================================================================
// Products and slicing
// ============================================================================

/// Standard matrix multiplication with every cell rounded.
///
/// An empty operand yields an empty matrix.
pub fn matrix_product(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.is_empty() || b.is_empty() {
        return Ok(Matrix::default());
    }

    if a.cols() != b.rows() {
        return Err(KinematicsError::DimensionMismatch(format!(
            "cannot multiply {}x{} by {}x{}: the number of columns in the first matrix must equal the number of rows in the second",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }

    let mut result = create_matrix(a.rows(), b.cols(), 0.0);
    for i in 0..a.rows() {
        for j in 0..b.cols() {
            let mut sum = 0.0;
            for k in 0..a.cols() {
                sum += a[i][k] * b[k][j];
            }
            result[i][j] = round_default(sum);
        }
    }
    Ok(result)
}

pub fn transpose(m: &Matrix) -> Matrix {
    let mut result = create_matrix(m.cols(), m.rows(), 0.0);
    for (i, row) in m.row_slices().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            result[j][i] = value;
        }
    }
    result
}

/// Extract the leading `rows x cols` block of `m`.
pub fn sub_matrix(m: &Matrix, cols: usize, rows: usize) -> Result<Matrix> {
    if m.is_empty() {
        return Err(KinematicsError::DimensionMismatch(format!(
            "cannot extract a {}x{} sub-matrix from an empty matrix",
            rows, cols
        )));
    }
    if rows > m.rows() || cols > m.cols() {
        return Err(KinematicsError::DimensionMismatch(format!(
            "requested {}x{} sub-matrix exceeds source of {}x{}",
            rows,
            cols,
            m.rows(),
            m.cols()
        )));
    }

    Ok(Matrix {
        data: m.data[..rows].iter().map(|row| row[..cols].to_vec()).collect(),
    })
}

// ============================================================================
// LU decomposition, substitution and inversion
// ============================================================================

/// Combined LU factors of a square matrix with the row permutation applied.
///
/// The strict lower triangle of `lu` holds the multipliers of the unit
/// lower factor L; the upper triangle including the diagonal holds U.
/// `perm[i]` is the source row that ended up in row `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct LuDecomposition {
    pub lu: Matrix,
    pub perm: Vec<usize>,
    /// `+1` or `-1` for the permutation sign, `0` if a zero pivot was met.
    pub parity: i32,
}

impl LuDecomposition {
    /// Doolittle elimination with partial pivoting.
    ///
    /// A singular input is not an error: the decomposition stops at the
    /// first zero pivot column and reports `parity == 0`.
    pub fn decompose(matrix: &Matrix) -> Result<Self> {
        if !matrix.is_square() {
            return Err(KinematicsError::DimensionMismatch(format!(
                "LU decomposition requires a square matrix, got {}x{}",
                matrix.rows(),
                matrix.cols()
            )));
        }

        let n = matrix.rows();
        let mut lu = matrix.rounded();
        let mut perm: Vec<usize> = (0..n).collect();
        let mut parity = 1;

        for j in 0..n {
            let mut pivot_row = j;
            let mut max = lu[j][j].abs();
            for i in (j + 1)..n {
                let value = lu[i][j].abs();
                if value > max {
                    max = value;
                    pivot_row = i;
                }
            }

            if max < PIVOT_EPSILON {
                tracing::debug!(column = j, "zero pivot, matrix is singular");
                return Ok(Self { lu, perm, parity: 0 });
            }

            if pivot_row != j {
                lu.swap_rows(j, pivot_row);
                perm.swap(j, pivot_row);
                parity = -parity;
            }

            let pivot = lu[j][j];
            for i in (j + 1)..n {
                let factor = round_default(lu[i][j] / pivot);
                lu[i][j] = factor;
                for k in (j + 1)..n {
                    lu[i][k] = round_default(lu[i][k] - factor * lu[j][k]);
                }
            }
        }

        Ok(Self { lu, perm, parity })
    }

    #[inline]
    pub fn is_singular(&self) -> bool {
        self.parity == 0
    }

    /// `parity * prod(diag(U))`, rounded.
    pub fn determinant(&self) -> f64 {
        let mut det = self.parity as f64;
        for i in 0..self.lu.rows() {
            det *= self.lu[i][i];
        }
        round_default(det)
    }

    /// Solve `A x = b` for a right-hand side in the original row order.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        if b.len() != self.perm.len() {
            return Err(KinematicsError::DimensionMismatch(format!(
                "right-hand side has {} entries, expected {}",
                b.len(),
                self.perm.len()
            )));
        }
        let permuted: Vec<f64> = self.perm.iter().map(|&row| b[row]).collect();
        solve_linear(&self.lu, &permuted)
    }
}

/// Forward then back substitution against combined LU factors.
///
/// `b` must already be permuted to match the decomposition. A zero on the
/// diagonal of U is reported as [`KinematicsError::Arithmetic`].
pub fn solve_linear(lu: &Matrix, b: &[f64]) -> Result<Vec<f64>> {
    let n = lu.rows();
    if !lu.is_square() || b.len() != n {
        return Err(KinematicsError::DimensionMismatch(format!(
            "cannot solve a {}x{} system with a right-hand side of {} entries",
            lu.rows(),
            lu.cols(),
            b.len()
        )));
    }

    let mut y = create_vector(n, 0.0);
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= lu[i][j] * y[j];
        }
        y[i] = round_default(sum);
    }

    let mut x = create_vector(n, 0.0);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= lu[i][j] * x[j];
        }
        let diag = lu[i][i];
        if diag.abs() < PIVOT_EPSILON {
            tracing::debug!(row = i, "zero diagonal during back substitution");
            return Err(KinematicsError::Arithmetic(format!(
                "zero pivot at row {} during back substitution",
                i
            )));
        }
        x[i] = round_default(sum / diag);
    }

    Ok(x)
}

/// Inverse of a square matrix via LU decomposition.
pub fn invert(matrix: &Matrix) -> Result<Matrix> {
    if matrix.is_empty() {
        return Err(KinematicsError::DimensionMismatch(
            "cannot invert an empty matrix".to_string(),
        ));
    }

    let decomposition = LuDecomposition::decompose(matrix)?;
    if decomposition.determinant() == 0.0 {
        return Err(KinematicsError::SingularMatrix);
    }

    let n = matrix.rows();
    let mut inverse = create_matrix(n, n, 0.0);
    let mut unit = create_vector(n, 0.0);
    for col in 0..n {
        for row in 0..n {
            unit[row] = if decomposition.perm[row] == col { 1.0 } else { 0.0 };
        }
        let solution = solve_linear(&decomposition.lu, &unit)?;
        for row in 0..n {
            inverse[row][col] = solution[row];
        }
    }

    Ok(inverse)
}

/// Determinant of a square matrix, rounded.
pub fn determinant(matrix: &Matrix) -> Result<f64> {
    Ok(LuDecomposition::decompose(matrix)?.determinant())
}
