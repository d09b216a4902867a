//! Local dense multiply.

use crate::matrix::{RowBlock, RowBlockMut};
use crate::Matrix;

/// `C = A * B` into existing storage.
///
/// The caller guarantees `A.cols == B.rows`, `C.rows == A.rows` and
/// `C.cols == B.cols`. Sums run over `k` in ascending order from `0.0`.
pub fn multiply_into(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    multiply_block_into(a.as_block(), b, c.as_block_mut());
}

/// Multiply a row block of `A` by `B` into the matching row block of `C`.
pub fn multiply_block_into(a: RowBlock<'_>, b: &Matrix, mut c: RowBlockMut<'_>) {
    debug_assert_eq!(a.cols(), b.rows());
    debug_assert_eq!(a.rows(), c.rows());
    debug_assert_eq!(b.cols(), c.cols());

    let inner = a.cols();
    let b_cols = b.cols();
    let b_data = b.data();
    for i in 0..a.rows() {
        let a_row = a.row(i);
        let c_row = c.row_mut(i);
        for (j, cell) in c_row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for k in 0..inner {
                sum += a_row[k] * b_data[k * b_cols + j];
            }
            *cell = sum;
        }
    }
}

/// Allocate `C` and compute `A * B`.
///
/// Returns the invalid matrix if either operand is invalid, the inner
/// dimensions differ, or `C` cannot be allocated.
pub fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    if !(a.is_valid() && b.is_valid() && a.cols() == b.rows()) {
        return Matrix::invalid();
    }
    let mut c = Matrix::create(a.rows(), b.cols());
    if c.is_valid() {
        multiply_into(a, b, &mut c);
    }
    c
}
