//! Matrix multiplication.
//!
//! The general routine [`matmul`] computes `dst = beta * dst + alpha * lhs * rhs` with the
//! classical triple loop, reading every operand through its layout so transposed operands need
//! no explicit copy. [`matmul_ab`] and [`matmul_atb`] are overwriting variants restricted to
//! dense column-major operands, which address the buffers directly.

use super::check_vector;
use crate::{
    error::{slap_error, SlapError},
    mat::ShapeDisplay,
    MatMut, MatRef,
};
use reborrow::*;

pub mod triangular;

#[inline]
fn check_matmul_shapes(
    op: &str,
    dst: MatRef<'_>,
    lhs: MatRef<'_>,
    rhs: MatRef<'_>,
) -> Result<(), SlapError> {
    dst.check()?;
    lhs.check()?;
    rhs.check()?;
    if lhs.ncols() != rhs.nrows() || dst.nrows() != lhs.nrows() || dst.ncols() != rhs.ncols() {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "{op}: cannot multiply matrices, dst = {}, lhs = {}, rhs = {}",
            ShapeDisplay(dst.layout()),
            ShapeDisplay(lhs.layout()),
            ShapeDisplay(rhs.layout())
        );
    }
    Ok(())
}

/// Scales the `(i, j)` element of `dst` by `beta`, treating `beta == 0` as an overwrite so that
/// uninitialized or non-finite values are discarded.
///
/// # Safety
/// `dst` must be valid and `(i, j)` in bounds.
#[inline(always)]
unsafe fn scale_acc(dst: &MatMut<'_>, i: usize, j: usize, beta: f64) -> f64 {
    if beta == 0.0 {
        0.0
    } else {
        beta * dst.read_unchecked(i, j)
    }
}

/// Computes `dst = beta * dst + alpha * lhs * rhs`.
///
/// The shapes are compared using the transposition-aware extents: `lhs` is `n × m`, `rhs` is
/// `m × p` and `dst` is `n × p`. A mismatch returns [`SlapError::IncompatibleDimensions`] and
/// reports the three shapes.
///
/// # Example
/// ```
/// use slap::{linalg::matmul::matmul, mat};
///
/// let a = mat![[1.0, 2.0], [3.0, 4.0]];
/// let mut c = mat![[1.0, 1.0], [1.0, 1.0]];
///
/// // c = c + aᵀa
/// matmul(c.as_mut(), a.as_ref().transpose(), a.as_ref(), 1.0, 1.0).unwrap();
/// assert_eq!(c, mat![[11.0, 15.0], [15.0, 21.0]]);
/// ```
pub fn matmul(
    mut dst: MatMut<'_>,
    lhs: MatRef<'_>,
    rhs: MatRef<'_>,
    alpha: f64,
    beta: f64,
) -> Result<(), SlapError> {
    check_matmul_shapes("matmul", dst.rb(), lhs, rhs)?;

    let (n, p) = dst.shape();
    let m = lhs.ncols();
    for i in 0..n {
        for j in 0..p {
            // SAFETY: the three views are valid and the indices are bounded by their shapes.
            unsafe {
                let mut acc = 0.0;
                for k in 0..m {
                    acc += lhs.read_unchecked(i, k) * rhs.read_unchecked(k, j);
                }
                let value = scale_acc(&dst, i, j, beta) + alpha * acc;
                dst.write_unchecked(i, j, value);
            }
        }
    }
    Ok(())
}

fn check_dense(op: &str, mat: MatRef<'_>) -> Result<(), SlapError> {
    if !mat.is_dense() || mat.is_transposed() {
        return slap_error!(
            SlapError::NotDense,
            "{op}: expected a dense column-major matrix, got a {} matrix with strides ({}, {})",
            ShapeDisplay(mat.layout()),
            mat.row_stride(),
            mat.col_stride()
        );
    }
    Ok(())
}

/// Computes `dst = lhs * rhs` for dense column-major operands.
///
/// Fails with [`SlapError::NotDense`] if any operand is strided or transposed.
pub fn matmul_ab(dst: MatMut<'_>, lhs: MatRef<'_>, rhs: MatRef<'_>) -> Result<(), SlapError> {
    check_matmul_shapes("matmul_ab", dst.rb(), lhs, rhs)?;
    check_dense("matmul_ab", dst.rb())?;
    check_dense("matmul_ab", lhs)?;
    check_dense("matmul_ab", rhs)?;

    let (n, p) = dst.shape();
    let m = lhs.ncols();
    let (a, b) = (lhs.as_slice(), rhs.as_slice());
    let c = dst.as_slice_mut();
    for j in 0..p {
        for i in 0..n {
            let mut acc = 0.0;
            for k in 0..m {
                acc += a[i + n * k] * b[k + m * j];
            }
            c[i + n * j] = acc;
        }
    }
    Ok(())
}

/// Computes `dst = lhsᵀ * rhs` for dense column-major operands, where `lhs` is given
/// untransposed.
///
/// Fails with [`SlapError::NotDense`] if any operand is strided or transposed.
pub fn matmul_atb(dst: MatMut<'_>, lhs: MatRef<'_>, rhs: MatRef<'_>) -> Result<(), SlapError> {
    check_matmul_shapes("matmul_atb", dst.rb(), lhs.transpose(), rhs)?;
    check_dense("matmul_atb", dst.rb())?;
    check_dense("matmul_atb", lhs)?;
    check_dense("matmul_atb", rhs)?;

    let (n, p) = dst.shape();
    let m = lhs.nrows();
    let (a, b) = (lhs.as_slice(), rhs.as_slice());
    let c = dst.as_slice_mut();
    for j in 0..p {
        for i in 0..n {
            let mut acc = 0.0;
            for k in 0..m {
                acc += a[k + m * i] * b[k + m * j];
            }
            c[i + n * j] = acc;
        }
    }
    Ok(())
}

/// Computes `dst = beta * dst + alpha * lhs * rhs`, where `lhs` is symmetric and only its lower
/// triangle is read.
pub fn symmetric_matmul(
    mut dst: MatMut<'_>,
    lhs: MatRef<'_>,
    rhs: MatRef<'_>,
    alpha: f64,
    beta: f64,
) -> Result<(), SlapError> {
    check_matmul_shapes("symmetric_matmul", dst.rb(), lhs, rhs)?;
    super::check_square("symmetric_matmul", lhs.layout())?;

    let (n, p) = dst.shape();
    for j in 0..p {
        for i in 0..n {
            // SAFETY: the three views are valid and the indices are bounded by their shapes.
            unsafe {
                let mut acc = 0.0;
                for k in 0..n {
                    let (row, col) = if i < k { (k, i) } else { (i, k) };
                    acc += lhs.read_unchecked(row, col) * rhs.read_unchecked(k, j);
                }
                let value = scale_acc(&dst, i, j, beta) + alpha * acc;
                dst.write_unchecked(i, j, value);
            }
        }
    }
    Ok(())
}

fn check_diagonal(op: &str, diag: MatRef<'_>, len: usize) -> Result<(), SlapError> {
    diag.check()?;
    check_vector(op, diag.layout())?;
    if diag.nrows() != len {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "{op}: expected a diagonal of length {len}, got {}",
            diag.nrows()
        );
    }
    Ok(())
}

/// Computes `dst = diag(d) * src`, with `d` a column vector of length `src.nrows()`.
pub fn diagonal_multiply_left(
    mut dst: MatMut<'_>,
    d: MatRef<'_>,
    src: MatRef<'_>,
) -> Result<(), SlapError> {
    dst.check()?;
    src.check()?;
    super::check_same_shape("diagonal_multiply_left", dst.layout(), src.layout())?;
    check_diagonal("diagonal_multiply_left", d, src.nrows())?;

    for pos in dst.positions() {
        let (i, j) = (pos.row, pos.col);
        dst.write(i, j, d.read(i, 0) * src.read(i, j));
    }
    Ok(())
}

/// Computes `dst = src * diag(d)`, with `d` a column vector of length `src.ncols()`.
pub fn diagonal_multiply_right(
    mut dst: MatMut<'_>,
    src: MatRef<'_>,
    d: MatRef<'_>,
) -> Result<(), SlapError> {
    dst.check()?;
    src.check()?;
    super::check_same_shape("diagonal_multiply_right", dst.layout(), src.layout())?;
    check_diagonal("diagonal_multiply_right", d, src.ncols())?;

    for pos in dst.positions() {
        let (i, j) = (pos.row, pos.col);
        dst.write(i, j, src.read(i, j) * d.read(j, 0));
    }
    Ok(())
}
