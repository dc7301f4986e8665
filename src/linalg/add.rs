//! Elementwise combinations of two matrices.
//!
//! A [`MatMut`] cannot alias a [`MatRef`], so the forms where the destination is also one of the
//! inputs are exposed as separate functions: [`add_in_place`] computes `dst += alpha * rhs`, and
//! [`add_in_place_rhs`] computes `dst = lhs + alpha * dst`. Each output element is computed from
//! a single read of each input element before it is written.

use super::{check_same_shape, ensure_valid};
use crate::{error::SlapError, MatMut, MatRef};
use reborrow::*;

/// Computes `dst = lhs + alpha * rhs`.
///
/// # Example
/// ```
/// use slap::{linalg::add::add, mat, Mat};
///
/// let a = mat![[1.0, 2.0], [3.0, 4.0]];
/// let b = mat![[1.0, 1.0], [1.0, 1.0]];
/// let mut c = Mat::zeros(2, 2);
///
/// add(c.as_mut(), a.as_ref(), b.as_ref(), -1.0).unwrap();
/// assert_eq!(c, mat![[0.0, 1.0], [2.0, 3.0]]);
/// ```
pub fn add(dst: MatMut<'_>, lhs: MatRef<'_>, rhs: MatRef<'_>, alpha: f64) -> Result<(), SlapError> {
    binary_map(dst, lhs, rhs, |x, y| x + alpha * y)
}

/// Computes `dst = dst + alpha * rhs`.
pub fn add_in_place(dst: MatMut<'_>, rhs: MatRef<'_>, alpha: f64) -> Result<(), SlapError> {
    binary_map_in_place(dst, rhs, |x, y| x + alpha * y)
}

/// Computes `dst = lhs + alpha * dst`.
pub fn add_in_place_rhs(lhs: MatRef<'_>, dst: MatMut<'_>, alpha: f64) -> Result<(), SlapError> {
    binary_map_in_place(dst, lhs, |x, y| y + alpha * x)
}

/// Computes `dst[i, j] = f(lhs[i, j], rhs[i, j])` for every element.
pub fn binary_map(
    mut dst: MatMut<'_>,
    lhs: MatRef<'_>,
    rhs: MatRef<'_>,
    mut f: impl FnMut(f64, f64) -> f64,
) -> Result<(), SlapError> {
    ensure_valid("binary_map", dst.rb())?;
    ensure_valid("binary_map", lhs)?;
    ensure_valid("binary_map", rhs)?;
    check_same_shape("binary_map", dst.layout(), lhs.layout())?;
    check_same_shape("binary_map", dst.layout(), rhs.layout())?;

    for pos in dst.positions() {
        let (i, j) = (pos.row, pos.col);
        // SAFETY: all three views are valid, have the same shape, and `(i, j)` is in bounds.
        unsafe {
            let value = f(lhs.read_unchecked(i, j), rhs.read_unchecked(i, j));
            dst.write_unchecked(i, j, value);
        }
    }
    Ok(())
}

/// Computes `dst[i, j] = f(dst[i, j], rhs[i, j])` for every element.
pub fn binary_map_in_place(
    mut dst: MatMut<'_>,
    rhs: MatRef<'_>,
    mut f: impl FnMut(f64, f64) -> f64,
) -> Result<(), SlapError> {
    ensure_valid("binary_map", dst.rb())?;
    ensure_valid("binary_map", rhs)?;
    check_same_shape("binary_map", dst.layout(), rhs.layout())?;

    for pos in dst.positions() {
        let (i, j) = (pos.row, pos.col);
        // SAFETY: both views are valid, have the same shape, and `(i, j)` is in bounds.
        unsafe {
            let value = f(dst.read_unchecked(i, j), rhs.read_unchecked(i, j));
            dst.write_unchecked(i, j, value);
        }
    }
    Ok(())
}
