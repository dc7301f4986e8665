//! In-place elementwise operations.
//!
//! Every routine visits each logical element of the view exactly once, in column-major order,
//! so strided, transposed and sub-matrix views are all handled.

use super::ensure_valid;
use crate::{error::SlapError, MatMut};
use reborrow::*;

/// Sets every element of `mat` to `value`.
pub fn set_constant(mut mat: MatMut<'_>, value: f64) -> Result<(), SlapError> {
    mat.check()?;
    mat.for_each(|x| *x = value);
    Ok(())
}

/// Multiplies every element of `mat` by `alpha`.
pub fn scale(mut mat: MatMut<'_>, alpha: f64) -> Result<(), SlapError> {
    mat.check()?;
    mat.for_each(|x| *x *= alpha);
    Ok(())
}

/// Sets `mat` to `value` times the identity.
///
/// For a rectangular matrix only the first `min(nrows, ncols)` diagonal entries are set.
pub fn set_identity(mut mat: MatMut<'_>, value: f64) -> Result<(), SlapError> {
    mat.check()?;
    mat.for_each(|x| *x = 0.0);
    for i in 0..mat.min_dim() {
        mat.write(i, i, value);
    }
    Ok(())
}

/// Copies `diag` into the diagonal of `mat`, leaving the off-diagonal elements untouched.
///
/// At most `min(nrows, ncols)` entries are written, extra values are ignored.
pub fn set_diagonal(mut mat: MatMut<'_>, diag: &[f64]) -> Result<(), SlapError> {
    mat.check()?;
    let n = Ord::min(mat.min_dim(), diag.len());
    for (i, &value) in diag[..n].iter().enumerate() {
        mat.write(i, i, value);
    }
    Ok(())
}

/// Adds `alpha` to every diagonal element of the square matrix `mat`.
pub fn add_identity(mut mat: MatMut<'_>, alpha: f64) -> Result<(), SlapError> {
    mat.check()?;
    super::check_square("add_identity", mat.layout())?;
    for i in 0..mat.nrows() {
        *mat.get_mut(i, i) += alpha;
    }
    Ok(())
}

/// Fills `mat` with values linearly spaced from `start` to `stop`, both included.
///
/// The values are assigned in column-major order of the logical matrix, independently of the
/// memory layout. A single element matrix is set to `start`.
///
/// # Example
/// ```
/// use slap::{linalg::unary::set_range, mat, Mat};
///
/// let mut a = Mat::zeros(2, 2);
/// set_range(a.as_mut(), 0.0, 3.0).unwrap();
/// assert_eq!(a, mat![[0.0, 2.0], [1.0, 3.0]]);
/// ```
pub fn set_range(mat: MatMut<'_>, start: f64, stop: f64) -> Result<(), SlapError> {
    mat.check()?;
    let len = mat.num_elements();
    let step = if len > 1 {
        (stop - start) / (len - 1) as f64
    } else {
        0.0
    };
    let mut mat = mat;
    let mut k = 0usize;
    mat.for_each(|x| {
        *x = start + k as f64 * step;
        k += 1;
    });
    Ok(())
}

/// Replaces every element `x` of `mat` by `f(x)`.
pub fn map(mut mat: MatMut<'_>, mut f: impl FnMut(f64) -> f64) -> Result<(), SlapError> {
    ensure_valid("map", mat.rb())?;
    mat.for_each(|x| *x = f(*x));
    Ok(())
}
