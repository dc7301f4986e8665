//! Vector products and quadratic forms.
//!
//! Vectors are column vectors, views with a single column. Scalar valued products return `NaN`
//! when the operands are invalid or their lengths disagree.

use super::check_vector;
use crate::{
    error::{slap_error, SlapError},
    mat::ShapeDisplay,
    MatMut, MatRef,
};
use reborrow::*;

fn is_vector(x: MatRef<'_>) -> bool {
    x.is_valid() && x.ncols() == 1
}

/// Returns `xᵀ y`.
///
/// # Example
/// ```
/// use slap::{linalg::products::inner_product, mat};
///
/// let x = mat![[1.0], [2.0], [3.0]];
/// let y = mat![[4.0], [5.0], [6.0]];
/// assert_eq!(inner_product(x.as_ref(), y.as_ref()), 32.0);
/// ```
pub fn inner_product(x: MatRef<'_>, y: MatRef<'_>) -> f64 {
    if !is_vector(x) || !is_vector(y) || x.nrows() != y.nrows() {
        return f64::NAN;
    }
    (0..x.nrows()).map(|i| x.read(i, 0) * y.read(i, 0)).sum()
}

/// Computes `dst = x yᵀ`, where `dst` is `m × n`, `x` has length `m` and `y` has length `n`.
pub fn outer_product(mut dst: MatMut<'_>, x: MatRef<'_>, y: MatRef<'_>) -> Result<(), SlapError> {
    dst.check()?;
    x.check()?;
    y.check()?;
    check_vector("outer_product", x.layout())?;
    check_vector("outer_product", y.layout())?;
    if dst.nrows() != x.nrows() || dst.ncols() != y.nrows() {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "outer_product: dst = {}, x = {}, y = {}",
            ShapeDisplay(dst.layout()),
            ShapeDisplay(x.layout()),
            ShapeDisplay(y.layout())
        );
    }

    for pos in dst.positions() {
        let (i, j) = (pos.row, pos.col);
        dst.write(i, j, x.read(i, 0) * y.read(j, 0));
    }
    Ok(())
}

/// Computes the cross product `dst = x × y` of two vectors of length 3.
pub fn cross_product(mut dst: MatMut<'_>, x: MatRef<'_>, y: MatRef<'_>) -> Result<(), SlapError> {
    dst.check()?;
    x.check()?;
    y.check()?;
    for v in [dst.rb(), x, y] {
        check_vector("cross_product", v.layout())?;
        if v.nrows() != 3 {
            return slap_error!(
                SlapError::IncompatibleDimensions,
                "cross_product: expected vectors of length 3, got {}",
                ShapeDisplay(v.layout())
            );
        }
    }

    let (x0, x1, x2) = (x.read(0, 0), x.read(1, 0), x.read(2, 0));
    let (y0, y1, y2) = (y.read(0, 0), y.read(1, 0), y.read(2, 0));
    dst.write(0, 0, x1 * y2 - x2 * y1);
    dst.write(1, 0, x2 * y0 - x0 * y2);
    dst.write(2, 0, x0 * y1 - x1 * y0);
    Ok(())
}

/// Returns `xᵀ A y`, where `A` is `m × n`, `x` has length `m` and `y` has length `n`.
pub fn quadratic_form(x: MatRef<'_>, a: MatRef<'_>, y: MatRef<'_>) -> f64 {
    if !is_vector(x) || !is_vector(y) || !a.is_valid() {
        return f64::NAN;
    }
    if x.nrows() != a.nrows() || y.nrows() != a.ncols() {
        return f64::NAN;
    }

    let mut acc = 0.0;
    for pos in a.positions() {
        let (i, j) = (pos.row, pos.col);
        acc += x.read(i, 0) * a.read(i, j) * y.read(j, 0);
    }
    acc
}
