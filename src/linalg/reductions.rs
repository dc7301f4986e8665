//! Reductions over the elements of a matrix.
//!
//! The matrix is traversed in column-major logical order, so strided and transposed views give
//! the same result as their dense counterparts. Scalar reductions of an invalid view return
//! `NaN` (the reason is reported through the diagnostics).

use crate::{
    error::slap_error,
    iter::{Cursor, Position},
    mat::ShapeDisplay,
    MatRef, SlapError,
};

#[inline]
fn fold(mat: MatRef<'_>, init: f64, mut f: impl FnMut(f64, f64) -> f64) -> f64 {
    if mat.check().is_err() {
        return f64::NAN;
    }
    let data = mat.as_slice();
    Cursor::new(mat.layout()).fold(init, |acc, pos| f(acc, data[pos.offset]))
}

/// Returns the sum of the elements of `mat`.
pub fn sum(mat: MatRef<'_>) -> f64 {
    fold(mat, 0.0, |acc, x| acc + x)
}

/// Returns the sum of the squares of the elements of `mat`.
pub fn norm_l2_squared(mat: MatRef<'_>) -> f64 {
    fold(mat, 0.0, |acc, x| acc + x * x)
}

/// Returns the Frobenius norm of `mat`, the two-norm for a vector.
pub fn norm_l2(mat: MatRef<'_>) -> f64 {
    libm::sqrt(norm_l2_squared(mat))
}

/// Returns the sum of the absolute values of the elements of `mat`.
pub fn norm_l1(mat: MatRef<'_>) -> f64 {
    fold(mat, 0.0, |acc, x| acc + libm::fabs(x))
}

/// Returns the largest absolute value of the elements of `mat`, `0.0` if it is empty.
pub fn norm_max(mat: MatRef<'_>) -> f64 {
    fold(mat, 0.0, |acc, x| {
        let x = libm::fabs(x);
        if x > acc {
            x
        } else {
            acc
        }
    })
}

fn arg_best(mat: MatRef<'_>, better: impl Fn(f64, f64) -> bool) -> Option<(Position, f64)> {
    mat.check().ok()?;
    let data = mat.as_slice();
    let mut best: Option<(Position, f64)> = None;
    for pos in Cursor::new(mat.layout()) {
        let value = data[pos.offset];
        match best {
            Some((_, current)) if !better(value, current) => {}
            _ => best = Some((pos, value)),
        }
    }
    best
}

/// Returns the position and value of the largest element of `mat`, the first one in
/// column-major order in case of ties.
///
/// Returns `None` if `mat` is empty or invalid.
///
/// # Example
/// ```
/// use slap::{linalg::reductions::arg_max, mat};
///
/// let a = mat![[0.0, -5.0, 1.0], [-2.0, 2.0, 2.0]];
/// let (pos, value) = arg_max(a.as_ref()).unwrap();
/// assert_eq!((pos.row, pos.col, pos.linear), (1, 1, 3));
/// assert_eq!(value, 2.0);
/// ```
pub fn arg_max(mat: MatRef<'_>) -> Option<(Position, f64)> {
    arg_best(mat, |value, current| value > current)
}

/// Returns the position and value of the smallest element of `mat`, the first one in
/// column-major order in case of ties.
///
/// Returns `None` if `mat` is empty or invalid.
pub fn arg_min(mat: MatRef<'_>) -> Option<(Position, f64)> {
    arg_best(mat, |value, current| value < current)
}

/// Returns the largest element of `mat`, `-inf` if it is empty.
pub fn max(mat: MatRef<'_>) -> f64 {
    arg_max(mat).map_or(f64::NEG_INFINITY, |(_, value)| value)
}

/// Returns the smallest element of `mat`, `+inf` if it is empty.
pub fn min(mat: MatRef<'_>) -> f64 {
    arg_min(mat).map_or(f64::INFINITY, |(_, value)| value)
}

/// Returns the Frobenius norm of `lhs - rhs`.
///
/// Returns `+inf` if either matrix is invalid or if their logical shapes differ.
pub fn normed_difference(lhs: MatRef<'_>, rhs: MatRef<'_>) -> f64 {
    if lhs.check().is_err() || rhs.check().is_err() {
        return f64::INFINITY;
    }
    if lhs.shape() != rhs.shape() {
        let _: Result<(), SlapError> = slap_error!(
            SlapError::IncompatibleDimensions,
            "cannot compare matrices of sizes {} and {}",
            ShapeDisplay(lhs.layout()),
            ShapeDisplay(rhs.layout())
        );
        return f64::INFINITY;
    }

    let mut diff = 0.0;
    for pos in lhs.positions() {
        let d = lhs.read(pos.row, pos.col) - rhs.read(pos.row, pos.col);
        diff += d * d;
    }
    libm::sqrt(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mat, Mat};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn extrema() {
        let a = Mat::from_column_major_vec(vec![0.0, -2.0, -5.0, 2.0, 1.0, 2.0], 2, 3);
        let (pos, value) = arg_max(a.as_ref()).unwrap();
        assert_eq!((pos.row, pos.col, pos.linear), (1, 1, 3));
        assert_eq!(value, 2.0);

        let (pos, value) = arg_min(a.as_ref()).unwrap();
        assert_eq!((pos.row, pos.col, pos.linear), (0, 1, 2));
        assert_eq!(value, -5.0);

        let (pos, _) = arg_max(a.as_ref().transpose()).unwrap();
        assert_eq!((pos.row, pos.col), (1, 1));

        assert_eq!(arg_max(Mat::zeros(0, 3).as_ref()), None);
        assert_eq!(max(Mat::zeros(0, 3).as_ref()), f64::NEG_INFINITY);
    }

    #[test]
    fn vector_norms() {
        let x = Mat::from_column_major_vec(vec![1.0, 0.0, -6.0, -10.0, 0.5, 1.0], 6, 1);
        let x = x.as_ref();
        assert_eq!(max(x), 1.0);
        assert_eq!(arg_max(x).unwrap().0.linear, 0);
        assert_eq!(min(x), -10.0);
        assert_eq!(arg_min(x).unwrap().0.linear, 3);

        let squared = 1.0 + 36.0 + 100.0 + 0.25 + 1.0;
        assert_approx_eq!(norm_l2_squared(x), squared);
        assert_approx_eq!(norm_l2(x), libm::sqrt(squared));
        assert_approx_eq!(norm_l1(x), 18.5);
        assert_approx_eq!(norm_max(x), 10.0);
        assert_approx_eq!(sum(x), -13.5);
    }

    #[test]
    fn strided_sum() {
        let a = Mat::from_fn(4, 4, |i, j| (i + 4 * j) as f64);
        let sub = a.as_ref().submatrix(1, 1, 2, 2).unwrap();
        assert_eq!(sum(sub), 5.0 + 6.0 + 9.0 + 10.0);
        assert_eq!(sum(sub.transpose()), 30.0);
    }

    #[test]
    fn differences() {
        let a = mat![[1.0, 2.0], [3.0, 4.0]];
        let b = mat![[1.0, 2.0], [3.0, 6.0]];
        assert_approx_eq!(normed_difference(a.as_ref(), b.as_ref()), 2.0);
        assert_eq!(normed_difference(a.as_ref(), a.as_ref()), 0.0);
        assert_eq!(
            normed_difference(a.as_ref(), Mat::zeros(2, 3).as_ref()),
            f64::INFINITY,
        );

        let mut freed = Mat::zeros(2, 2);
        freed.free().unwrap();
        assert_eq!(normed_difference(a.as_ref(), freed.as_ref()), f64::INFINITY);
        assert!(sum(freed.as_ref()).is_nan());
    }
}
