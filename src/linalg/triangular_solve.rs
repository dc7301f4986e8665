//! Triangular solve module.

use super::check_square;
use crate::{
    error::{slap_error, SlapError},
    mat::ShapeDisplay,
    MatMut, MatRef,
};

/// Computes the solution of `triangular_lower × X = rhs`, and stores the result in `rhs`.
///
/// `triangular_lower` is only accessed through its lower triangle, or through its upper triangle
/// if it is a transposed view, in which case the system `Lᵀ X = rhs` is solved by back
/// substitution without materializing the transpose. The diagonal is not checked for zeros.
///
/// # Errors
/// * [`SlapError::NotSquare`] if `triangular_lower` is not square.
/// * [`SlapError::IncompatibleDimensions`] if `rhs` does not have as many rows as
///   `triangular_lower`.
///
/// # Example
/// ```
/// use slap::{linalg::triangular_solve::solve_lower_triangular_in_place, mat};
///
/// let l = mat![[2.0, 0.0], [1.0, 4.0]];
/// let mut x = mat![[2.0], [9.0]];
///
/// solve_lower_triangular_in_place(l.as_ref(), x.as_mut()).unwrap();
/// assert_eq!(x, mat![[1.0], [2.0]]);
///
/// solve_lower_triangular_in_place(l.as_ref().transpose(), x.as_mut()).unwrap();
/// assert_eq!(x, mat![[0.25], [0.5]]);
/// ```
pub fn solve_lower_triangular_in_place(
    triangular_lower: MatRef<'_>,
    rhs: MatMut<'_>,
) -> Result<(), SlapError> {
    solve_triangular_in_place_impl(
        "solve_lower_triangular_in_place",
        triangular_lower,
        rhs,
        triangular_lower.is_transposed(),
    )
}

/// Computes the solution of `triangular_upper × X = rhs`, and stores the result in `rhs`.
///
/// Only the upper triangle of the logical matrix `triangular_upper` is accessed.
///
/// # Errors
/// Same as [`solve_lower_triangular_in_place`].
pub fn solve_upper_triangular_in_place(
    triangular_upper: MatRef<'_>,
    rhs: MatMut<'_>,
) -> Result<(), SlapError> {
    solve_triangular_in_place_impl("solve_upper_triangular_in_place", triangular_upper, rhs, true)
}

/// Substitution over the rows of `rhs`, forward or backward. The elements of `tri` read are the
/// diagonal and, for each row `j`, the rows processed after it in column `j`.
pub(crate) fn solve_triangular_in_place_impl(
    op: &str,
    tri: MatRef<'_>,
    mut rhs: MatMut<'_>,
    backward: bool,
) -> Result<(), SlapError> {
    tri.check()?;
    rhs.check()?;
    check_square(op, tri.layout())?;
    if tri.nrows() != rhs.nrows() {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "{op}: lhs = {}, rhs = {}",
            ShapeDisplay(tri.layout()),
            ShapeDisplay(rhs.layout())
        );
    }

    let n = rhs.nrows();
    let row = |idx: usize| if backward { n - 1 - idx } else { idx };

    for k in 0..rhs.ncols() {
        for j_ in 0..n {
            let j = row(j_);
            // SAFETY: both views are valid, `j`, `i` < n and `k` < rhs.ncols().
            unsafe {
                let x = rhs.read_unchecked(j, k) / tri.read_unchecked(j, j);
                rhs.write_unchecked(j, k, x);
                for i_ in j_ + 1..n {
                    let i = row(i_);
                    let value = rhs.read_unchecked(i, k) - tri.read_unchecked(i, j) * x;
                    rhs.write_unchecked(i, k, value);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{linalg::matmul::matmul, mat, Mat};
    use assert_approx_eq::assert_approx_eq;

    fn lower() -> Mat {
        Mat::from_column_major_vec(vec![1.0, 2.0, 5.0, 0.0, 1.0, 6.0, 0.0, 0.0, 7.0], 3, 3)
    }

    #[test]
    fn forward_and_backward() {
        let l = lower();
        let mut b = Mat::from_column_major_vec(vec![-2.0, 3.0, 10.0], 3, 1);

        solve_lower_triangular_in_place(l.as_ref(), b.as_mut()).unwrap();
        assert_approx_eq!(b.read(0, 0), -2.0);
        assert_approx_eq!(b.read(1, 0), 7.0);
        assert_approx_eq!(b.read(2, 0), -3.142857142857143);

        solve_lower_triangular_in_place(l.as_ref().transpose(), b.as_mut()).unwrap();
        assert_approx_eq!(b.read(0, 0), -19.142857142857142);
        assert_approx_eq!(b.read(1, 0), 9.693877551020408);
        assert_approx_eq!(b.read(2, 0), -0.4489795918367347);
    }

    #[test]
    fn upper_triangle_is_ignored() {
        let mut l = lower();
        l.write(0, 2, 100.0);
        l.write(0, 1, -3.0);
        let x = Mat::from_fn(3, 2, |i, j| (i as f64) - 2.0 * j as f64);

        let mut b = Mat::zeros(3, 2);
        matmul(b.as_mut(), lower().as_ref(), x.as_ref(), 1.0, 0.0).unwrap();
        solve_lower_triangular_in_place(l.as_ref(), b.as_mut()).unwrap();
        for j in 0..2 {
            for i in 0..3 {
                assert_approx_eq!(b.read(i, j), x.read(i, j));
            }
        }
    }

    #[test]
    fn random_transposed_solve() {
        let n = 6;
        let l = Mat::from_fn(n, n, |i, j| {
            if i == j {
                2.0 + rand::random::<f64>()
            } else if i > j {
                rand::random::<f64>() - 0.5
            } else {
                f64::NAN
            }
        });
        let x = Mat::from_fn(n, 3, |_, _| rand::random());

        // b = Lᵀx, with the NaN upper triangle replaced by the transpose of the lower one.
        let mut b = Mat::zeros(n, 3);
        for k in 0..3 {
            for i in 0..n {
                let mut acc = 0.0;
                for j in i..n {
                    acc += l.read(j, i) * x.read(j, k);
                }
                b.write(i, k, acc);
            }
        }

        solve_lower_triangular_in_place(l.as_ref().transpose(), b.as_mut()).unwrap();
        for k in 0..3 {
            for i in 0..n {
                assert_approx_eq!(b.read(i, k), x.read(i, k), 1e-10);
            }
        }
    }

    #[test]
    fn upper() {
        let u = mat![[2.0, 1.0, -1.0], [f64::NAN, 1.0, 3.0], [f64::NAN, f64::NAN, 4.0]];
        let mut b = mat![[3.0], [7.0], [8.0]];
        solve_upper_triangular_in_place(u.as_ref(), b.as_mut()).unwrap();
        assert_eq!(b, mat![[2.0], [1.0], [2.0]]);

        let l = lower();
        let mut b = Mat::from_column_major_vec(vec![-2.0, 7.0, -3.142857142857143], 3, 1);
        solve_upper_triangular_in_place(l.as_ref().transpose(), b.as_mut()).unwrap();
        assert_approx_eq!(b.read(0, 0), -19.142857142857142);
    }

    #[test]
    fn shape_errors() {
        let l = lower();
        let mut b = Mat::zeros(2, 1);
        assert_eq!(
            solve_lower_triangular_in_place(l.as_ref(), b.as_mut()),
            Err(SlapError::IncompatibleDimensions),
        );
        let rect = Mat::zeros(2, 3);
        assert_eq!(
            solve_lower_triangular_in_place(rect.as_ref(), b.as_mut()),
            Err(SlapError::NotSquare),
        );
    }
}
