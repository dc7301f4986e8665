//! Multiplication by a triangular matrix.
//!
//! The triangular operand is square and only its upper (resp. lower) triangle, diagonal
//! included, is read. Elements on the other side of the diagonal are treated as zeros whatever
//! their stored value.

use super::check_matmul_shapes;
use crate::{error::SlapError, linalg::check_square, MatMut, MatRef};
use reborrow::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Upper,
    Lower,
}

fn triangular_matmul(
    op: &str,
    side: Side,
    mut dst: MatMut<'_>,
    lhs: MatRef<'_>,
    rhs: MatRef<'_>,
    alpha: f64,
    beta: f64,
) -> Result<(), SlapError> {
    check_matmul_shapes(op, dst.rb(), lhs, rhs)?;
    check_square(op, lhs.layout())?;

    let (n, p) = dst.shape();
    for j in 0..p {
        for i in 0..n {
            let ks = match side {
                Side::Upper => i..n,
                Side::Lower => 0..i + 1,
            };
            // SAFETY: the three views are valid and the indices are bounded by their shapes.
            unsafe {
                let mut acc = 0.0;
                for k in ks {
                    acc += lhs.read_unchecked(i, k) * rhs.read_unchecked(k, j);
                }
                let value = super::scale_acc(&dst, i, j, beta) + alpha * acc;
                dst.write_unchecked(i, j, value);
            }
        }
    }
    Ok(())
}

/// Computes `dst = beta * dst + alpha * lhs * rhs`, where `lhs` is upper triangular.
pub fn upper_triangular_matmul(
    dst: MatMut<'_>,
    lhs: MatRef<'_>,
    rhs: MatRef<'_>,
    alpha: f64,
    beta: f64,
) -> Result<(), SlapError> {
    triangular_matmul(
        "upper_triangular_matmul",
        Side::Upper,
        dst,
        lhs,
        rhs,
        alpha,
        beta,
    )
}

/// Computes `dst = beta * dst + alpha * lhs * rhs`, where `lhs` is lower triangular.
///
/// Passing the transpose of an upper triangular matrix is allowed, the triangle is determined
/// from the logical indices.
pub fn lower_triangular_matmul(
    dst: MatMut<'_>,
    lhs: MatRef<'_>,
    rhs: MatRef<'_>,
    alpha: f64,
    beta: f64,
) -> Result<(), SlapError> {
    triangular_matmul(
        "lower_triangular_matmul",
        Side::Lower,
        dst,
        lhs,
        rhs,
        alpha,
        beta,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        linalg::{matmul::matmul, triangular::make_upper_triangular},
        mat, Mat,
    };

    #[test]
    fn ignores_other_triangle() {
        let a = mat![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let b = mat![[1.0, 0.0], [1.0, 1.0], [2.0, -1.0]];

        let mut u = a.clone();
        make_upper_triangular(u.as_mut()).unwrap();

        let mut expected = Mat::from_fn(3, 2, |i, j| (i + j) as f64);
        let mut c = expected.clone();
        matmul(expected.as_mut(), u.as_ref(), b.as_ref(), 2.0, -1.0).unwrap();
        upper_triangular_matmul(c.as_mut(), a.as_ref(), b.as_ref(), 2.0, -1.0).unwrap();
        assert_eq!(c, expected);

        // the lower triangle of aᵀ is the upper triangle of a, transposed.
        let mut c = Mat::zeros(3, 2);
        lower_triangular_matmul(c.as_mut(), a.as_ref().transpose(), b.as_ref(), 1.0, 0.0).unwrap();
        let mut expected = Mat::zeros(3, 2);
        matmul(expected.as_mut(), u.as_ref().transpose(), b.as_ref(), 1.0, 0.0).unwrap();
        assert_eq!(c, expected);
    }

    #[test]
    fn lower() {
        let l = mat![[2.0, 9.0], [1.0, 3.0]];
        let x = mat![[1.0], [2.0]];
        let mut y = mat![[1.0], [1.0]];
        lower_triangular_matmul(y.as_mut(), l.as_ref(), x.as_ref(), 1.0, 1.0).unwrap();
        assert_eq!(y, mat![[3.0], [8.0]]);

        let rect = Mat::zeros(2, 3);
        let mut y = Mat::zeros(2, 1);
        assert_eq!(
            lower_triangular_matmul(y.as_mut(), rect.as_ref(), Mat::zeros(3, 1).as_ref(), 1.0, 0.0),
            Err(SlapError::NotSquare),
        );
    }
}
