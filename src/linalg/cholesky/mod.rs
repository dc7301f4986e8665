//! The Cholesky decomposition of a symmetric positive definite matrix `A` is such that:
//! `A = L × Lᵀ`,
//! where `L` is a lower triangular matrix with a positive diagonal.

/// Computing the decomposition.
pub mod compute;
/// Reconstructing the original matrix from the decomposition.
pub mod reconstruct;
/// Solving a linear system using the decomposition.
pub mod solve;

#[cfg(test)]
mod tests {
    use super::{compute::*, reconstruct::*, solve::*};
    use crate::{
        linalg::{
            matmul::matmul, reductions::normed_difference, triangular::is_lower_triangular,
            triangular::make_lower_triangular, unary::add_identity,
        },
        Mat, MatRef, SlapError,
    };
    use assert_approx_eq::assert_approx_eq;

    fn random_spd(n: usize) -> Mat {
        let a = Mat::from_fn(n, n, |_, _| rand::random::<f64>());
        let mut spd = Mat::zeros(n, n);
        matmul(spd.as_mut(), a.as_ref(), a.as_ref().transpose(), 1.0, 0.0).unwrap();
        add_identity(spd.as_mut(), n as f64).unwrap();
        spd
    }

    fn reconstruct_matrix(cholesky_factor: MatRef<'_>) -> Mat {
        let n = cholesky_factor.nrows();
        let mut a = Mat::zeros(n, n);
        reconstruct(a.as_mut(), cholesky_factor).unwrap();
        a
    }

    // a1[i] = (i - 4)(i + 3) / 6 in column-major order.
    fn a1() -> Mat {
        Mat::from_fn(10, 10, |i, j| {
            let k = (i + 10 * j) as f64;
            (k - 4.0) * (k + 3.0) / 6.0
        })
    }

    #[test]
    fn factorize_small() {
        let a1 = a1();
        let mut a = Mat::identity(10, 10);
        matmul(a.as_mut(), a1.as_ref().transpose(), a1.as_ref(), 1e-4, 1.0).unwrap();

        let mut l = a.clone();
        cholesky_in_place(l.as_mut()).unwrap();
        make_lower_triangular(l.as_mut()).unwrap();
        assert!(is_lower_triangular(l.as_ref()));
        assert!(normed_difference(reconstruct_matrix(l.as_ref()).as_ref(), a.as_ref()) < 1e-8);

        let mut b = Mat::from_fn(10, 1, |i, _| i as f64 - 4.5);
        let rhs = b.clone();
        solve_in_place(l.as_ref(), b.as_mut()).unwrap();
        let mut ab = Mat::zeros(10, 1);
        matmul(ab.as_mut(), a.as_ref(), b.as_ref(), 1.0, 0.0).unwrap();
        assert!(normed_difference(ab.as_ref(), rhs.as_ref()) < 1e-6);
    }

    #[test]
    fn not_positive_definite() {
        let a1 = a1();
        let mut a = Mat::identity(10, 10);
        matmul(a.as_mut(), a1.as_ref().transpose(), a1.as_ref(), 1.0, -1.0).unwrap();
        assert_eq!(cholesky_in_place(a.as_mut()), Err(SlapError::CholeskyFailed));

        let mut a = mat_2x2(1.0, 2.0, 1.0);
        assert_eq!(cholesky_in_place(a.as_mut()), Err(SlapError::CholeskyFailed));
        // the first column is factorized before the second pivot is found negative.
        assert_eq!(a.read(0, 0), 1.0);
        assert_eq!(a.read(1, 0), 2.0);
        assert_eq!(a.read(1, 1), -3.0);

        let mut rect = Mat::zeros(2, 3);
        assert_eq!(cholesky_in_place(rect.as_mut()), Err(SlapError::NotSquare));
    }

    fn mat_2x2(a00: f64, a10: f64, a11: f64) -> Mat {
        crate::mat![[a00, 99.0], [a10, a11]]
    }

    #[test]
    fn upper_triangle_is_untouched() {
        let mut a = mat_2x2(4.0, 2.0, 5.0);
        cholesky_in_place(a.as_mut()).unwrap();
        assert_eq!(a.read(0, 1), 99.0);
        assert_eq!(a.read(1, 1), 2.0);
    }

    #[test]
    fn random_factorization() {
        for n in [1, 2, 5, 16, 33] {
            let a = random_spd(n);
            let mut l = a.clone();
            cholesky_in_place(l.as_mut()).unwrap();
            let a_reconstructed = reconstruct_matrix(l.as_ref());
            for j in 0..n {
                for i in 0..n {
                    assert_approx_eq!(a_reconstructed.read(i, j), a.read(i, j), 1e-9);
                }
            }

            let x = Mat::from_fn(n, 3, |_, _| rand::random());
            let mut b = Mat::zeros(n, 3);
            matmul(b.as_mut(), a.as_ref(), x.as_ref(), 1.0, 0.0).unwrap();
            solve_in_place(l.as_ref(), b.as_mut()).unwrap();
            for j in 0..3 {
                for i in 0..n {
                    assert_approx_eq!(b.read(i, j), x.read(i, j), 1e-9);
                }
            }
        }
    }

    #[test]
    fn transposed_storage() {
        // factorizing the transposed view writes L into the upper triangle of the storage.
        let a = random_spd(6);
        let mut l = a.clone();
        cholesky_in_place(l.as_mut().transpose_mut()).unwrap();
        let a_reconstructed = reconstruct_matrix(l.as_ref().transpose());
        assert!(normed_difference(a_reconstructed.as_ref(), a.as_ref()) < 1e-9);

        // the solve only reads the factor, wherever the storage puts it.
        let x = Mat::from_fn(6, 2, |_, _| rand::random());
        let mut rhs = Mat::zeros(6, 2);
        matmul(rhs.as_mut(), a.as_ref(), x.as_ref(), 1.0, 0.0).unwrap();
        solve_in_place(l.as_ref().transpose(), rhs.as_mut()).unwrap();
        assert!(normed_difference(rhs.as_ref(), x.as_ref()) < 1e-9);

        let mut a = crate::mat![[4.0, 2.0, 0.4], [2.0, 5.0, 1.0], [0.4, 1.0, 3.0]];
        let original = a.clone();
        cholesky_in_place(a.as_mut().transpose_mut()).unwrap();
        let mut x = crate::mat![[1.0], [2.0], [3.0]];
        solve_in_place(a.as_ref().transpose(), x.as_mut()).unwrap();
        let mut b = Mat::zeros(3, 1);
        matmul(b.as_mut(), original.as_ref(), x.as_ref(), 1.0, 0.0).unwrap();
        for (i, expected) in [1.0, 2.0, 3.0].into_iter().enumerate() {
            assert_approx_eq!(b.read(i, 0), expected, 1e-12);
        }
    }
}
