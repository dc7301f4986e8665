//! The QR decomposition decomposes a matrix `A` into the product
//! `A = Q × R`,
//! where `Q` is an orthogonal matrix, represented as a sequence of Householder reflections, and
//! `R` is an upper trapezoidal matrix.
//!
//! # Example
//! ```
//! use slap::{
//!     dyn_stack::{GlobalPodBuffer, PodStack, StackReq},
//!     linalg::qr,
//!     mat, Mat,
//! };
//!
//! let a = mat![[3.0, 1.0], [4.0, 2.0], [0.0, 2.0]];
//! let (m, n) = a.shape();
//!
//! let mut mem = GlobalPodBuffer::new(
//!     StackReq::try_any_of([
//!         qr::compute::qr_in_place_req(m, n).unwrap(),
//!         qr::reconstruct::compute_q_req(m).unwrap(),
//!     ])
//!     .unwrap(),
//! );
//!
//! let mut factors = a.clone();
//! let mut betas = Mat::zeros(m, 1);
//! qr::compute::qr_in_place(
//!     factors.as_mut(),
//!     betas.as_mut(),
//!     Default::default(),
//!     PodStack::new(&mut mem),
//! )
//! .unwrap();
//!
//! let mut q = Mat::zeros(m, m);
//! qr::reconstruct::compute_q(q.as_mut(), factors.as_ref(), betas.as_ref(), PodStack::new(&mut mem))
//!     .unwrap();
//!
//! // |R[0, 0]| is the norm of the first column.
//! assert!((factors.read(0, 0).abs() - 5.0).abs() < 1e-12);
//! ```

use crate::{
    error::{slap_error, SlapError},
    linalg::check_vector,
    mat::ShapeDisplay,
    MatRef,
};

/// Computing the decomposition.
pub mod compute;
/// Reconstructing the orthogonal factor from the decomposition.
pub mod reconstruct;
/// Applying the orthogonal factor and solving least squares problems.
pub mod solve;

/// QR factorization tuning parameters.
#[derive(Copy, Clone, Debug)]
#[non_exhaustive]
pub struct QrParams {
    /// Squared norm below which the part of a column under the diagonal is considered zero, in
    /// which case no reflection is applied to it.
    pub zero_tolerance: f64,
}

impl Default for QrParams {
    #[inline]
    fn default() -> Self {
        Self {
            zero_tolerance: 1e-10,
        }
    }
}

pub(crate) fn check_betas(op: &str, betas: MatRef<'_>, nrows: usize) -> Result<(), SlapError> {
    check_vector(op, betas.layout())?;
    if betas.nrows() != nrows {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "{op}: expected {nrows} scaling factors, got {}",
            ShapeDisplay(betas.layout())
        );
    }
    Ok(())
}

pub(crate) fn check_factors(op: &str, qr: MatRef<'_>, betas: MatRef<'_>) -> Result<(), SlapError> {
    qr.check()?;
    betas.check()?;
    if qr.nrows() < qr.ncols() {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "{op}: expected a square or tall factorization, got {}",
            ShapeDisplay(qr.layout())
        );
    }
    check_betas(op, betas, qr.nrows())
}

#[cfg(test)]
mod tests {
    use super::{compute::*, reconstruct::*, solve::*, QrParams};
    use crate::{
        linalg::{
            matmul::matmul, reductions::normed_difference, triangular::is_upper_triangular,
            triangular::make_upper_triangular,
        },
        Mat, MatRef, SlapError,
    };
    use assert_approx_eq::assert_approx_eq;
    use dyn_stack::{GlobalPodBuffer, PodStack, StackReq};

    struct Factors {
        qr: Mat,
        betas: Mat,
    }

    fn factorize(a: MatRef<'_>) -> Factors {
        let (m, n) = a.shape();
        let mut qr = a.to_owned();
        let mut betas = Mat::zeros(m, 1);
        qr_in_place(
            qr.as_mut(),
            betas.as_mut(),
            QrParams::default(),
            PodStack::new(&mut GlobalPodBuffer::new(qr_in_place_req(m, n).unwrap())),
        )
        .unwrap();
        Factors { qr, betas }
    }

    fn q_of(f: &Factors) -> Mat {
        let m = f.qr.nrows();
        let mut q = Mat::zeros(m, m);
        compute_q(
            q.as_mut(),
            f.qr.as_ref(),
            f.betas.as_ref(),
            PodStack::new(&mut GlobalPodBuffer::new(compute_q_req(m).unwrap())),
        )
        .unwrap();
        q
    }

    fn r_of(f: &Factors) -> Mat {
        let mut r = f.qr.clone();
        make_upper_triangular(r.as_mut()).unwrap();
        r
    }

    fn assert_orthogonal(q: MatRef<'_>) {
        let m = q.nrows();
        let mut qtq = Mat::zeros(m, m);
        matmul(qtq.as_mut(), q.transpose(), q, 1.0, 0.0).unwrap();
        assert!(normed_difference(qtq.as_ref(), Mat::identity(m, m).as_ref()) < 1e-10);
    }

    fn check_factorization(a: MatRef<'_>) {
        let f = factorize(a);
        let q = q_of(&f);
        let r = r_of(&f);
        assert_orthogonal(q.as_ref());
        assert!(is_upper_triangular(r.as_ref()));

        // Q × R = A
        let (m, n) = a.shape();
        let mut qr = Mat::zeros(m, n);
        matmul(
            qr.as_mut(),
            q.as_ref(),
            r.as_ref(),
            1.0,
            0.0,
        )
        .unwrap();
        for j in 0..n {
            for i in 0..m {
                assert_approx_eq!(qr.read(i, j), a.read(i, j), 1e-10);
            }
        }
    }

    #[test]
    fn square() {
        let a = Mat::from_fn(5, 5, |i, j| (((i + 1) * (j + 2)) % 7) as f64 - 3.0);
        check_factorization(a.as_ref());
        check_factorization(a.as_ref().transpose());
    }

    #[test]
    fn tall() {
        let a = Mat::from_fn(5, 3, |i, j| if i == j { 2.0 } else { (i + j) as f64 * 0.5 });
        check_factorization(a.as_ref());

        let a = Mat::from_fn(20, 7, |_, _| rand::random::<f64>() - 0.5);
        check_factorization(a.as_ref());
    }

    #[test]
    fn already_triangular_column() {
        let a = crate::mat![[2.0, 1.0], [0.0, 3.0], [0.0, 4.0]];
        let f = factorize(a.as_ref());
        assert_eq!(f.betas.read(0, 0), 0.0);
        assert_eq!(f.qr.read(0, 0), 2.0);
        assert_approx_eq!(libm::fabs(f.qr.read(1, 1)), 5.0);
        assert_eq!(f.betas.read(2, 0), 0.0);
        check_factorization(a.as_ref());
    }

    #[test]
    fn q_transpose_application() {
        let a = Mat::from_fn(6, 4, |_, _| rand::random::<f64>());
        let b = Mat::from_fn(6, 2, |_, _| rand::random::<f64>());
        let f = factorize(a.as_ref());
        let q = q_of(&f);

        let mut expected = Mat::zeros(6, 2);
        matmul(expected.as_mut(), q.as_ref().transpose(), b.as_ref(), 1.0, 0.0).unwrap();

        let mut mem = GlobalPodBuffer::new(
            StackReq::try_any_of([apply_q_transpose_req(2).unwrap(), apply_q_req(2).unwrap()])
                .unwrap(),
        );
        let mut qtb = b.clone();
        apply_q_transpose(
            f.qr.as_ref(),
            f.betas.as_ref(),
            qtb.as_mut(),
            PodStack::new(&mut mem),
        )
        .unwrap();
        assert!(normed_difference(qtb.as_ref(), expected.as_ref()) < 1e-10);

        apply_q(f.qr.as_ref(), f.betas.as_ref(), qtb.as_mut(), PodStack::new(&mut mem)).unwrap();
        assert!(normed_difference(qtb.as_ref(), b.as_ref()) < 1e-10);
    }

    #[test]
    fn least_squares() {
        // fit y = 1 + 2t through exact samples.
        let a = Mat::from_fn(6, 2, |i, j| if j == 0 { 1.0 } else { i as f64 });
        let mut y = Mat::from_fn(6, 1, |i, _| 1.0 + 2.0 * i as f64);
        let f = factorize(a.as_ref());
        solve_lstsq_in_place(
            f.qr.as_ref(),
            f.betas.as_ref(),
            y.as_mut(),
            PodStack::new(&mut GlobalPodBuffer::new(solve_lstsq_in_place_req(1).unwrap())),
        )
        .unwrap();
        assert_approx_eq!(y.read(0, 0), 1.0, 1e-10);
        assert_approx_eq!(y.read(1, 0), 2.0, 1e-10);
        for i in 2..6 {
            assert_approx_eq!(y.read(i, 0), 0.0, 1e-10);
        }
    }

    #[test]
    fn shape_errors() {
        let mut mem = GlobalPodBuffer::new(qr_in_place_req(3, 3).unwrap());

        let mut wide = Mat::zeros(2, 3);
        let mut betas = Mat::zeros(2, 1);
        assert_eq!(
            qr_in_place(
                wide.as_mut(),
                betas.as_mut(),
                QrParams::default(),
                PodStack::new(&mut mem),
            ),
            Err(SlapError::IncompatibleDimensions),
        );

        let mut a = Mat::identity(3, 3);
        let mut short = Mat::zeros(2, 1);
        assert_eq!(
            qr_in_place(
                a.as_mut(),
                short.as_mut(),
                QrParams::default(),
                PodStack::new(&mut mem),
            ),
            Err(SlapError::IncompatibleDimensions),
        );

        let f = factorize(Mat::identity(3, 3).as_ref());
        let mut q = Mat::zeros(3, 2);
        assert_eq!(
            compute_q(
                q.as_mut(),
                f.qr.as_ref(),
                f.betas.as_ref(),
                PodStack::new(&mut mem),
            ),
            Err(SlapError::IncompatibleDimensions),
        );
    }
}
