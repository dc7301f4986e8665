//! Householder reflections.
//!
//! A Householder reflection is a linear transformation that describes a reflection about a
//! hyperplane that crosses the origin of the space. In matrix form it is written as
//! `H = I - β v vᵀ`, where `v` is a vector orthogonal to the hyperplane and `β = 2 / (vᵀv)`.
//!
//! The vectors used here are normalized so that their first component is one, which allows
//! storing only the remaining components, called the essential part, for example below the
//! diagonal of a matrix being triangularized. The scaling factor is adjusted accordingly.

use crate::{
    assert,
    linalg::{temp_mat_req, temp_mat_zeroed},
    MatMut, MatRef,
};
use dyn_stack::{PodStack, SizeOverflow, StackReq};

/// Computes the Householder reflection `I - β v vᵀ` that maps `x` to a multiple of the first
/// basis vector, and returns `(β, y₀)` where `y₀` is the first component of the reflected
/// vector.
///
/// `x` is given by its first component `head`, and by the squared norm of its remaining
/// components `tail_norm_squared`. The remaining components are read from `essential`, and
/// replaced by the essential part of `v`, whose first component is implicitly one.
///
/// If `tail_norm_squared` is below `zero_tolerance`, `x` is already a multiple of the first basis
/// vector: the returned `β` is zero, `essential` is left untouched and the reflection is the
/// identity.
///
/// The sign of the reflection is chosen to avoid cancellation when computing `v₀`.
#[inline]
pub fn make_householder_in_place(
    essential: MatMut<'_>,
    head: f64,
    tail_norm_squared: f64,
    zero_tolerance: f64,
) -> (f64, f64) {
    if libm::fabs(tail_norm_squared) < zero_tolerance {
        return (0.0, head);
    }

    let norm = libm::sqrt(tail_norm_squared + head * head);
    let v0 = if head > 0.0 { head + norm } else { head - norm };

    let mut essential = essential;
    let inv = 1.0 / v0;
    essential.for_each(|x| *x *= inv);

    // β = 2 / (vᵀv), rescaled for the normalized vector v / v₀.
    let beta = 2.0 * v0 * v0 / (v0 * v0 + tail_norm_squared);
    (beta, head - v0)
}

/// Returns the stack requirements for [`apply_householder_on_the_left_in_place`].
pub fn apply_householder_on_the_left_in_place_req(ncols: usize) -> Result<StackReq, SizeOverflow> {
    temp_mat_req(ncols, 1)
}

/// Computes `matrix = (I - beta v vᵀ) × matrix`, where `v = [1; essential]`.
///
/// The product is formed in two passes, first `t = vᵀ matrix` into a temporary row, then the
/// rank-one update `matrix -= beta v t`.
///
/// # Panics
/// Panics if `essential` is not a column vector with `matrix.nrows() - 1` rows, or if the stack
/// is too small.
#[track_caller]
pub fn apply_householder_on_the_left_in_place(
    essential: MatRef<'_>,
    beta: f64,
    matrix: MatMut<'_>,
    stack: PodStack<'_>,
) {
    let mut matrix = matrix;
    let (m, n) = matrix.shape();
    assert!(all(essential.ncols() == 1, essential.nrows() + 1 == m));
    if beta == 0.0 || m == 0 {
        return;
    }

    let (mut t, _) = temp_mat_zeroed(n, 1, stack);
    for j in 0..n {
        let mut acc = matrix.read(0, j);
        for i in 1..m {
            acc += essential.read(i - 1, 0) * matrix.read(i, j);
        }
        t.write(j, 0, acc);
    }
    for j in 0..n {
        let tj = beta * t.read(j, 0);
        *matrix.get_mut(0, j) -= tj;
        for i in 1..m {
            *matrix.get_mut(i, j) -= essential.read(i - 1, 0) * tj;
        }
    }
}

/// Returns the stack requirements for [`apply_householder_on_the_right_in_place`].
pub fn apply_householder_on_the_right_in_place_req(
    nrows: usize,
) -> Result<StackReq, SizeOverflow> {
    temp_mat_req(nrows, 1)
}

/// Computes `matrix = matrix × (I - beta v vᵀ)`, where `v = [1; essential]`.
///
/// # Panics
/// Panics if `essential` is not a column vector with `matrix.ncols() - 1` rows, or if the stack
/// is too small.
#[track_caller]
pub fn apply_householder_on_the_right_in_place(
    essential: MatRef<'_>,
    beta: f64,
    matrix: MatMut<'_>,
    stack: PodStack<'_>,
) {
    apply_householder_on_the_left_in_place(essential, beta, matrix.transpose_mut(), stack);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert, linalg::reductions::norm_l2, mat, Mat};
    use assert_approx_eq::assert_approx_eq;
    use dyn_stack::GlobalPodBuffer;

    #[test]
    fn reflection_zeroes_the_tail() {
        let x = mat![[3.0], [1.0], [-2.0], [4.0]];
        let mut essential = x.as_ref().submatrix(1, 0, 3, 1).unwrap().to_owned();
        let tail_norm_squared = 1.0 + 4.0 + 16.0;

        let (beta, head) =
            make_householder_in_place(essential.as_mut(), 3.0, tail_norm_squared, 1e-10);
        assert_approx_eq!(libm::fabs(head), norm_l2(x.as_ref()));
        assert!(head < 0.0);

        let mut y = x.clone();
        let mut mem = GlobalPodBuffer::new(apply_householder_on_the_left_in_place_req(1).unwrap());
        apply_householder_on_the_left_in_place(
            essential.as_ref(),
            beta,
            y.as_mut(),
            PodStack::new(&mut mem),
        );
        assert_approx_eq!(y.read(0, 0), head);
        for i in 1..4 {
            assert_approx_eq!(y.read(i, 0), 0.0);
        }
    }

    #[test]
    fn negative_and_zero_heads() {
        let mut essential = mat![[0.0], [0.0]];
        let (beta, head) = make_householder_in_place(essential.as_mut(), -2.0, 0.0, 1e-10);
        assert_eq!((beta, head), (0.0, -2.0));

        let mut essential = mat![[1.0], [1.0]];
        let (beta, head) = make_householder_in_place(essential.as_mut(), 0.0, 2.0, 1e-10);
        assert_approx_eq!(head, libm::sqrt(2.0));
        assert!(beta > 0.0);
    }

    #[test]
    fn left_and_right_applications_agree() {
        let mut essential = mat![[0.5], [-1.0]];
        let (beta, _) = make_householder_in_place(essential.as_mut(), 1.0, 1.25, 1e-10);

        let a = Mat::from_fn(3, 3, |i, j| (i * 3 + j) as f64 - 4.0);
        let mut mem = GlobalPodBuffer::new(apply_householder_on_the_left_in_place_req(3).unwrap());

        let mut left = a.clone();
        apply_householder_on_the_left_in_place(
            essential.as_ref(),
            beta,
            left.as_mut(),
            PodStack::new(&mut mem),
        );
        // (H A)ᵀ = Aᵀ H, since H is symmetric.
        let mut right = a.clone();
        apply_householder_on_the_right_in_place(
            essential.as_ref(),
            beta,
            right.as_mut().transpose_mut(),
            PodStack::new(&mut mem),
        );
        for j in 0..3 {
            for i in 0..3 {
                assert_approx_eq!(left.read(i, j), right.read(i, j));
            }
        }
    }
}
