use super::check_factors;
use crate::{
    error::{slap_error, SlapError},
    linalg::{
        householder::{
            apply_householder_on_the_left_in_place, apply_householder_on_the_left_in_place_req,
        },
        triangular_solve::solve_upper_triangular_in_place,
    },
    mat::ShapeDisplay,
    MatMut, MatRef,
};
use dyn_stack::{PodStack, SizeOverflow, StackReq};
use reborrow::*;

fn check_rhs(op: &str, qr: MatRef<'_>, rhs: MatRef<'_>) -> Result<(), SlapError> {
    rhs.check()?;
    if rhs.nrows() != qr.nrows() {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "{op}: factors = {}, rhs = {}",
            ShapeDisplay(qr.layout()),
            ShapeDisplay(rhs.layout())
        );
    }
    Ok(())
}

/// Computes the size and alignment of the workspace required to apply the orthogonal factor of
/// a QR decomposition to a right-hand side with `rhs_ncols` columns.
pub fn apply_q_req(rhs_ncols: usize) -> Result<StackReq, SizeOverflow> {
    apply_householder_on_the_left_in_place_req(rhs_ncols)
}

/// Computes the size and alignment of the workspace required by [`apply_q_transpose`].
pub fn apply_q_transpose_req(rhs_ncols: usize) -> Result<StackReq, SizeOverflow> {
    apply_householder_on_the_left_in_place_req(rhs_ncols)
}

/// Computes the size and alignment of the workspace required by [`solve_lstsq_in_place`].
pub fn solve_lstsq_in_place_req(rhs_ncols: usize) -> Result<StackReq, SizeOverflow> {
    apply_q_transpose_req(rhs_ncols)
}

/// Computes `Qᵀ × rhs` and stores the result in `rhs`, where `Q` is the orthogonal factor of the
/// QR decomposition stored in `qr` and `betas`.
///
/// The reflections are applied in increasing column order, without forming `Q`.
///
/// # Errors
/// * [`SlapError::IncompatibleDimensions`] if `rhs` does not have as many rows as `qr`, or if
///   the factors have inconsistent shapes.
///
/// # Panics
/// Panics if the provided memory in `stack` is insufficient, see [`apply_q_transpose_req`].
#[track_caller]
pub fn apply_q_transpose(
    qr: MatRef<'_>,
    betas: MatRef<'_>,
    rhs: MatMut<'_>,
    stack: PodStack<'_>,
) -> Result<(), SlapError> {
    let mut rhs = rhs;
    let mut stack = stack;
    check_factors("apply_q_transpose", qr, betas)?;
    check_rhs("apply_q_transpose", qr, rhs.rb())?;

    let (m, n) = qr.shape();
    let p = rhs.ncols();
    for k in 0..n {
        apply_householder_on_the_left_in_place(
            qr.submatrix(k + 1, k, m - k - 1, 1)?,
            betas.read(k, 0),
            rhs.rb_mut().submatrix_mut(k, 0, m - k, p)?,
            stack.rb_mut(),
        );
    }
    Ok(())
}

/// Computes `Q × rhs` and stores the result in `rhs`, the reflections being applied in
/// decreasing column order.
///
/// # Errors
/// Same as [`apply_q_transpose`].
///
/// # Panics
/// Panics if the provided memory in `stack` is insufficient, see [`apply_q_req`].
#[track_caller]
pub fn apply_q(
    qr: MatRef<'_>,
    betas: MatRef<'_>,
    rhs: MatMut<'_>,
    stack: PodStack<'_>,
) -> Result<(), SlapError> {
    let mut rhs = rhs;
    let mut stack = stack;
    check_factors("apply_q", qr, betas)?;
    check_rhs("apply_q", qr, rhs.rb())?;

    let (m, n) = qr.shape();
    let p = rhs.ncols();
    for k in (0..n).rev() {
        apply_householder_on_the_left_in_place(
            qr.submatrix(k + 1, k, m - k - 1, 1)?,
            betas.read(k, 0),
            rhs.rb_mut().submatrix_mut(k, 0, m - k, p)?,
            stack.rb_mut(),
        );
    }
    Ok(())
}

/// Solves the least squares problem `min ‖A × X - rhs‖` given the QR decomposition of `A`, and
/// stores the solution in the first `ncols` rows of `rhs`.
///
/// The remaining rows of `rhs` hold the residual components orthogonal to the range of `A`,
/// whose norm is the norm of the residual.
///
/// # Errors
/// Same as [`apply_q_transpose`].
///
/// # Panics
/// Panics if the provided memory in `stack` is insufficient, see [`solve_lstsq_in_place_req`].
#[track_caller]
pub fn solve_lstsq_in_place(
    qr: MatRef<'_>,
    betas: MatRef<'_>,
    rhs: MatMut<'_>,
    stack: PodStack<'_>,
) -> Result<(), SlapError> {
    let mut rhs = rhs;
    apply_q_transpose(qr, betas, rhs.rb_mut(), stack)?;

    let n = qr.ncols();
    let p = rhs.ncols();
    solve_upper_triangular_in_place(qr.submatrix(0, 0, n, n)?, rhs.submatrix_mut(0, 0, n, p)?)
}
