use super::check_factors;
use crate::{
    error::{slap_error, SlapError},
    linalg::{
        householder::{
            apply_householder_on_the_right_in_place, apply_householder_on_the_right_in_place_req,
        },
        unary::set_identity,
    },
    mat::ShapeDisplay,
    MatMut, MatRef,
};
use dyn_stack::{PodStack, SizeOverflow, StackReq};
use reborrow::*;

/// Computes the size and alignment of the workspace required to reconstruct the `nrows × nrows`
/// orthogonal factor of a QR decomposition.
pub fn compute_q_req(nrows: usize) -> Result<StackReq, SizeOverflow> {
    apply_householder_on_the_right_in_place_req(nrows)
}

/// Computes the explicit orthogonal factor `Q` of the QR decomposition stored in `qr` and
/// `betas`, as produced by [`qr_in_place`](super::compute::qr_in_place), and stores it in `q`.
///
/// `Q = H₀ × H₁ × ... × Hₙ₋₁` is accumulated by multiplying an identity matrix on the right by
/// each reflection, in increasing column order.
///
/// # Errors
/// * [`SlapError::IncompatibleDimensions`] if `q` is not `m × m` where `m` is the number of rows
///   of `qr`, or if the factors have inconsistent shapes.
///
/// # Panics
/// Panics if the provided memory in `stack` is insufficient, see [`compute_q_req`].
#[track_caller]
pub fn compute_q(
    q: MatMut<'_>,
    qr: MatRef<'_>,
    betas: MatRef<'_>,
    stack: PodStack<'_>,
) -> Result<(), SlapError> {
    let mut q = q;
    let mut stack = stack;

    q.check()?;
    check_factors("compute_q", qr, betas)?;
    let (m, n) = qr.shape();
    if q.nrows() != m || q.ncols() != m {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "compute_q: expected a {m}x{m} output, got {}",
            ShapeDisplay(q.layout())
        );
    }

    set_identity(q.rb_mut(), 1.0)?;
    for k in 0..n {
        let essential = qr.submatrix(k + 1, k, m - k - 1, 1)?;
        apply_householder_on_the_right_in_place(
            essential,
            betas.read(k, 0),
            q.rb_mut().submatrix_mut(0, k, m, m - k)?,
            stack.rb_mut(),
        );
    }
    Ok(())
}
