use super::{check_betas, QrParams};
use crate::{
    error::{slap_error, SlapError},
    linalg::householder::{
        apply_householder_on_the_left_in_place, apply_householder_on_the_left_in_place_req,
        make_householder_in_place,
    },
    mat::ShapeDisplay,
    MatMut,
};
use dyn_stack::{PodStack, SizeOverflow, StackReq};
use reborrow::*;

/// Computes the size and alignment of the workspace required to compute the QR decomposition
/// of a matrix with the given dimensions.
///
/// Only the number of columns matters, the row count is taken for symmetry with the other
/// workspace queries.
pub fn qr_in_place_req(_nrows: usize, ncols: usize) -> Result<StackReq, SizeOverflow> {
    apply_householder_on_the_left_in_place_req(ncols)
}

/// Computes the QR decomposition of a tall or square matrix `A`, using Householder
/// reflections.
///
/// On exit the upper triangle of `matrix` holds `R`, and the part below the diagonal holds the
/// essential parts of the Householder vectors, whose first component is one. The first `ncols`
/// entries of `betas` hold the scaling factors of the reflections, and its remaining entries are
/// set to zero. [`compute_q`](super::reconstruct::compute_q) and
/// [`apply_q_transpose`](super::solve::apply_q_transpose) use both to reconstruct `Q`.
///
/// A column whose part below the diagonal has a squared norm less than
/// [`QrParams::zero_tolerance`] is considered already reduced, and its reflection is the
/// identity.
///
/// # Errors
/// * [`SlapError::IncompatibleDimensions`] if `matrix` has more columns than rows, or if
///   `betas` is not a column vector with as many rows as `matrix`.
///
/// # Panics
/// Panics if the provided memory in `stack` is insufficient, see [`qr_in_place_req`].
#[track_caller]
pub fn qr_in_place(
    matrix: MatMut<'_>,
    betas: MatMut<'_>,
    params: QrParams,
    stack: PodStack<'_>,
) -> Result<(), SlapError> {
    let mut matrix = matrix;
    let mut betas = betas;
    let mut stack = stack;

    matrix.check()?;
    betas.check()?;
    let (m, n) = matrix.shape();
    if m < n {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "qr_in_place: expected a square or tall matrix, got {}",
            ShapeDisplay(matrix.layout())
        );
    }
    check_betas("qr_in_place", betas.rb(), m)?;

    #[cfg(feature = "perf-warn")]
    if (matrix.is_transposed() || matrix.row_stride() != 1) && crate::__perf_warn!(QR_WARN) {
        log::warn!(target: "slap_perf", "QR prefers column-major matrix. Found matrix with generic strides.");
    }

    // `betas` doubles as storage for the Householder vector of the current column, below
    // entry `k` which receives the scaling factor once the column is reduced.
    for k in 0..n {
        let mut tail_norm_squared = 0.0;
        for i in k + 1..m {
            let x = matrix.read(i, k);
            betas.write(i, 0, x);
            tail_norm_squared += x * x;
        }

        let (beta, head) = make_householder_in_place(
            betas.rb_mut().submatrix_mut(k + 1, 0, m - k - 1, 1)?,
            matrix.read(k, k),
            tail_norm_squared,
            params.zero_tolerance,
        );

        let essential = betas.rb().submatrix(k + 1, 0, m - k - 1, 1)?;
        apply_householder_on_the_left_in_place(
            essential,
            beta,
            matrix.rb_mut().submatrix_mut(k, k + 1, m - k, n - k - 1)?,
            stack.rb_mut(),
        );

        matrix.write(k, k, head);
        for i in k + 1..m {
            matrix.write(i, k, betas.read(i, 0));
        }
        betas.write(k, 0, beta);
    }
    for k in n..m {
        betas.write(k, 0, 0.0);
    }
    Ok(())
}
