use crate::{
    error::SlapError,
    linalg::triangular_solve::{self, solve_triangular_in_place_impl},
    MatMut, MatRef,
};
use reborrow::*;

/// Given the Cholesky factor of a matrix `A`, solves `A × X = rhs` and stores the result in
/// `rhs`.
///
/// `cholesky_factor` is the output of
/// [`cholesky_in_place`](super::compute::cholesky_in_place), only the lower triangle of the
/// logical matrix is read. This holds for a factor computed through a transposed view as well,
/// in which case `L` lives in the upper triangle of the storage.
/// The system is solved with a forward substitution on `L` followed by a backward substitution
/// on `Lᵀ`.
///
/// # Errors
/// Same as [`triangular_solve::solve_lower_triangular_in_place`].
pub fn solve_in_place(cholesky_factor: MatRef<'_>, rhs: MatMut<'_>) -> Result<(), SlapError> {
    let mut rhs = rhs;
    solve_triangular_in_place_impl(
        "cholesky::solve_in_place",
        cholesky_factor,
        rhs.rb_mut(),
        false,
    )?;
    triangular_solve::solve_upper_triangular_in_place(cholesky_factor.transpose(), rhs.rb_mut())
}
