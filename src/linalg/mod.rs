//! Linear algebra routines.
//!
//! All the routines read and write their operands through the layout of the views they are
//! given, so any combination of strided, transposed or sub-matrix operands is accepted. Every
//! operand is checked with [`MatRef::check`] before any element is touched, then the shapes are
//! compared using the transposition-aware extents.
//!
//! # Memory allocation
//! Routines that need temporary space take a [`stack: PodStack`](dyn_stack::PodStack)
//! parameter, a thin wrapper over a slice of bytes that may come from any source (heap
//! allocation, fixed-size array on the stack, etc.). Each of them has a corresponding function
//! ending in `_req` that returns the memory requirements of the algorithm, for example
//! [`qr::compute::qr_in_place`] and [`qr::compute::qr_in_place_req`]. The simplest way to obtain
//! the memory is through [`dyn_stack::GlobalPodBuffer::new`].
//!
//! # Aliasing
//! Binary routines writing into one of their inputs come in explicit in-place flavours, such as
//! [`add::add_in_place`], since a [`MatMut`] cannot alias a [`MatRef`].

use crate::{
    error::{slap_error, SlapError},
    mat::{self, MatLayout, MatMut, MatRef, ShapeDisplay},
};
use dyn_stack::{PodStack, SizeOverflow, StackReq};

pub mod add;
pub mod cholesky;
pub mod copy;
pub mod householder;
pub mod matmul;
pub mod products;
pub mod qr;
pub mod reductions;
pub mod triangular;
pub mod triangular_solve;
pub mod unary;

/// Returns the stack requirements for creating a temporary `nrows × ncols` matrix.
#[inline]
pub fn temp_mat_req(nrows: usize, ncols: usize) -> Result<StackReq, SizeOverflow> {
    let len = nrows.checked_mul(ncols).ok_or(SizeOverflow)?;
    StackReq::try_new::<f64>(len)
}

/// Creates a temporary dense matrix of zero values, from the given memory stack.
///
/// # Panics
/// Panics if the stack is too small, see [`temp_mat_req`].
#[track_caller]
pub fn temp_mat_zeroed(
    nrows: usize,
    ncols: usize,
    stack: PodStack<'_>,
) -> (MatMut<'_>, PodStack<'_>) {
    let (data, stack) =
        stack.make_aligned_raw::<f64>(nrows * ncols, core::mem::align_of::<f64>());
    data.fill(0.0);
    (mat::from_column_major_slice_mut(data, nrows, ncols), stack)
}

/// Checks that `mat` is valid, reporting [`SlapError::InvalidMatrix`] with the precise reason
/// in the diagnostic otherwise.
#[inline]
pub(crate) fn ensure_valid(op: &str, mat: MatRef<'_>) -> Result<(), SlapError> {
    match mat.check() {
        Ok(()) => Ok(()),
        Err(reason) => slap_error!(SlapError::InvalidMatrix, "{op}: {reason}"),
    }
}

/// Checks that two operands have the same logical shape.
#[inline]
pub(crate) fn check_same_shape(op: &str, lhs: MatLayout, rhs: MatLayout) -> Result<(), SlapError> {
    if lhs.nrows() != rhs.nrows() || lhs.ncols() != rhs.ncols() {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "{op}: got {} and {}",
            ShapeDisplay(lhs),
            ShapeDisplay(rhs)
        );
    }
    Ok(())
}

/// Checks that `mat` is square.
#[inline]
pub(crate) fn check_square(op: &str, mat: MatLayout) -> Result<(), SlapError> {
    if !mat.is_square() {
        return slap_error!(
            SlapError::NotSquare,
            "{op}: got a {} matrix",
            ShapeDisplay(mat)
        );
    }
    Ok(())
}

/// Checks that `mat` is a column vector.
#[inline]
pub(crate) fn check_vector(op: &str, mat: MatLayout) -> Result<(), SlapError> {
    if mat.ncols() != 1 {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "{op}: expected a column vector, got a {} matrix",
            ShapeDisplay(mat)
        );
    }
    Ok(())
}
