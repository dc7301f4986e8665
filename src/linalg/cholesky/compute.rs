use crate::{
    error::{slap_error, SlapError},
    linalg::check_square,
    MatMut,
};

/// Computes the Cholesky factor `L` of the symmetric positive definite matrix `matrix`, such that
/// `L × Lᵀ = matrix`, and stores it in the lower triangle of `matrix`.
///
/// Only the lower triangle of `matrix` is read, and the strictly upper triangle is left
/// untouched.
///
/// # Errors
/// * [`SlapError::NotSquare`] if the matrix is not square, in which case it is not modified.
/// * [`SlapError::CholeskyFailed`] if a non-positive pivot is encountered. The columns before the
///   failing one have already been overwritten with their part of the factor.
///
/// # Example
/// ```
/// use slap::{linalg::cholesky::compute::cholesky_in_place, mat};
///
/// let mut a = mat![[4.0, 2.0], [2.0, 5.0]];
/// cholesky_in_place(a.as_mut()).unwrap();
/// assert_eq!(a, mat![[2.0, 2.0], [1.0, 2.0]]);
/// ```
pub fn cholesky_in_place(matrix: MatMut<'_>) -> Result<(), SlapError> {
    let mut matrix = matrix;
    matrix.check()?;
    check_square("cholesky_in_place", matrix.layout())?;

    #[cfg(feature = "perf-warn")]
    if (matrix.is_transposed() || matrix.row_stride() != 1) && crate::__perf_warn!(CHOLESKY_WARN)
    {
        log::warn!(target: "slap_perf", "Cholesky decomposition prefers column-major matrix. Found matrix with generic strides.");
    }

    let n = matrix.nrows();
    for j in 0..n {
        // SAFETY: the matrix is valid and square, every index is below `n`.
        unsafe {
            // A[j.., j] -= L[j.., ..j] × L[j, ..j]ᵀ
            for k in 0..j {
                let ljk = matrix.read_unchecked(j, k);
                for i in j..n {
                    let value = matrix.read_unchecked(i, j) - matrix.read_unchecked(i, k) * ljk;
                    matrix.write_unchecked(i, j, value);
                }
            }

            let pivot = matrix.read_unchecked(j, j);
            if pivot <= 0.0 || pivot.is_nan() {
                return slap_error!(
                    SlapError::CholeskyFailed,
                    "non positive pivot {pivot} in column {j}, the leading minor of size {} is not positive definite",
                    j + 1
                );
            }
            let ljj = libm::sqrt(pivot);
            for i in j..n {
                let value = matrix.read_unchecked(i, j) / ljj;
                matrix.write_unchecked(i, j, value);
            }
        }
    }
    Ok(())
}
