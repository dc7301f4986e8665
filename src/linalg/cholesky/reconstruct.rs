use crate::{
    error::SlapError,
    linalg::{check_same_shape, check_square},
    MatMut, MatRef,
};

/// Computes `L × Lᵀ` from the Cholesky factor `L` and stores the full symmetric result in `dst`.
///
/// Only the lower triangle of `cholesky_factor` is read.
pub fn reconstruct(mut dst: MatMut<'_>, cholesky_factor: MatRef<'_>) -> Result<(), SlapError> {
    dst.check()?;
    cholesky_factor.check()?;
    check_square("reconstruct", cholesky_factor.layout())?;
    check_same_shape("reconstruct", dst.layout(), cholesky_factor.layout())?;

    let n = dst.nrows();
    for j in 0..n {
        for i in j..n {
            let mut acc = 0.0;
            for k in 0..=j {
                acc += cholesky_factor.read(i, k) * cholesky_factor.read(j, k);
            }
            dst.write(i, j, acc);
            dst.write(j, i, acc);
        }
    }
    Ok(())
}
