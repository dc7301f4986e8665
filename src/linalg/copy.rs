//! Copies between views.

use super::check_same_shape;
use crate::{
    error::{slap_error, SlapError},
    mat::ShapeDisplay,
    MatMut, MatRef,
};

/// Copies `src` into `dst`. Both must have the same logical shape.
///
/// `dst` is left untouched on error.
pub fn copy_from(mut dst: MatMut<'_>, src: MatRef<'_>) -> Result<(), SlapError> {
    dst.check()?;
    src.check()?;
    check_same_shape("copy", dst.layout(), src.layout())?;

    for pos in dst.positions() {
        // SAFETY: `pos` is in bounds of `dst`, which has the same shape as `src`, and both views
        // passed `check`.
        unsafe { dst.write_unchecked(pos.row, pos.col, src.read_unchecked(pos.row, pos.col)) };
    }
    Ok(())
}

/// Copies the transpose of `src` into `dst`.
pub fn copy_transpose_from(dst: MatMut<'_>, src: MatRef<'_>) -> Result<(), SlapError> {
    copy_from(dst, src.transpose())
}

/// Copies the first `num_elements` values of `data` into `dst`, in column-major order.
///
/// Fails with [`SlapError::BadPointer`] if `data` is too short, in which case `dst` is left
/// untouched.
pub fn copy_from_column_major_slice(mut dst: MatMut<'_>, data: &[f64]) -> Result<(), SlapError> {
    dst.check()?;
    if data.len() < dst.num_elements() {
        return slap_error!(
            SlapError::BadPointer,
            "cannot fill a {} matrix from {} values",
            ShapeDisplay(dst.layout()),
            data.len()
        );
    }
    let mut values = data.iter();
    dst.for_each(|x| {
        if let Some(&value) = values.next() {
            *x = value;
        }
    });
    Ok(())
}

/// Swaps the contents of two matrices of the same logical shape.
pub fn swap(mut lhs: MatMut<'_>, mut rhs: MatMut<'_>) -> Result<(), SlapError> {
    lhs.check()?;
    rhs.check()?;
    check_same_shape("swap", lhs.layout(), rhs.layout())?;
    for pos in lhs.positions() {
        let (i, j) = (pos.row, pos.col);
        let tmp = lhs.read(i, j);
        lhs.write(i, j, rhs.read(i, j));
        rhs.write(i, j, tmp);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mat, Mat};

    #[test]
    fn copy_and_transpose() {
        let a = mat![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let mut b = Mat::zeros(2, 3);
        copy_from(b.as_mut(), a.as_ref()).unwrap();
        assert_eq!(a, b);

        let mut c = Mat::zeros(3, 2);
        copy_transpose_from(c.as_mut(), a.as_ref()).unwrap();
        assert_eq!(c, mat![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]);

        assert_eq!(copy_from(c.as_mut(), a.as_ref()), Err(SlapError::IncompatibleDimensions));
        assert_eq!(c, mat![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]);
    }

    #[test]
    fn copy_into_submatrix() {
        let mut a = Mat::zeros(3, 3);
        let b = mat![[1.0, 2.0], [3.0, 4.0]];
        copy_from(a.as_mut().submatrix_mut(1, 0, 2, 2).unwrap(), b.as_ref()).unwrap();
        assert_eq!(a, mat![[0.0, 0.0, 0.0], [1.0, 2.0, 0.0], [3.0, 4.0, 0.0]]);
    }

    #[test]
    fn fill_from_slice() {
        let mut a = Mat::zeros(2, 2);
        copy_from_column_major_slice(a.as_mut().transpose_mut(), &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(a, mat![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(
            copy_from_column_major_slice(a.as_mut(), &[1.0, 2.0, 3.0]),
            Err(SlapError::BadPointer),
        );
        assert_eq!(a, mat![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn swapping() {
        let mut a = mat![[1.0, 2.0], [3.0, 4.0]];
        let mut b = mat![[5.0, 6.0], [7.0, 8.0]];
        swap(a.as_mut(), b.as_mut().transpose_mut()).unwrap();
        assert_eq!(a, mat![[5.0, 7.0], [6.0, 8.0]]);
        assert_eq!(b, mat![[1.0, 3.0], [2.0, 4.0]]);
    }
}
