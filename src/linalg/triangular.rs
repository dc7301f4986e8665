//! Triangular structure tests and projections.

use super::ensure_valid;
use crate::{error::SlapError, MatMut, MatRef};
use reborrow::*;

/// Whether every element strictly below the diagonal of `mat` is zero.
///
/// Returns `false` for an invalid view.
pub fn is_upper_triangular(mat: MatRef<'_>) -> bool {
    if ensure_valid("is_upper_triangular", mat).is_err() {
        return false;
    }
    mat.positions()
        .filter(|pos| pos.row > pos.col)
        .all(|pos| mat.read(pos.row, pos.col) == 0.0)
}

/// Whether every element strictly above the diagonal of `mat` is zero.
///
/// Returns `false` for an invalid view.
pub fn is_lower_triangular(mat: MatRef<'_>) -> bool {
    is_upper_triangular(mat.transpose())
}

/// Zeroes every element strictly below the diagonal of `mat`.
pub fn make_upper_triangular(mut mat: MatMut<'_>) -> Result<(), SlapError> {
    ensure_valid("make_upper_triangular", mat.rb())?;
    for pos in mat.positions() {
        if pos.row > pos.col {
            mat.write(pos.row, pos.col, 0.0);
        }
    }
    Ok(())
}

/// Zeroes every element strictly above the diagonal of `mat`.
pub fn make_lower_triangular(mat: MatMut<'_>) -> Result<(), SlapError> {
    ensure_valid("make_lower_triangular", mat.rb())?;
    make_upper_triangular(mat.transpose_mut())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mat, Mat};

    #[test]
    fn projections() {
        let mut a = Mat::from_fn(3, 4, |i, j| (1 + i + 3 * j) as f64);
        assert!(!is_upper_triangular(a.as_ref()));
        assert!(!is_lower_triangular(a.as_ref()));

        let mut u = a.clone();
        make_upper_triangular(u.as_mut()).unwrap();
        assert!(is_upper_triangular(u.as_ref()));
        assert!(is_lower_triangular(u.as_ref().transpose()));
        assert_eq!(
            u,
            mat![[1.0, 4.0, 7.0, 10.0], [0.0, 5.0, 8.0, 11.0], [0.0, 0.0, 9.0, 12.0]]
        );

        make_lower_triangular(a.as_mut()).unwrap();
        assert!(is_lower_triangular(a.as_ref()));
        assert_eq!(
            a,
            mat![[1.0, 0.0, 0.0, 0.0], [2.0, 5.0, 0.0, 0.0], [3.0, 6.0, 9.0, 0.0]]
        );
    }

    #[test]
    fn invalid_views() {
        let mut data = [1.0, 2.0];
        let bad = crate::mat::from_strided_slice_mut(&mut data, 2, 1, 0, 1);
        assert!(!is_upper_triangular(bad.rb()));
        assert_eq!(make_lower_triangular(bad), Err(SlapError::InvalidMatrix));
    }
}
