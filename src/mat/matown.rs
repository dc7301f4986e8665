use super::*;
use crate::{assert, MatMut};
use alloc::{vec, vec::Vec};
use core::fmt;
use reborrow::*;

/// Heap allocated dense column-major matrix.
///
/// The storage can be released early with [`Mat::free`]. Views taken from a freed matrix keep
/// its shape but have no data, so every routine rejects them with
/// [`SlapError::BadDataPointer`].
#[derive(Clone)]
pub struct Mat {
    data: Option<Vec<f64>>,
    layout: MatLayout,
}

impl Mat {
    /// Returns a new matrix with dimensions `(nrows, ncols)`, filled with zeros.
    ///
    /// # Panics
    /// Panics if either extent is larger than [`MAX_DIM`].
    #[track_caller]
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        let layout = MatLayout::dense(nrows, ncols);
        Self {
            data: Some(vec![0.0; layout.num_elements()]),
            layout,
        }
    }

    /// Fallible version of [`Mat::zeros`], reporting [`SlapError::InvalidDimension`] for extents
    /// larger than [`MAX_DIM`].
    pub fn try_zeros(nrows: usize, ncols: usize) -> Result<Self, SlapError> {
        let layout = MatLayout::try_dense(nrows, ncols)?;
        Ok(Self {
            data: Some(vec![0.0; layout.num_elements()]),
            layout,
        })
    }

    /// Same as [`Mat::zeros`].
    #[track_caller]
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self::zeros(nrows, ncols)
    }

    /// Returns the `nrows × ncols` matrix with ones on the diagonal and zeros elsewhere.
    #[track_caller]
    pub fn identity(nrows: usize, ncols: usize) -> Self {
        Self::from_fn(nrows, ncols, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Returns a new matrix with dimensions `(nrows, ncols)`, filled with the provided function.
    #[track_caller]
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let layout = MatLayout::dense(nrows, ncols);
        let mut data = Vec::with_capacity(layout.num_elements());
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        Self {
            data: Some(data),
            layout,
        }
    }

    /// Builds a matrix from a list of rows, used by [`mat!`](crate::mat!).
    ///
    /// # Panics
    /// Panics if the rows do not all have the same length.
    #[track_caller]
    pub fn from_rows(rows: &[&[f64]]) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |row| row.len());
        assert!(rows.iter().all(|row| row.len() == ncols));
        Self::from_fn(nrows, ncols, |i, j| rows[i][j])
    }

    /// Takes ownership of a column-major buffer of exactly `nrows * ncols` elements.
    #[track_caller]
    pub fn from_column_major_vec(data: Vec<f64>, nrows: usize, ncols: usize) -> Self {
        let layout = MatLayout::dense(nrows, ncols);
        assert!(data.len() == layout.num_elements());
        Self {
            data: Some(data),
            layout,
        }
    }

    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.layout.nrows()
    }

    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.layout.ncols()
    }

    #[inline(always)]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// Whether [`Mat::free`] has been called.
    #[inline]
    pub fn is_freed(&self) -> bool {
        self.data.is_none()
    }

    /// Releases the storage of the matrix.
    ///
    /// Freeing an already freed matrix returns [`SlapError::BadDataPointer`] and leaves it
    /// unchanged.
    pub fn free(&mut self) -> Result<(), SlapError> {
        match self.data.take() {
            Some(_) => Ok(()),
            None => slap_error!(
                SlapError::BadDataPointer,
                "double free of a {} matrix",
                ShapeDisplay(self.layout)
            ),
        }
    }

    /// Returns the column-major storage, empty once freed.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        self.data.as_deref().unwrap_or(&[])
    }

    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [f64] {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }

    #[inline]
    pub fn as_ref(&self) -> MatRef<'_> {
        MatRef::from_layout(self.as_slice(), self.layout)
    }

    #[inline]
    pub fn as_mut(&mut self) -> MatMut<'_> {
        let layout = self.layout;
        MatMut::from_layout(self.as_slice_mut(), layout)
    }

    /// Reads the value of the element at the given indices, with bound checks.
    #[inline]
    #[track_caller]
    pub fn read(&self, row: usize, col: usize) -> f64 {
        self.as_ref().read(row, col)
    }

    /// Writes the value to the element at the given indices, with bound checks.
    #[inline]
    #[track_caller]
    pub fn write(&mut self, row: usize, col: usize, value: f64) {
        self.as_mut().write(row, col, value)
    }
}

impl PartialEq for Mat {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl PartialEq<MatRef<'_>> for Mat {
    fn eq(&self, other: &MatRef<'_>) -> bool {
        self.as_ref() == *other
    }
}

impl fmt::Debug for Mat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_ref(), f)
    }
}

impl<'short> Reborrow<'short> for Mat {
    type Target = MatRef<'short>;

    #[inline]
    fn rb(&'short self) -> Self::Target {
        self.as_ref()
    }
}

impl<'short> ReborrowMut<'short> for Mat {
    type Target = MatMut<'short>;

    #[inline]
    fn rb_mut(&'short mut self) -> Self::Target {
        self.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert, mat};

    #[test]
    fn double_free() {
        let mut a = Mat::zeros(10, 5);
        assert!(!a.is_freed());
        assert_eq!(a.free(), Ok(()));
        assert!(a.is_freed());
        assert_eq!(a.as_ref().check(), Err(SlapError::BadDataPointer));
        assert_eq!(a.free(), Err(SlapError::BadDataPointer));
    }

    #[test]
    fn freed_matrices_compare_unequal() {
        let mut a = Mat::zeros(2, 2);
        let b = a.clone();
        a.free().unwrap();
        assert!(a != b);
        assert!(b != a);
        assert!(a != a.clone());
        assert!(b.as_ref() != a.as_ref());
    }

    #[test]
    fn constructors() {
        let a = Mat::from_fn(2, 3, |i, j| (i + 10 * j) as f64);
        assert_eq!(a, mat![[0.0, 10.0, 20.0], [1.0, 11.0, 21.0]]);
        assert_eq!(a.as_slice(), [0.0, 1.0, 10.0, 11.0, 20.0, 21.0]);
        assert_eq!(Mat::identity(2, 3), mat![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(
            Mat::from_column_major_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2),
            mat![[1.0, 3.0], [2.0, 4.0]],
        );
        assert_eq!(Mat::try_zeros(1, 1 << 17), Err(SlapError::InvalidDimension));
        assert!(Mat::zeros(0, 3).as_ref().is_valid());
    }
}
