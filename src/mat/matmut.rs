use super::*;
use crate::{assert, debug_assert, iter::Cursor, Mat};
use core::fmt;
use reborrow::*;

/// Mutable view over a matrix, similar to a mutable reference to a 2D strided [prim@slice].
///
/// # Note
///
/// Unlike [`MatRef`], `MatMut` is not `Copy`. Passing it to a function consumes it, use
/// [`MatMut::rb_mut`] to reborrow the view for a shorter lifetime instead.
pub struct MatMut<'a> {
    data: &'a mut [f64],
    layout: MatLayout,
}

impl<'short> Reborrow<'short> for MatMut<'_> {
    type Target = MatRef<'short>;

    #[inline]
    fn rb(&'short self) -> Self::Target {
        MatRef::from_layout(&*self.data, self.layout)
    }
}

impl<'short> ReborrowMut<'short> for MatMut<'_> {
    type Target = MatMut<'short>;

    #[inline]
    fn rb_mut(&'short mut self) -> Self::Target {
        MatMut {
            data: &mut *self.data,
            layout: self.layout,
        }
    }
}

impl<'a> IntoConst for MatMut<'a> {
    type Target = MatRef<'a>;

    #[inline]
    fn into_const(self) -> Self::Target {
        MatRef::from_layout(self.data, self.layout)
    }
}

impl<'a> MatMut<'a> {
    #[inline]
    pub(crate) fn from_layout(data: &'a mut [f64], layout: MatLayout) -> Self {
        Self { data, layout }
    }

    /// Returns the shape and stride metadata of the view.
    #[inline(always)]
    pub fn layout(&self) -> MatLayout {
        self.layout
    }

    /// Returns the underlying buffer, starting at the first element of the view.
    ///
    /// For strided views the slice also covers elements that are not part of the matrix.
    #[inline(always)]
    pub fn as_slice_mut(self) -> &'a mut [f64] {
        self.data
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

    #[inline(always)]
    pub fn row_stride(&self) -> usize {
        self.layout.row_stride as usize
    }

    #[inline(always)]
    pub fn col_stride(&self) -> usize {
        self.layout.col_stride as usize
    }

    #[inline(always)]
    pub fn num_elements(&self) -> usize {
        self.layout.num_elements()
    }

    #[inline(always)]
    pub fn is_dense(&self) -> bool {
        self.layout.is_dense()
    }

    #[inline(always)]
    pub fn is_square(&self) -> bool {
        self.layout.is_square()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    #[inline(always)]
    pub fn is_transposed(&self) -> bool {
        self.layout.transposed
    }

    #[inline(always)]
    pub fn min_dim(&self) -> usize {
        self.layout.min_dim()
    }

    #[inline(always)]
    pub fn offset(&self, row: usize, col: usize) -> usize {
        self.layout.offset(row, col)
    }

    #[inline(always)]
    pub fn is_inbounds(&self, row: usize, col: usize) -> bool {
        self.layout.is_inbounds(row, col)
    }

    /// See [`MatRef::check`].
    #[inline]
    pub fn check(&self) -> Result<(), SlapError> {
        self.rb().check()
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.rb().is_valid()
    }

    /// Reads the value of the element at the given indices, without bound checks.
    ///
    /// # Safety
    /// The behavior is undefined if any of the following conditions are violated:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    /// * `self.check()` succeeds.
    #[inline(always)]
    #[track_caller]
    pub unsafe fn read_unchecked(&self, row: usize, col: usize) -> f64 {
        self.rb().read_unchecked(row, col)
    }

    /// Reads the value of the element at the given indices, with bound checks.
    ///
    /// # Panics
    /// The function panics if any of the following conditions are violated:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    #[inline(always)]
    #[track_caller]
    pub fn read(&self, row: usize, col: usize) -> f64 {
        self.rb().read(row, col)
    }

    /// Writes the value to the element at the given indices, without bound checks.
    ///
    /// # Safety
    /// The behavior is undefined if any of the following conditions are violated:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    /// * `self.check()` succeeds.
    #[inline(always)]
    #[track_caller]
    pub unsafe fn write_unchecked(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(all(row < self.nrows(), col < self.ncols()));
        let offset = self.layout.offset(row, col);
        *self.data.get_unchecked_mut(offset) = value;
    }

    /// Writes the value to the element at the given indices, with bound checks.
    ///
    /// # Panics
    /// The function panics if any of the following conditions are violated:
    /// * `row < self.nrows()`.
    /// * `col < self.ncols()`.
    #[inline(always)]
    #[track_caller]
    pub fn write(&mut self, row: usize, col: usize, value: f64) {
        assert!(all(row < self.nrows(), col < self.ncols()));
        let offset = self.layout.offset(row, col);
        self.data[offset] = value;
    }

    /// Returns a mutable reference to the element at the given indices, with bound checks.
    #[inline(always)]
    #[track_caller]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        assert!(all(row < self.nrows(), col < self.ncols()));
        let offset = self.layout.offset(row, col);
        &mut self.data[offset]
    }

    /// Writes the value at the given indices, reporting [`SlapError::IndexOutOfBounds`] instead
    /// of panicking.
    #[inline]
    pub fn try_write(&mut self, row: usize, col: usize, value: f64) -> Result<(), SlapError> {
        let slot = if self.layout.is_inbounds(row, col) {
            self.data.get_mut(self.layout.offset(row, col))
        } else {
            None
        };
        match slot {
            Some(dst) => {
                *dst = value;
                Ok(())
            }
            None => slap_error!(
                SlapError::IndexOutOfBounds,
                "index ({row}, {col}) in a {} matrix",
                ShapeDisplay(self.layout)
            ),
        }
    }

    /// Returns a view over the transpose of `self`.
    #[inline(always)]
    #[must_use]
    pub fn transpose_mut(self) -> Self {
        Self {
            data: self.data,
            layout: self.layout.transpose(),
        }
    }

    /// Mutable version of [`MatRef::flatten`].
    #[inline]
    pub fn flatten_mut(self) -> Result<Self, SlapError> {
        Ok(Self {
            layout: flatten_layout(self.layout)?,
            data: self.data,
        })
    }

    /// Mutable version of [`MatRef::reshape`].
    #[inline]
    pub fn reshape_mut(self, nrows: usize, ncols: usize) -> Result<Self, SlapError> {
        Ok(Self {
            layout: reshape_layout(self.layout, nrows, ncols)?,
            data: self.data,
        })
    }

    /// Mutable version of [`MatRef::submatrix`].
    ///
    /// Writes through the returned view are visible through `self` once the borrow ends.
    #[inline]
    pub fn submatrix_mut(
        self,
        row_start: usize,
        col_start: usize,
        nrows: usize,
        ncols: usize,
    ) -> Result<Self, SlapError> {
        let (offset, layout) = submatrix_layout(self.layout, row_start, col_start, nrows, ncols)?;
        let data = self.data;
        let len = data.len();
        Ok(Self {
            data: &mut data[offset.min(len)..],
            layout,
        })
    }

    #[inline]
    pub fn col_mut(self, j: usize) -> Result<Self, SlapError> {
        let nrows = self.nrows();
        self.submatrix_mut(0, j, nrows, 1)
    }

    #[inline]
    pub fn row_mut(self, i: usize) -> Result<Self, SlapError> {
        let ncols = self.ncols();
        self.submatrix_mut(i, 0, 1, ncols)
    }

    /// Returns a cursor over the logical elements of the view, in column-major order.
    #[inline]
    pub fn positions(&self) -> Cursor {
        Cursor::new(self.layout)
    }

    /// Calls `f` with a mutable reference to every element, in column-major order.
    #[inline]
    pub fn for_each(&mut self, mut f: impl FnMut(&mut f64)) {
        for pos in Cursor::new(self.layout) {
            f(&mut self.data[pos.offset]);
        }
    }

    #[inline]
    pub fn to_owned(&self) -> Mat {
        self.rb().to_owned()
    }

    #[inline]
    pub fn as_ref(&self) -> MatRef<'_> {
        self.rb()
    }

    #[inline]
    pub fn as_mut(&mut self) -> MatMut<'_> {
        self.rb_mut()
    }
}

impl PartialEq for MatMut<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.rb() == other.rb()
    }
}

impl fmt::Debug for MatMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.rb(), f)
    }
}
