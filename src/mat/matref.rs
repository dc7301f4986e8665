use super::*;
use crate::{assert, debug_assert, iter::Cursor, linalg::reductions, Mat};
use core::fmt;
use reborrow::*;

/// Immutable view over a matrix, similar to an immutable reference to a 2D strided [prim@slice].
///
/// The view stores the borrowed data and a [`MatLayout`]. Every element access goes through
/// [`MatLayout::offset`], so strided and transposed views are handled uniformly by all the
/// routines of this crate.
#[derive(Copy, Clone)]
pub struct MatRef<'a> {
    data: &'a [f64],
    layout: MatLayout,
}

impl<'short> Reborrow<'short> for MatRef<'_> {
    type Target = MatRef<'short>;

    #[inline]
    fn rb(&'short self) -> Self::Target {
        *self
    }
}

impl<'short> ReborrowMut<'short> for MatRef<'_> {
    type Target = MatRef<'short>;

    #[inline]
    fn rb_mut(&'short mut self) -> Self::Target {
        *self
    }
}

impl IntoConst for MatRef<'_> {
    type Target = Self;

    #[inline]
    fn into_const(self) -> Self::Target {
        self
    }
}

impl<'a> MatRef<'a> {
    #[inline]
    pub(crate) fn from_layout(data: &'a [f64], layout: MatLayout) -> Self {
        Self { data, layout }
    }

    /// Returns the shape and stride metadata of the view.
    #[inline(always)]
    pub fn layout(&self) -> MatLayout {
        self.layout
    }

    /// Returns the underlying buffer, starting at the first element of the view.
    #[inline(always)]
    pub fn as_slice(self) -> &'a [f64] {
        self.data
    }

    /// Returns the number of rows of the matrix.
    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.layout.nrows()
    }

    /// Returns the number of columns of the matrix.
    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.layout.ncols()
    }

    /// Returns the number of rows and columns of the matrix.
    #[inline(always)]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// Returns the offset between the first elements of two successive stored rows.
    #[inline(always)]
    pub fn row_stride(&self) -> usize {
        self.layout.row_stride as usize
    }

    /// Returns the offset between the first elements of two successive stored columns.
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

    /// Whether the view has neither data nor extents, like the views returned by a failed
    /// transformation in C-style APIs.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.data.is_empty() && self.layout.nrows == 0 && self.layout.ncols == 0
    }

    /// See [`MatLayout::offset`].
    #[inline(always)]
    pub fn offset(&self, row: usize, col: usize) -> usize {
        self.layout.offset(row, col)
    }

    #[inline(always)]
    pub fn is_inbounds(&self, row: usize, col: usize) -> bool {
        self.layout.is_inbounds(row, col)
    }

    /// See [`MatLayout::linear_to_cartesian`].
    #[inline]
    pub fn linear_to_cartesian(&self, k: usize) -> (usize, usize) {
        self.layout.linear_to_cartesian(k)
    }

    /// See [`MatLayout::linear_offset`].
    #[inline]
    pub fn linear_offset(&self, k: usize) -> usize {
        self.layout.linear_offset(k)
    }

    /// Checks that the view can be used by the numerical routines.
    ///
    /// Returns [`SlapError::BadDataPointer`] if the data does not cover every addressed element
    /// (in particular after [`Mat::free`]), and [`SlapError::InvalidStride`] if a stride is zero.
    #[inline]
    pub fn check(&self) -> Result<(), SlapError> {
        let len = if self.data.is_empty() {
            None
        } else {
            Some(self.data.len())
        };
        self.layout.check(len)
    }

    /// Boolean shorthand for [`MatRef::check`].
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
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
        debug_assert!(all(row < self.nrows(), col < self.ncols()));
        *self.data.get_unchecked(self.layout.offset(row, col))
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
        assert!(all(row < self.nrows(), col < self.ncols()));
        self.data[self.layout.offset(row, col)]
    }

    /// Returns a reference to the element at the given indices, with bound checks.
    #[inline(always)]
    #[track_caller]
    pub fn get(self, row: usize, col: usize) -> &'a f64 {
        assert!(all(row < self.nrows(), col < self.ncols()));
        &self.data[self.layout.offset(row, col)]
    }

    /// Reads the value of the element at the given indices, reporting
    /// [`SlapError::IndexOutOfBounds`] instead of panicking.
    #[inline]
    pub fn try_read(&self, row: usize, col: usize) -> Result<f64, SlapError> {
        let slot = if self.is_inbounds(row, col) {
            self.data.get(self.layout.offset(row, col))
        } else {
            None
        };
        match slot {
            Some(value) => Ok(*value),
            None => slap_error!(
                SlapError::IndexOutOfBounds,
                "index ({row}, {col}) in a {} matrix",
                ShapeDisplay(self.layout)
            ),
        }
    }

    /// Returns a view over the transpose of `self`.
    ///
    /// # Example
    /// ```
    /// use slap::mat;
    ///
    /// let matrix = mat![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
    /// let view = matrix.as_ref();
    /// let transpose = view.transpose();
    ///
    /// let expected = mat![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]];
    /// assert_eq!(expected.as_ref(), transpose);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn transpose(self) -> Self {
        Self {
            data: self.data,
            layout: self.layout.transpose(),
        }
    }

    /// Returns a `num_elements × 1` view over the same data.
    ///
    /// Only dense matrices whose column-major order is their storage order can be flattened,
    /// which excludes transposed views with more than one row and column. Fails with
    /// [`SlapError::NotDense`] otherwise.
    #[inline]
    pub fn flatten(self) -> Result<Self, SlapError> {
        Ok(Self {
            data: self.data,
            layout: flatten_layout(self.layout)?,
        })
    }

    /// Reinterprets the first `nrows * ncols` stored elements as a dense `nrows × ncols` matrix.
    ///
    /// This is not a submatrix: a smaller shape takes a prefix of the data in column-major
    /// order. The same views as [`MatRef::flatten`] can be reshaped.
    ///
    /// # Example
    /// ```
    /// use slap::mat;
    ///
    /// let matrix = mat![[1.0, 3.0, 5.0], [2.0, 4.0, 6.0]];
    /// let view = matrix.as_ref().reshape(2, 2).unwrap();
    /// assert_eq!(view, mat![[1.0, 3.0], [2.0, 4.0]].as_ref());
    /// ```
    #[inline]
    pub fn reshape(self, nrows: usize, ncols: usize) -> Result<Self, SlapError> {
        Ok(Self {
            data: self.data,
            layout: reshape_layout(self.layout, nrows, ncols)?,
        })
    }

    /// Returns a view over the submatrix starting at indices `(row_start, col_start)`, and with
    /// dimensions `(nrows, ncols)`.
    ///
    /// Fails with [`SlapError::IncompatibleDimensions`] if the submatrix does not fit.
    ///
    /// # Example
    /// ```
    /// use slap::mat;
    ///
    /// let matrix = mat![
    ///     [1.0, 5.0, 9.0],
    ///     [2.0, 6.0, 10.0],
    ///     [3.0, 7.0, 11.0],
    ///     [4.0, 8.0, 12.0],
    /// ];
    ///
    /// let submatrix = matrix.as_ref().submatrix(2, 1, 2, 2).unwrap();
    /// assert_eq!(submatrix, mat![[7.0, 11.0], [8.0, 12.0]].as_ref());
    /// ```
    #[inline]
    pub fn submatrix(
        self,
        row_start: usize,
        col_start: usize,
        nrows: usize,
        ncols: usize,
    ) -> Result<Self, SlapError> {
        let (offset, layout) = submatrix_layout(self.layout, row_start, col_start, nrows, ncols)?;
        let data = self.data.get(offset..).unwrap_or(&[]);
        Ok(Self { data, layout })
    }

    /// Returns the `j`-th column as an `nrows × 1` view.
    #[inline]
    pub fn col(self, j: usize) -> Result<Self, SlapError> {
        self.submatrix(0, j, self.nrows(), 1)
    }

    /// Returns the `i`-th row as a `1 × ncols` view.
    #[inline]
    pub fn row(self, i: usize) -> Result<Self, SlapError> {
        self.submatrix(i, 0, 1, self.ncols())
    }

    /// Returns a cursor over the logical elements of the view, in column-major order.
    #[inline]
    pub fn positions(&self) -> Cursor {
        Cursor::new(self.layout)
    }

    /// Returns an iterator over the values of the view, in column-major order.
    #[inline]
    pub fn values(self) -> impl Iterator<Item = f64> + 'a {
        let data = self.data;
        Cursor::new(self.layout).map(move |pos| data[pos.offset])
    }

    /// Returns an owned copy of the matrix.
    #[inline]
    pub fn to_owned(&self) -> Mat {
        Mat::from_fn(self.nrows(), self.ncols(), |i, j| self.read(i, j))
    }

    /// Returns the sum of the elements.
    #[inline]
    pub fn sum(&self) -> f64 {
        reductions::sum(*self)
    }

    /// Returns the Frobenius norm of the matrix.
    #[inline]
    pub fn norm_l2(&self) -> f64 {
        reductions::norm_l2(*self)
    }

    /// Returns the largest absolute value of the elements.
    #[inline]
    pub fn norm_max(&self) -> f64 {
        reductions::norm_max(*self)
    }

    #[inline]
    pub fn as_ref(&self) -> MatRef<'_> {
        *self
    }
}

impl PartialEq for MatRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        if self.shape() != other.shape() || !self.is_valid() || !other.is_valid() {
            return false;
        }
        (0..self.ncols()).all(|j| (0..self.nrows()).all(|i| self.read(i, j) == other.read(i, j)))
    }
}

impl fmt::Debug for MatRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct DebugRow<'a, 'b>(&'b MatRef<'a>, usize);

        impl fmt::Debug for DebugRow<'_, '_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let (mat, i) = (self.0, self.1);
                f.debug_list()
                    .entries((0..mat.ncols()).map(|j| mat.read(i, j)))
                    .finish()
            }
        }

        if !self.is_valid() {
            return f
                .debug_struct("MatRef")
                .field("layout", &self.layout)
                .field("len", &self.data.len())
                .finish();
        }
        f.debug_list()
            .entries((0..self.nrows()).map(|i| DebugRow(self, i)))
            .finish()
    }
}
