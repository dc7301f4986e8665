//! Matrix views and the owned matrix type.
//!
//! A view is a borrowed slice of `f64` together with a [`MatLayout`] describing how logical
//! `(row, col)` indices map to offsets into that slice. Views never own their data: transposing,
//! flattening, reshaping or taking a submatrix only produces a new descriptor over the same
//! memory.

use crate::{
    assert,
    error::{slap_error, SlapError},
};

mod matmut;
mod matown;
mod matref;

pub use matmut::MatMut;
pub use matown::Mat;
pub use matref::MatRef;

/// Largest extent or stride representable by a view.
pub const MAX_DIM: usize = u16::MAX as usize;

/// Shape and stride metadata of a matrix view.
///
/// `nrows` and `ncols` are the stored extents. When `transposed` is set, the logical number of
/// rows is `ncols` and the roles of the two strides are swapped during addressing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MatLayout {
    /// Stored extent along the first axis.
    pub nrows: u16,
    /// Stored extent along the second axis.
    pub ncols: u16,
    /// Offset between two consecutive stored rows.
    pub row_stride: u16,
    /// Offset between two consecutive stored columns.
    pub col_stride: u16,
    /// Whether the logical matrix is the transpose of the stored one.
    pub transposed: bool,
}

impl MatLayout {
    /// Layout of a dense column-major `nrows × ncols` matrix.
    ///
    /// # Panics
    /// Panics if either extent is larger than [`MAX_DIM`].
    #[inline]
    #[track_caller]
    pub fn dense(nrows: usize, ncols: usize) -> Self {
        assert!(all(nrows <= MAX_DIM, ncols <= MAX_DIM));
        Self {
            nrows: nrows as u16,
            ncols: ncols as u16,
            row_stride: 1,
            col_stride: nrows as u16,
            transposed: false,
        }
    }

    /// Fallible version of [`MatLayout::dense`].
    #[inline]
    pub fn try_dense(nrows: usize, ncols: usize) -> Result<Self, SlapError> {
        if nrows > MAX_DIM || ncols > MAX_DIM {
            return slap_error!(
                SlapError::InvalidDimension,
                "requested a {nrows}x{ncols} matrix, the largest extent is {MAX_DIM}"
            );
        }
        Ok(Self::dense(nrows, ncols))
    }

    /// Logical number of rows.
    #[inline(always)]
    pub fn nrows(&self) -> usize {
        if self.transposed {
            self.ncols as usize
        } else {
            self.nrows as usize
        }
    }

    /// Logical number of columns.
    #[inline(always)]
    pub fn ncols(&self) -> usize {
        if self.transposed {
            self.nrows as usize
        } else {
            self.ncols as usize
        }
    }

    /// Number of elements, `nrows * ncols`.
    #[inline(always)]
    pub fn num_elements(&self) -> usize {
        self.nrows as usize * self.ncols as usize
    }

    /// Whether the stored matrix is a contiguous column-major block.
    #[inline]
    pub fn is_dense(&self) -> bool {
        self.row_stride == 1 && self.col_stride == self.nrows
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    #[inline]
    pub fn min_dim(&self) -> usize {
        Ord::min(self.nrows, self.ncols) as usize
    }

    /// Offset of the logical element `(row, col)` from the start of the data.
    ///
    /// No bound checks are performed.
    #[inline(always)]
    pub fn offset(&self, row: usize, col: usize) -> usize {
        let (sx, sy) = (self.row_stride as usize, self.col_stride as usize);
        if self.transposed {
            col * sx + row * sy
        } else {
            row * sx + col * sy
        }
    }

    /// Whether `(row, col)` is a valid logical index.
    #[inline(always)]
    pub fn is_inbounds(&self, row: usize, col: usize) -> bool {
        row < self.nrows() && col < self.ncols()
    }

    /// Offset step for moving one logical row down and one logical column right.
    #[inline(always)]
    pub(crate) fn logical_strides(&self) -> (usize, usize) {
        if self.transposed {
            (self.col_stride as usize, self.row_stride as usize)
        } else {
            (self.row_stride as usize, self.col_stride as usize)
        }
    }

    /// Offset of the last addressable element, or `None` for an empty matrix.
    #[inline]
    pub fn max_offset(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.offset(self.nrows() - 1, self.ncols() - 1))
        }
    }

    /// Maps a column-major sequence index of the logical matrix to its `(row, col)` index.
    #[inline]
    pub fn linear_to_cartesian(&self, k: usize) -> (usize, usize) {
        let nrows = self.nrows();
        if nrows == 0 {
            return (0, 0);
        }
        (k % nrows, k / nrows)
    }

    /// Offset of the `k`-th element of the logical matrix in column-major order.
    #[inline]
    pub fn linear_offset(&self, k: usize) -> usize {
        if self.is_dense() && !self.transposed {
            return k;
        }
        let (row, col) = self.linear_to_cartesian(k);
        self.offset(row, col)
    }

    /// Layout of the transposed matrix.
    #[inline]
    #[must_use]
    pub fn transpose(self) -> Self {
        Self {
            transposed: !self.transposed,
            ..self
        }
    }

    /// Checks the layout against a buffer of `len` elements, `None` meaning no buffer at all.
    pub fn check(&self, len: Option<usize>) -> Result<(), SlapError> {
        let len = match len {
            Some(len) => len,
            None if self.is_empty() => return Ok(()),
            None => {
                return slap_error!(
                    SlapError::BadDataPointer,
                    "{}x{} matrix has no data",
                    self.nrows(),
                    self.ncols()
                );
            }
        };
        if self.is_empty() {
            return Ok(());
        }
        if self.row_stride == 0 || self.col_stride == 0 {
            return slap_error!(
                SlapError::InvalidStride,
                "strides are ({}, {})",
                self.row_stride,
                self.col_stride
            );
        }
        match self.max_offset() {
            Some(last) if last >= len => slap_error!(
                SlapError::BadDataPointer,
                "{}x{} matrix addresses offset {last} of a buffer of length {len}",
                self.nrows(),
                self.ncols()
            ),
            _ => Ok(()),
        }
    }
}

/// Layout as a short human readable string, used in error reports.
pub(crate) struct ShapeDisplay(pub MatLayout);

impl core::fmt::Display for ShapeDisplay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.0.nrows(), self.0.ncols())?;
        if self.0.transposed {
            f.write_str(" (transposed)")?;
        }
        Ok(())
    }
}

#[track_caller]
#[inline]
fn from_slice_assert(nrows: usize, ncols: usize, len: usize) {
    assert!(all(nrows <= MAX_DIM, ncols <= MAX_DIM));
    assert!(nrows * ncols <= len);
}

/// Creates a dense `MatRef` over `slice`, interpreted in column-major order.
///
/// # Panics
/// The function panics if any of the following conditions are violated:
/// * `nrows <= MAX_DIM` and `ncols <= MAX_DIM`.
/// * `nrows * ncols <= slice.len()`.
///
/// # Example
/// ```
/// use slap::mat;
///
/// let slice = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0_f64];
/// let view = mat::from_column_major_slice(&slice, 3, 2);
///
/// assert_eq!(view.read(0, 1), 4.0);
/// assert_eq!(view, mat![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]].as_ref());
/// ```
#[track_caller]
#[inline]
pub fn from_column_major_slice(slice: &[f64], nrows: usize, ncols: usize) -> MatRef<'_> {
    from_slice_assert(nrows, ncols, slice.len());
    MatRef::from_layout(slice, MatLayout::dense(nrows, ncols))
}

/// Creates a dense `MatMut` over `slice`, interpreted in column-major order.
///
/// # Panics
/// Same conditions as [`from_column_major_slice`].
#[track_caller]
#[inline]
pub fn from_column_major_slice_mut(slice: &mut [f64], nrows: usize, ncols: usize) -> MatMut<'_> {
    from_slice_assert(nrows, ncols, slice.len());
    MatMut::from_layout(slice, MatLayout::dense(nrows, ncols))
}

/// Creates a `MatRef` over `slice`, interpreted in row-major order.
///
/// The result is the transposed view of a column-major `ncols × nrows` matrix.
#[track_caller]
#[inline]
pub fn from_row_major_slice(slice: &[f64], nrows: usize, ncols: usize) -> MatRef<'_> {
    from_column_major_slice(slice, ncols, nrows).transpose()
}

/// Creates a `MatRef` from a buffer and an arbitrary layout.
///
/// The layout is not validated; [`MatRef::check`] reports whether it is usable with `slice`.
#[inline]
pub fn from_raw_parts(slice: &[f64], layout: MatLayout) -> MatRef<'_> {
    MatRef::from_layout(slice, layout)
}

/// Creates a `MatMut` from a buffer and an arbitrary layout.
///
/// The layout is not validated; [`MatMut::check`] reports whether it is usable with `slice`.
#[inline]
pub fn from_raw_parts_mut(slice: &mut [f64], layout: MatLayout) -> MatMut<'_> {
    MatMut::from_layout(slice, layout)
}

/// Creates a `MatRef` with explicit strides.
///
/// # Panics
/// Panics if an extent or a stride is larger than [`MAX_DIM`].
#[track_caller]
pub fn from_strided_slice(
    slice: &[f64],
    nrows: usize,
    ncols: usize,
    row_stride: usize,
    col_stride: usize,
) -> MatRef<'_> {
    MatRef::from_layout(slice, strided_layout(nrows, ncols, row_stride, col_stride))
}

/// Creates a `MatMut` with explicit strides.
///
/// # Panics
/// Panics if an extent or a stride is larger than [`MAX_DIM`].
#[track_caller]
pub fn from_strided_slice_mut(
    slice: &mut [f64],
    nrows: usize,
    ncols: usize,
    row_stride: usize,
    col_stride: usize,
) -> MatMut<'_> {
    MatMut::from_layout(slice, strided_layout(nrows, ncols, row_stride, col_stride))
}

#[track_caller]
fn strided_layout(nrows: usize, ncols: usize, row_stride: usize, col_stride: usize) -> MatLayout {
    assert!(all(
        nrows <= MAX_DIM,
        ncols <= MAX_DIM,
        row_stride <= MAX_DIM,
        col_stride <= MAX_DIM
    ));
    MatLayout {
        nrows: nrows as u16,
        ncols: ncols as u16,
        row_stride: row_stride as u16,
        col_stride: col_stride as u16,
        transposed: false,
    }
}

/// Layout of a submatrix, together with the offset of its first element in the parent buffer.
pub(crate) fn submatrix_layout(
    layout: MatLayout,
    row_start: usize,
    col_start: usize,
    nrows: usize,
    ncols: usize,
) -> Result<(usize, MatLayout), SlapError> {
    let fits = row_start
        .checked_add(nrows)
        .is_some_and(|end| end <= layout.nrows())
        && col_start
            .checked_add(ncols)
            .is_some_and(|end| end <= layout.ncols());
    if !fits {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "submatrix of size {nrows}x{ncols} at ({row_start}, {col_start}) does not fit in a {} matrix",
            ShapeDisplay(layout)
        );
    }

    let offset = if nrows == 0 || ncols == 0 {
        0
    } else {
        layout.offset(row_start, col_start)
    };
    let (stored_nrows, stored_ncols) = if layout.transposed {
        (ncols, nrows)
    } else {
        (nrows, ncols)
    };
    Ok((
        offset,
        MatLayout {
            nrows: stored_nrows as u16,
            ncols: stored_ncols as u16,
            ..layout
        },
    ))
}

/// Whether the logical column-major order of a dense layout is its storage order. A transposed
/// layout only qualifies when it is a single row or column.
fn is_column_major_dense(layout: MatLayout) -> bool {
    layout.is_dense() && (!layout.transposed || layout.nrows <= 1 || layout.ncols <= 1)
}

/// Layout of the flattened matrix.
pub(crate) fn flatten_layout(layout: MatLayout) -> Result<MatLayout, SlapError> {
    if !is_column_major_dense(layout) {
        return slap_error!(
            SlapError::NotDense,
            "cannot flatten a {} matrix with strides ({}, {})",
            ShapeDisplay(layout),
            layout.row_stride,
            layout.col_stride
        );
    }
    let len = layout.num_elements();
    if len > MAX_DIM {
        return slap_error!(
            SlapError::InvalidDimension,
            "flattening a {} matrix gives {len} rows, the largest extent is {MAX_DIM}",
            ShapeDisplay(layout)
        );
    }
    Ok(MatLayout {
        nrows: len as u16,
        ncols: 1,
        row_stride: layout.row_stride,
        col_stride: len as u16,
        transposed: false,
    })
}

/// Layout of the reshaped matrix.
pub(crate) fn reshape_layout(
    layout: MatLayout,
    nrows: usize,
    ncols: usize,
) -> Result<MatLayout, SlapError> {
    if nrows == 0 || ncols == 0 || nrows > MAX_DIM || ncols > MAX_DIM {
        return slap_error!(
            SlapError::InvalidDimension,
            "cannot reshape to {nrows}x{ncols}, extents must be in 1..={MAX_DIM}"
        );
    }
    if !is_column_major_dense(layout) {
        return slap_error!(
            SlapError::NotDense,
            "cannot reshape a {} matrix with strides ({}, {})",
            ShapeDisplay(layout),
            layout.row_stride,
            layout.col_stride
        );
    }
    if nrows * ncols > layout.num_elements() {
        return slap_error!(
            SlapError::IncompatibleDimensions,
            "cannot reshape a {} matrix to the larger {nrows}x{ncols}",
            ShapeDisplay(layout)
        );
    }
    Ok(MatLayout::dense(nrows, ncols))
}
