//! Column-major traversal of the logical elements of a matrix view.
//!
//! A [`Cursor`] yields [`Position`]s rather than values, so that consumers get both the
//! cartesian index of an element and its offset in the underlying buffer. It can be driven
//! manually with [`Cursor::step`] and [`Cursor::is_finished`], or used as an [`Iterator`].
//!
//! ```
//! use slap::{iter::Cursor, mat};
//!
//! let a = mat![[1.0, 2.0], [3.0, 4.0]];
//! let a = a.as_ref().transpose();
//!
//! let mut cursor = Cursor::new(a.layout());
//! let mut seen = Vec::new();
//! while !cursor.is_finished() {
//!     let pos = cursor.position();
//!     seen.push((pos.row, pos.col, a.as_slice()[pos.offset]));
//!     cursor.step();
//! }
//! assert_eq!(seen, [(0, 0, 1.0), (1, 0, 2.0), (0, 1, 3.0), (1, 1, 4.0)]);
//! ```

use crate::mat::MatLayout;
use core::iter::FusedIterator;

/// Location of an element during a traversal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Logical row index.
    pub row: usize,
    /// Logical column index.
    pub col: usize,
    /// Index of the element in the column-major traversal order.
    pub linear: usize,
    /// Offset of the element in the data of the view.
    pub offset: usize,
}

/// Restartable cursor over the logical elements of a view, in column-major order.
#[derive(Clone, Debug)]
pub struct Cursor {
    len: usize,
    nrows: usize,
    row_step: usize,
    col_step: usize,
    pos: Position,
}

impl Cursor {
    /// Creates a cursor positioned on the element `(0, 0)`.
    #[inline]
    pub fn new(layout: MatLayout) -> Self {
        let (row_step, col_step) = layout.logical_strides();
        Self {
            len: layout.num_elements(),
            nrows: layout.nrows(),
            row_step,
            col_step,
            pos: Position::default(),
        }
    }

    /// Current position. Meaningless once [`Cursor::is_finished`] returns `true`.
    #[inline(always)]
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Number of elements left, including the current one.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.len.saturating_sub(self.pos.linear)
    }

    /// Whether every element has been visited.
    #[inline(always)]
    pub fn is_finished(&self) -> bool {
        self.pos.linear >= self.len
    }

    /// Moves to the next element: down the current column, then to the top of the next one.
    #[inline]
    pub fn step(&mut self) {
        let pos = &mut self.pos;
        pos.linear += 1;
        pos.row += 1;
        pos.offset += self.row_step;
        if pos.row == self.nrows {
            pos.row = 0;
            pos.col += 1;
            pos.offset = pos.col * self.col_step;
        }
    }

    /// Goes back to the first element.
    #[inline]
    pub fn restart(&mut self) {
        self.pos = Position::default();
    }
}

impl Iterator for Cursor {
    type Item = Position;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }
        let pos = self.pos;
        self.step();
        Some(pos)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cursor {}
impl FusedIterator for Cursor {}
