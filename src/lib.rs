//! `slap` is a small dense linear algebra library built around lightweight matrix views.
//!
//! A view ([`MatRef`] or [`MatMut`]) is a borrowed slice of `f64` together with two extents, two
//! strides and a transposition flag. Transposing, flattening, reshaping or taking a submatrix
//! never copies data, and every numerical routine addresses its operands through the view's
//! layout, so transposed and strided operands are supported everywhere without materializing
//! them.
//!
//! The numerical routines live in [`linalg`]:
//! - elementwise operations, copies and reductions,
//! - matrix multiplication `C = βC + αAB` and its triangular, symmetric and diagonal variants,
//! - vector products,
//! - the Cholesky factorization and triangular solves,
//! - the Householder QR decomposition.
//!
//! Routines that need scratch memory take a [`dyn_stack::PodStack`], and come with a `*_req`
//! function computing the size of the required workspace, so that the caller decides where the
//! memory comes from.
//!
//! # Example
//! ```
//! use slap::{linalg::cholesky, mat, Mat};
//!
//! let a = mat![[4.0, 2.0], [2.0, 3.0]];
//! let mut l = a.clone();
//! cholesky::compute::cholesky_in_place(l.as_mut()).unwrap();
//!
//! let mut x = mat![[2.0], [1.0]];
//! cholesky::solve::solve_in_place(l.as_ref(), x.as_mut()).unwrap();
//!
//! let mut b = Mat::zeros(2, 1);
//! slap::linalg::matmul::matmul(b.as_mut(), a.as_ref(), x.as_ref(), 1.0, 0.0).unwrap();
//! assert!((b.read(0, 0) - 2.0).abs() < 1e-12);
//! assert!((b.read(1, 0) - 1.0).abs() < 1e-12);
//! ```
//!
//! # Features
//! - `std` (default): implements `std::error::Error` for [`SlapError`]. Without it the crate is
//!   `no_std` and only requires `alloc`.
//! - `diagnostics` (default): reports every error through the `log` facade, under the `slap`
//!   target, at the point where it is raised.
//! - `perf-warn`: warns once, under the `slap_perf` target, when a factorization is given a
//!   non column-major matrix.

#![allow(clippy::too_many_arguments)]
#![allow(non_snake_case)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]

use equator::{assert, debug_assert};

extern crate alloc;

pub mod error;
pub mod iter;
pub mod linalg;
pub mod mat;

pub use dyn_stack;
pub use error::SlapError;
pub use mat::{Mat, MatMut, MatRef};
pub use reborrow;

/// Creates a [`Mat`] from a list of rows.
///
/// # Example
/// ```
/// use slap::mat;
///
/// let matrix = mat![[1.0, 5.0, 9.0], [2.0, 6.0, 10.0]];
///
/// assert_eq!(matrix.read(0, 0), 1.0);
/// assert_eq!(matrix.read(1, 0), 2.0);
/// assert_eq!(matrix.read(0, 2), 9.0);
/// assert_eq!(matrix.read(1, 2), 10.0);
/// ```
#[macro_export]
macro_rules! mat {
    () => {
        {
            compile_error!("number of columns in the matrix is ambiguous");
        }
    };

    ($([$($v:expr),* $(,)?] ),+ $(,)?) => {
        {
            let rows: &[&[f64]] = &[$(&[$($v),*]),+];
            $crate::mat::Mat::from_rows(rows)
        }
    };
}

#[cfg(feature = "perf-warn")]
#[macro_export]
#[doc(hidden)]
macro_rules! __perf_warn {
    ($name: ident) => {{
        #[inline(always)]
        #[allow(non_snake_case)]
        fn $name() -> &'static ::core::sync::atomic::AtomicBool {
            static $name: ::core::sync::atomic::AtomicBool =
                ::core::sync::atomic::AtomicBool::new(false);
            &$name
        }
        ::core::matches!(
            $name().compare_exchange(
                false,
                true,
                ::core::sync::atomic::Ordering::Relaxed,
                ::core::sync::atomic::Ordering::Relaxed,
            ),
            Ok(_)
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mat_macro() {
        let a = mat![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        assert_eq!(a.shape(), (3, 2));
        assert_eq!(a.as_slice(), [1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
        assert_eq!(a.as_ref().transpose(), mat![[1.0, 3.0, 5.0], [2.0, 4.0, 6.0]].as_ref());
    }
}
