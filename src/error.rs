//! Error codes returned by the fallible operations of this crate.
//!
//! Every fallible routine returns [`Result<T, SlapError>`]. The textual description of an error is
//! a pure lookup through [`SlapError::as_str`]. When the `diagnostics` feature is enabled, the
//! error is additionally reported through the [`log`](https://docs.rs/log) facade at the moment
//! it is raised, under the `slap` target, together with a description of the offending operands.
//! Disabling the feature only silences the report, the returned values are identical.

/// Closed enumeration of the failure reasons.
///
/// The absence of an error is represented by `Ok(_)`, so there is no `NoError` variant. The
/// integer returned by [`SlapError::code`] is stable and starts at `1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SlapError {
    /// A caller-provided buffer or matrix handle is missing or too short.
    BadPointer,
    /// The logical shapes of the operands do not agree.
    IncompatibleDimensions,
    /// The data buffer of a view is missing or does not cover every addressed element.
    BadDataPointer,
    /// A requested extent is out of the representable range.
    InvalidDimension,
    /// One of the strides of a view is zero.
    InvalidStride,
    /// The operation requires a square matrix.
    NotSquare,
    /// The operation requires a dense, column-major matrix.
    NotDense,
    /// A non-positive pivot was met during the Cholesky factorization.
    CholeskyFailed,
    /// Generic invalid input, see [`crate::mat::MatRef::check`] for the precise reason.
    InvalidMatrix,
    /// An element access was out of bounds.
    IndexOutOfBounds,
}

const DESCRIPTIONS: [&str; 11] = [
    "No Error",
    "Bad pointer to Matrix",
    "Incompatible matrix dimensions",
    "Bad matrix data pointer",
    "Matrix dimensions must be non-negative",
    "One of the matrix strides is less than 1",
    "Invalid operation: Matrix needs to be square",
    "Operation only valid for dense matrices",
    "Cholesky factorization failed. Matrix likely not positive definite",
    "Invalid matrix. Check for NULL data pointer and a stride of 0",
    "Indexing operation out of bounds",
];

impl SlapError {
    /// All the error codes, in increasing order of [`SlapError::code`].
    pub const ALL: [SlapError; 10] = [
        SlapError::BadPointer,
        SlapError::IncompatibleDimensions,
        SlapError::BadDataPointer,
        SlapError::InvalidDimension,
        SlapError::InvalidStride,
        SlapError::NotSquare,
        SlapError::NotDense,
        SlapError::CholeskyFailed,
        SlapError::InvalidMatrix,
        SlapError::IndexOutOfBounds,
    ];

    /// Returns the stable integer code of the error. `0` is reserved for the absence of error.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            SlapError::BadPointer => 1,
            SlapError::IncompatibleDimensions => 2,
            SlapError::BadDataPointer => 3,
            SlapError::InvalidDimension => 4,
            SlapError::InvalidStride => 5,
            SlapError::NotSquare => 6,
            SlapError::NotDense => 7,
            SlapError::CholeskyFailed => 8,
            SlapError::InvalidMatrix => 9,
            SlapError::IndexOutOfBounds => 10,
        }
    }

    /// Inverse of [`SlapError::code`]. Returns `None` for `0` and for unknown codes.
    #[inline]
    pub fn from_code(code: u8) -> Option<SlapError> {
        Self::ALL.into_iter().find(|err| err.code() == code)
    }

    /// Returns the human readable description of the error.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        DESCRIPTIONS[self.code() as usize]
    }
}

/// Returns the description associated with a raw error code, `0` meaning success.
#[inline]
pub fn describe(code: u8) -> &'static str {
    match DESCRIPTIONS.get(code as usize) {
        Some(text) => text,
        None => "Unknown error type",
    }
}

impl core::fmt::Display for SlapError {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl std::error::Error for SlapError {}

/// Evaluates to `Err(code)`, reporting the error and its context to the `slap` log target when
/// the `diagnostics` feature is enabled.
macro_rules! slap_error {
    ($err: expr $(,)?) => {{
        let err: $crate::SlapError = $err;
        #[cfg(feature = "diagnostics")]
        ::log::error!(target: "slap", "slap error {}: {}", err.code(), err.as_str());
        ::core::result::Result::Err(err)
    }};
    ($err: expr, $($context: tt)+) => {{
        let err: $crate::SlapError = $err;
        #[cfg(feature = "diagnostics")]
        ::log::error!(
            target: "slap",
            "slap error {}: {}. {}",
            err.code(),
            err.as_str(),
            ::core::format_args!($($context)+)
        );
        ::core::result::Result::Err(err)
    }};
}

pub(crate) use slap_error;
