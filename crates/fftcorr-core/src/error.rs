//! Error types for fftcorr-core operations.
//!
//! Array construction is the only fallible operation in this crate, so the
//! error surface is small: a flat buffer whose length disagrees with the
//! declared shape, or nested rows that are not all the same length.
//!
//! # Usage
//!
//! ```rust
//! use fftcorr_core::{Array2D, Error};
//!
//! let err = Array2D::new(2, 3, vec![0.0f32; 5]).unwrap_err();
//! assert!(matches!(err, Error::DimensionMismatch { .. }));
//! ```
//!
//! # Used By
//!
//! - [`crate::array::Array2D`] - Construction checks
//! - `fftcorr-ops` - Converted into `OpsError::DimensionMismatch`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building sample arrays.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Sample buffer does not match the declared shape.
    ///
    /// Returned when a flat buffer of `got` samples is offered for a
    /// `rows x cols` grid.
    #[error("dimension mismatch: {rows}x{cols} grid needs {expected} samples, got {got}")]
    DimensionMismatch {
        /// Declared row count
        rows: usize,
        /// Declared column count
        cols: usize,
        /// Samples required by the shape
        expected: usize,
        /// Samples provided
        got: usize,
    },

    /// Nested rows are not all the same length.
    #[error("ragged rows: row {row} has {got} samples, expected {expected}")]
    RaggedRows {
        /// Index of the first offending row
        row: usize,
        /// Length of row 0
        expected: usize,
        /// Length of the offending row
        got: usize,
    },

    /// `rows * cols` does not fit in `usize`.
    #[error("dimensions {rows}x{cols} overflow usize")]
    Overflow {
        /// Requested rows
        rows: usize,
        /// Requested columns
        cols: usize,
    },
}

impl Error {
    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(rows: usize, cols: usize, got: usize) -> Self {
        Self::DimensionMismatch {
            rows,
            cols,
            expected: rows.saturating_mul(cols),
            got,
        }
    }
}
