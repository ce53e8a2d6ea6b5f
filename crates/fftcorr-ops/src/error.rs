//! Error types for correlation operations.

use thiserror::Error;

/// Error type for correlation operations.
///
/// Every variant is fatal to the invocation that produced it. Nothing is
/// retried and no partial output is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpsError {
    /// An extent is zero.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Malformed grid or operands with incompatible shapes.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The spectral transform cannot process the requested size.
    #[error("transform failure: {0}")]
    TransformFailure(String),
}

/// Result type for correlation operations.
pub type OpsResult<T> = Result<T, OpsError>;

impl From<fftcorr_core::Error> for OpsError {
    fn from(err: fftcorr_core::Error) -> Self {
        match err {
            fftcorr_core::Error::Overflow { .. } => OpsError::TransformFailure(err.to_string()),
            _ => OpsError::DimensionMismatch(err.to_string()),
        }
    }
}
