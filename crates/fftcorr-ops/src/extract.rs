//! Result window extraction.

use crate::layout::Offset;
use crate::sample::Sample;
use crate::transform::PaddedBuffer;
use crate::{OpsError, OpsResult};
use fftcorr_core::Array2D;
use rustfft::FftNum;

/// Copies the `rows x cols` window starting at `offset` out of an
/// inverse-transformed buffer.
///
/// The window never wraps. When the offsets come from
/// [`layout::plan`](crate::layout::plan) it always fits; otherwise a window
/// that leaves the buffer fails with [`OpsError::DimensionMismatch`].
pub fn extract<T: FftNum, S: Sample<Real = T>>(
    buffer: &PaddedBuffer<T>,
    offset: Offset,
    rows: usize,
    cols: usize,
) -> OpsResult<Array2D<S>> {
    let (pad_rows, pad_cols) = buffer.dims();
    if offset.row.saturating_add(rows) > pad_rows || offset.col.saturating_add(cols) > pad_cols {
        return Err(OpsError::DimensionMismatch(format!(
            "{}x{} window at (col {}, row {}) exceeds {}x{} buffer",
            rows, cols, offset.col, offset.row, pad_rows, pad_cols
        )));
    }

    let data = buffer.as_slice();
    let mut out = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        let start = (offset.row + r) * pad_cols + offset.col;
        out.extend(data[start..start + cols].iter().map(|&v| S::from_complex(v)));
    }
    Ok(Array2D::new(rows, cols, out)?)
}
