//! Forward and inverse 2D DFT over padded buffers.
//!
//! A [`PaddedBuffer`] is a zero-filled complex grid that operands are
//! written into. [`SpectralTransform::forward`] turns it into a
//! [`Spectrum`], [`SpectralTransform::inverse`] turns a spectrum back into a
//! buffer. Both work in place on the owned storage; the types only record
//! which domain the samples are in.
//!
//! The inverse is normalized by `1 / (rows * cols)`, so
//! `inverse(forward(x)) == x` up to rounding.
//!
//! # Implementation
//!
//! [`RustFftTransform`] runs the usual row-column decomposition on
//! `rustfft`:
//!
//! 1. 1D FFT of every row
//! 2. transpose
//! 3. 1D FFT of every row of the transposed grid (the original columns)
//! 4. transpose back
//!
//! Rows that a buffer reports as all zero are skipped in step 1, since the
//! FFT of a zero row is zero.
//!
//! # Example
//!
//! ```rust
//! use fftcorr_core::Array2D;
//! use fftcorr_ops::transform::{PaddedBuffer, RustFftTransform, SpectralTransform};
//!
//! let src = Array2D::from_fn(4, 6, |r, c| (r * 6 + c) as f64);
//! let buffer = PaddedBuffer::from_array(&src).unwrap();
//!
//! let fft = RustFftTransform::default();
//! let back = fft.inverse(fft.forward(buffer).unwrap()).unwrap();
//! assert!((back.get(3, 5).re - 23.0).abs() < 1e-9);
//! ```

use crate::layout::Offset;
use crate::sample::Sample;
use crate::{OpsError, OpsResult};
use fftcorr_core::Array2D;
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use rustfft::{Fft, FftNum, FftPlanner};
use std::ops::Range;
use std::sync::Arc;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Zero-padded complex grid in the sample domain.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedBuffer<T> {
    data: Vec<Complex<T>>,
    rows: usize,
    cols: usize,
    /// Rows outside this range are all zero.
    occupied: Range<usize>,
}

impl<T: FftNum> PaddedBuffer<T> {
    /// Allocates a zero-filled `rows x cols` buffer.
    ///
    /// Fails with [`OpsError::InvalidDimensions`] if either extent is zero,
    /// and with [`OpsError::TransformFailure`] if the element count
    /// overflows.
    pub fn zeros(rows: usize, cols: usize) -> OpsResult<Self> {
        let len = checked_area(rows, cols)?;
        Ok(Self {
            data: vec![Complex::zero(); len],
            rows,
            cols,
            occupied: 0..0,
        })
    }

    /// Copies an array into a buffer of exactly its size.
    pub fn from_array<S: Sample<Real = T>>(src: &Array2D<S>) -> OpsResult<Self> {
        let mut buffer = Self::zeros(src.rows(), src.cols())?;
        buffer.place(src, Offset::ORIGIN)?;
        Ok(buffer)
    }

    /// Wraps raw row-major storage. Every row counts as occupied.
    pub fn from_parts(rows: usize, cols: usize, data: Vec<Complex<T>>) -> OpsResult<Self> {
        let len = checked_area(rows, cols)?;
        if data.len() != len {
            return Err(OpsError::DimensionMismatch(format!(
                "expected {} samples, got {}",
                len,
                data.len()
            )));
        }
        Ok(Self {
            data,
            rows,
            cols,
            occupied: 0..rows,
        })
    }

    /// Writes `src` with its top-left sample at `at`.
    ///
    /// The block must fit entirely; nothing wraps.
    pub fn place<S: Sample<Real = T>>(&mut self, src: &Array2D<S>, at: Offset) -> OpsResult<()> {
        if at.row.saturating_add(src.rows()) > self.rows || at.col.saturating_add(src.cols()) > self.cols {
            return Err(OpsError::DimensionMismatch(format!(
                "{}x{} block at (col {}, row {}) exceeds {}x{} buffer",
                src.rows(),
                src.cols(),
                at.col,
                at.row,
                self.rows,
                self.cols
            )));
        }
        if src.is_empty() {
            return Ok(());
        }

        for (r, row) in src.rows_iter().enumerate() {
            let start = (at.row + r) * self.cols + at.col;
            for (dst, &s) in self.data[start..start + row.len()].iter_mut().zip(row) {
                *dst = s.to_complex();
            }
        }

        let placed = at.row..at.row + src.rows();
        self.occupied = if self.occupied.is_empty() {
            placed
        } else {
            self.occupied.start.min(placed.start)..self.occupied.end.max(placed.end)
        };
        Ok(())
    }

    /// Rows that may hold non-zero samples.
    #[inline]
    pub fn occupied_rows(&self) -> Range<usize> {
        self.occupied.clone()
    }

    /// Sample at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics when out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex<T> {
        assert!(row < self.rows && col < self.cols, "({}, {}) out of range", row, col);
        self.data[row * self.cols + col]
    }

    /// Mutable row-major storage. Marks every row as occupied.
    pub fn as_mut_slice(&mut self) -> &mut [Complex<T>] {
        self.occupied = 0..self.rows;
        &mut self.data
    }

    /// Consumes the buffer, returning `(rows, cols, data)`.
    pub fn into_parts(self) -> (usize, usize, Vec<Complex<T>>) {
        (self.rows, self.cols, self.data)
    }
}

impl<T> PaddedBuffer<T> {
    /// Rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[Complex<T>] {
        &self.data
    }
}

/// Transform-domain counterpart of a [`PaddedBuffer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum<T> {
    pub(crate) data: Vec<Complex<T>>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl<T> Spectrum<T> {
    /// Wraps raw row-major coefficients, for custom transforms.
    pub fn from_parts(rows: usize, cols: usize, data: Vec<Complex<T>>) -> OpsResult<Self> {
        let len = checked_area(rows, cols)?;
        if data.len() != len {
            return Err(OpsError::DimensionMismatch(format!(
                "expected {} coefficients, got {}",
                len,
                data.len()
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Consumes the spectrum, returning `(rows, cols, data)`.
    pub fn into_parts(self) -> (usize, usize, Vec<Complex<T>>) {
        (self.rows, self.cols, self.data)
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major coefficients.
    #[inline]
    pub fn as_slice(&self) -> &[Complex<T>] {
        &self.data
    }
}

/// Forward/inverse 2D DFT capability.
///
/// Implementations must be stateless with respect to the buffers they are
/// handed, so one instance can serve concurrent invocations.
pub trait SpectralTransform<T: FftNum>: Send + Sync {
    /// Forward transform, unnormalized.
    fn forward(&self, buffer: PaddedBuffer<T>) -> OpsResult<Spectrum<T>>;

    /// Inverse transform, scaled by `1 / (rows * cols)`.
    fn inverse(&self, spectrum: Spectrum<T>) -> OpsResult<PaddedBuffer<T>>;
}

/// [`SpectralTransform`] backed by `rustfft`.
#[derive(Debug, Clone, Copy)]
pub struct RustFftTransform {
    parallel: bool,
}

impl Default for RustFftTransform {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RustFftTransform {
    /// Creates a transform. `parallel` only has an effect with the
    /// `parallel` feature.
    pub fn new(parallel: bool) -> Self {
        Self {
            parallel: cfg!(feature = "parallel") && parallel,
        }
    }

    fn run<T: FftNum>(
        &self,
        data: &mut Vec<Complex<T>>,
        rows: usize,
        cols: usize,
        skip: Range<usize>,
        row_fft: Arc<dyn Fft<T>>,
        col_fft: Arc<dyn Fft<T>>,
    ) {
        // Step 1: FFT rows that can be non-zero
        let live = &mut data[skip.start * cols..skip.end * cols];
        process_rows(live, &row_fft, self.parallel);

        // Step 2-4: columns via transpose
        let mut transposed = transpose(data, rows, cols, self.parallel);
        process_rows(&mut transposed, &col_fft, self.parallel);
        *data = transpose(&transposed, cols, rows, self.parallel);
    }
}

impl<T: FftNum> SpectralTransform<T> for RustFftTransform {
    fn forward(&self, buffer: PaddedBuffer<T>) -> OpsResult<Spectrum<T>> {
        let (rows, cols) = buffer.dims();
        checked_area(rows, cols)?;
        let occupied = buffer.occupied_rows();
        trace!(rows, cols, occupied_start = occupied.start, occupied_end = occupied.end, "fft forward");

        let mut planner = FftPlanner::<T>::new();
        let row_fft = planner.plan_fft_forward(cols);
        let col_fft = planner.plan_fft_forward(rows);

        let mut data = buffer.data;
        self.run(&mut data, rows, cols, occupied, row_fft, col_fft);

        Ok(Spectrum { data, rows, cols })
    }

    fn inverse(&self, spectrum: Spectrum<T>) -> OpsResult<PaddedBuffer<T>> {
        let (rows, cols) = spectrum.dims();
        let count = checked_area(rows, cols)?;
        trace!(rows, cols, "fft inverse");

        let n = T::from_usize(count).ok_or_else(|| {
            OpsError::TransformFailure(format!("scale 1/{} not representable", count))
        })?;
        let scale = T::one() / n;

        let mut planner = FftPlanner::<T>::new();
        let row_fft = planner.plan_fft_inverse(cols);
        let col_fft = planner.plan_fft_inverse(rows);

        let mut data = spectrum.data;
        self.run(&mut data, rows, cols, 0..rows, row_fft, col_fft);

        for v in data.iter_mut() {
            *v = *v * scale;
        }

        Ok(PaddedBuffer {
            data,
            rows,
            cols,
            occupied: 0..rows,
        })
    }
}

fn checked_area(rows: usize, cols: usize) -> OpsResult<usize> {
    if rows == 0 || cols == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "buffer must be non-empty, got {}x{}",
            rows, cols
        )));
    }
    rows.checked_mul(cols).ok_or_else(|| {
        OpsError::TransformFailure(format!("{}x{} buffer overflows", rows, cols))
    })
}

/// Runs `fft` over every `fft.len()`-long row of `data`.
fn process_rows<T: FftNum>(data: &mut [Complex<T>], fft: &Arc<dyn Fft<T>>, parallel: bool) {
    let width = fft.len();
    if data.is_empty() {
        return;
    }

    #[cfg(feature = "parallel")]
    {
        if parallel {
            data.par_chunks_mut(width).for_each_init(
                || vec![Complex::zero(); fft.get_inplace_scratch_len()],
                |scratch, row| fft.process_with_scratch(row, scratch),
            );
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    let mut scratch = vec![Complex::zero(); fft.get_inplace_scratch_len()];
    for row in data.chunks_exact_mut(width) {
        fft.process_with_scratch(row, &mut scratch);
    }
}

/// Transpose a `rows x cols` grid into `cols x rows`.
fn transpose<T: Copy + Send + Sync>(src: &[T], rows: usize, cols: usize, parallel: bool) -> Vec<T> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            let mut dst = src.to_vec();
            dst.par_chunks_mut(rows).enumerate().for_each(|(c, out)| {
                for (r, v) in out.iter_mut().enumerate() {
                    *v = src[r * cols + c];
                }
            });
            return dst;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    let mut dst = Vec::with_capacity(src.len());
    for c in 0..cols {
        for r in 0..rows {
            dst.push(src[r * cols + c]);
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ramp(rows: usize, cols: usize) -> Array2D<f64> {
        Array2D::from_fn(rows, cols, |r, c| ((r * 7 + c * 3) % 11) as f64 - 4.5)
    }

    #[test]
    fn test_roundtrip() {
        for parallel in [false, true] {
            let fft = RustFftTransform::new(parallel);
            for (rows, cols) in [(1, 1), (1, 7), (5, 1), (8, 8), (9, 12), (15, 6)] {
                let src = ramp(rows, cols);
                let buffer = PaddedBuffer::from_array(&src).unwrap();
                let back = fft.inverse(fft.forward(buffer).unwrap()).unwrap();
                for r in 0..rows {
                    for c in 0..cols {
                        assert_abs_diff_eq!(back.get(r, c).re, src[(r, c)], epsilon = 1e-10);
                        assert_abs_diff_eq!(back.get(r, c).im, 0.0, epsilon = 1e-10);
                    }
                }
            }
        }
    }

    #[test]
    fn test_dc_coefficient_is_sum() {
        let src = ramp(6, 10);
        let sum: f64 = src.iter().sum();
        let spectrum = RustFftTransform::default()
            .forward(PaddedBuffer::from_array(&src).unwrap())
            .unwrap();
        assert_abs_diff_eq!(spectrum.as_slice()[0].re, sum, epsilon = 1e-9);
    }

    #[test]
    fn test_skipping_zero_rows_matches_full() {
        let block = ramp(3, 4);
        let mut sparse = PaddedBuffer::<f64>::zeros(12, 10).unwrap();
        sparse.place(&block, Offset::new(2, 5)).unwrap();
        assert_eq!(sparse.occupied_rows(), 5..8);

        // same samples, every row declared occupied
        let (rows, cols, data) = sparse.clone().into_parts();
        let full = PaddedBuffer::from_parts(rows, cols, data).unwrap();

        let fft = RustFftTransform::new(false);
        let a = fft.forward(sparse).unwrap();
        let b = fft.forward(full).unwrap();
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert_abs_diff_eq!(x.re, y.re, epsilon = 1e-12);
            assert_abs_diff_eq!(x.im, y.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_dims_rejected() {
        let err = PaddedBuffer::<f32>::zeros(0, 4).unwrap_err();
        assert!(matches!(err, OpsError::InvalidDimensions(_)));

        let err = Spectrum::<f32>::from_parts(3, 0, Vec::new()).unwrap_err();
        assert!(matches!(err, OpsError::InvalidDimensions(_)));
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut buffer = PaddedBuffer::<f32>::zeros(4, 4).unwrap();
        let block = Array2D::filled(2, 3, 1.0f32);
        assert!(buffer.place(&block, Offset::new(1, 2)).is_ok());
        let err = buffer.place(&block, Offset::new(2, 2)).unwrap_err();
        assert!(matches!(err, OpsError::DimensionMismatch(_)));
    }

    #[test]
    fn test_occupied_union() {
        let mut buffer = PaddedBuffer::<f32>::zeros(10, 4).unwrap();
        assert!(buffer.occupied_rows().is_empty());
        buffer.place(&Array2D::filled(2, 2, 1.0f32), Offset::new(0, 6)).unwrap();
        buffer.place(&Array2D::filled(1, 2, 1.0f32), Offset::new(0, 1)).unwrap();
        assert_eq!(buffer.occupied_rows(), 1..8);
    }

    #[test]
    fn test_transpose() {
        let src: Vec<u32> = (0..6).collect();
        for parallel in [false, true] {
            assert_eq!(transpose(&src, 2, 3, parallel), vec![0, 3, 1, 4, 2, 5]);
        }
    }
}
