//! Spatial-domain convolution and correlation.
//!
//! Brute-force `O(N * K)` counterpart of the spectral engine with identical
//! output alignment and zero boundary conditions. Faster than the FFT path
//! for small kernels, and the reference the FFT path is tested against.
//!
//! For sample `(y, x)` of the output, with `(oy, ox)` the result offset from
//! [`layout::plan`](crate::layout::plan):
//!
//! ```text
//! convolve:  sum over (ky, kx) of image[y + oy - ky][x + ox - kx] * k[ky][kx]
//! correlate: sum over (ky, kx) of image[y + ky - ay][x + kx - ax] * conj(k[ky][kx])
//!            where a = K - 1 - o per axis
//! ```
//!
//! Out-of-range image samples count as zero. Conjugation is a no-op for
//! real samples.

use crate::config::PaddingPolicy;
use crate::layout::{self, Mode};
use crate::sample::Sample;
use crate::OpsResult;
use fftcorr_core::Array2D;
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;
use tracing::trace;

/// Direct convolution or correlation with "same"-size output.
///
/// # Example
///
/// ```rust
/// use fftcorr_core::Array2D;
/// use fftcorr_ops::direct::correlate_or_convolve_direct;
/// use fftcorr_ops::Mode;
///
/// let image = Array2D::from_rows(vec![vec![0.0, 1.0, 0.0]]).unwrap();
/// let kernel = Array2D::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
///
/// let conv = correlate_or_convolve_direct(&image, &kernel, Mode::Convolve).unwrap();
/// assert_eq!(conv.as_slice(), &[1.0, 2.0, 3.0]);
///
/// let corr = correlate_or_convolve_direct(&image, &kernel, Mode::Correlate).unwrap();
/// assert_eq!(corr.as_slice(), &[3.0, 2.0, 1.0]);
/// ```
pub fn correlate_or_convolve_direct<S: Sample>(
    image: &Array2D<S>,
    kernel: &Array2D<S>,
    mode: Mode,
) -> OpsResult<Array2D<S>> {
    trace!(
        image_rows = image.rows(),
        image_cols = image.cols(),
        kernel_rows = kernel.rows(),
        kernel_cols = kernel.cols(),
        ?mode,
        "correlate_or_convolve_direct"
    );

    let plan = layout::plan(image.dims(), kernel.dims(), mode, PaddingPolicy::Exact)?;
    let (rows, cols) = image.dims();
    let (krows, kcols) = kernel.dims();
    let (oy, ox) = (plan.result_offset.row as isize, plan.result_offset.col as isize);

    let img: Vec<Complex<S::Real>> = image.iter().map(|&v| v.to_complex()).collect();
    let ker: Vec<Complex<S::Real>> = kernel
        .iter()
        .map(|&v| match mode {
            Mode::Convolve => v.to_complex(),
            Mode::Correlate => v.to_complex().conj(),
        })
        .collect();

    // Image coordinate of kernel tap (ky, kx) for output (y, x).
    let source = |y: isize, x: isize, ky: isize, kx: isize| -> (isize, isize) {
        match mode {
            Mode::Convolve => (y + oy - ky, x + ox - kx),
            Mode::Correlate => {
                let ay = krows as isize - 1 - oy;
                let ax = kcols as isize - 1 - ox;
                (y + ky - ay, x + kx - ax)
            }
        }
    };

    let out = Array2D::from_fn(rows, cols, |y, x| {
        let mut acc = Complex::<S::Real>::zero();
        for ky in 0..krows {
            for kx in 0..kcols {
                let (sy, sx) = source(y as isize, x as isize, ky as isize, kx as isize);
                if sy < 0 || sx < 0 || sy >= rows as isize || sx >= cols as isize {
                    continue;
                }
                acc = acc + img[sy as usize * cols + sx as usize] * ker[ky * kcols + kx];
            }
        }
        S::from_complex(acc)
    });

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpsError;

    #[test]
    fn test_impulse_convolve_reproduces_kernel() {
        let mut image = Array2D::<f64>::zeros(5, 5);
        image[(2, 2)] = 1.0;
        let kernel = Array2D::from_fn(3, 3, |r, c| (r * 3 + c + 1) as f64);

        let out = correlate_or_convolve_direct(&image, &kernel, Mode::Convolve).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(out[(1 + r, 1 + c)], kernel[(r, c)]);
            }
        }
        assert_eq!(out[(0, 0)], 0.0);
    }

    #[test]
    fn test_impulse_correlate_reproduces_flipped_kernel() {
        let mut image = Array2D::<f64>::zeros(5, 5);
        image[(2, 2)] = 1.0;
        let kernel = Array2D::from_fn(3, 3, |r, c| (r * 3 + c + 1) as f64);
        let flipped = kernel.flipped();

        let out = correlate_or_convolve_direct(&image, &kernel, Mode::Correlate).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(out[(1 + r, 1 + c)], flipped[(r, c)]);
            }
        }
    }

    #[test]
    fn test_correlate_is_convolve_with_flipped_kernel() {
        let image = Array2D::from_fn(6, 7, |r, c| ((r * 5 + c * 3) % 7) as f64);
        for (kr, kc) in [(1, 1), (2, 3), (3, 3), (4, 2), (4, 4)] {
            let kernel = Array2D::from_fn(kr, kc, |r, c| (r * 10 + c) as f64 + 1.0);
            let corr = correlate_or_convolve_direct(&image, &kernel, Mode::Correlate).unwrap();
            let conv = correlate_or_convolve_direct(&image, &kernel.flipped(), Mode::Convolve)
                .unwrap();
            // integer-valued samples, so summation order cannot matter
            assert_eq!(corr, conv, "k = {}x{}", kr, kc);
        }
    }

    #[test]
    fn test_empty_rejected() {
        let image = Array2D::<f32>::zeros(0, 3);
        let kernel = Array2D::<f32>::zeros(1, 1);
        let err = correlate_or_convolve_direct(&image, &kernel, Mode::Convolve).unwrap_err();
        assert!(matches!(err, OpsError::InvalidDimensions(_)));
    }
}
