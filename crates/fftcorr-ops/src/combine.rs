//! Point-wise spectrum multiplication.
//!
//! `combine(a, b, false)` multiplies coefficients, which is convolution in
//! the sample domain. `combine(a, b, true)` multiplies by the conjugate of
//! `b`, which reverses `b` about index 0 of its *padded* buffer.
//!
//! The conjugate flag is only correct together with the image placement
//! chosen by [`layout::plan`](crate::layout::plan). The engine derives it
//! from [`Mode`](crate::layout::Mode) and never takes it as an argument.

use crate::transform::Spectrum;
use crate::{OpsError, OpsResult};
use rustfft::FftNum;
use tracing::trace;

/// Multiplies `a` by `b` (or by `conj(b)`) element-wise.
///
/// Reuses `a`'s storage for the output. Fails with
/// [`OpsError::DimensionMismatch`] if the spectra differ in shape.
pub fn combine<T: FftNum>(
    a: Spectrum<T>,
    b: &Spectrum<T>,
    conjugate_b: bool,
) -> OpsResult<Spectrum<T>> {
    trace!(rows = a.rows, cols = a.cols, conjugate_b, "combine");

    if a.dims() != b.dims() {
        return Err(OpsError::DimensionMismatch(format!(
            "spectra {}x{} and {}x{} differ",
            a.rows, a.cols, b.rows, b.cols
        )));
    }

    let mut out = a;
    if conjugate_b {
        for (x, y) in out.data.iter_mut().zip(&b.data) {
            *x = *x * y.conj();
        }
    } else {
        for (x, y) in out.data.iter_mut().zip(&b.data) {
            *x = *x * *y;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::num_complex::Complex;

    fn spectrum(values: &[(f64, f64)]) -> Spectrum<f64> {
        let data = values.iter().map(|&(re, im)| Complex::new(re, im)).collect();
        Spectrum::from_parts(1, values.len(), data).unwrap()
    }

    #[test]
    fn test_plain_product() {
        let a = spectrum(&[(1.0, 2.0), (0.0, 1.0)]);
        let b = spectrum(&[(3.0, -1.0), (0.0, 1.0)]);
        let out = combine(a, &b, false).unwrap();
        assert_eq!(out.as_slice()[0], Complex::new(5.0, 5.0));
        assert_eq!(out.as_slice()[1], Complex::new(-1.0, 0.0));
    }

    #[test]
    fn test_conjugate_product() {
        let a = spectrum(&[(1.0, 2.0), (0.0, 1.0)]);
        let b = spectrum(&[(3.0, -1.0), (0.0, 1.0)]);
        let out = combine(a, &b, true).unwrap();
        assert_eq!(out.as_slice()[0], Complex::new(1.0, 7.0));
        assert_eq!(out.as_slice()[1], Complex::new(1.0, 0.0));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = spectrum(&[(1.0, 0.0); 4]);
        let b = Spectrum::from_parts(2, 2, vec![Complex::new(1.0, 0.0); 4]).unwrap();
        let err = combine(a, &b, false).unwrap_err();
        assert!(matches!(err, OpsError::DimensionMismatch(_)));
    }
}
