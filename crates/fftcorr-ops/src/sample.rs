//! Sample types accepted by the engine.
//!
//! The engine works on complex buffers internally. [`Sample`] describes how
//! an input sample enters such a buffer and how a result sample leaves it.
//! Real samples leave through the real part; the imaginary residue of a
//! real-only convolution is rounding noise and is dropped.

use rustfft::FftNum;
use rustfft::num_complex::Complex;

/// A scalar or complex sample that can be correlated.
pub trait Sample: Copy + Send + Sync + 'static {
    /// Underlying real type used by the transform.
    type Real: FftNum;

    /// Lifts the sample into the complex domain.
    fn to_complex(self) -> Complex<Self::Real>;

    /// Brings a complex result back to this sample type.
    fn from_complex(value: Complex<Self::Real>) -> Self;
}

macro_rules! impl_real_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                type Real = $t;

                #[inline]
                fn to_complex(self) -> Complex<$t> {
                    Complex::new(self, 0.0)
                }

                #[inline]
                fn from_complex(value: Complex<$t>) -> Self {
                    value.re
                }
            }

            impl Sample for Complex<$t> {
                type Real = $t;

                #[inline]
                fn to_complex(self) -> Complex<$t> {
                    self
                }

                #[inline]
                fn from_complex(value: Complex<$t>) -> Self {
                    value
                }
            }
        )*
    };
}

impl_real_sample!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_drops_imaginary() {
        let c = 2.5f64.to_complex();
        assert_eq!(c, Complex::new(2.5, 0.0));
        assert_eq!(f64::from_complex(Complex::new(1.0, 1e-12)), 1.0);
    }

    #[test]
    fn test_complex_passthrough() {
        let z = Complex::new(1.0f32, -2.0);
        assert_eq!(Complex::<f32>::from_complex(z.to_complex()), z);
    }
}
