//! Engine configuration.
//!
//! # Example
//!
//! ```rust
//! use fftcorr_ops::config::{EngineConfig, Method, PaddingPolicy};
//!
//! let config = EngineConfig::default()
//!     .with_padding(PaddingPolicy::PowerOfTwo)
//!     .with_method(Method::Auto)
//!     .with_parallel(false);
//! assert_eq!(config.padding, PaddingPolicy::PowerOfTwo);
//! ```
//!
//! With the `serde` feature the config deserializes from any serde format;
//! missing fields fall back to [`EngineConfig::default`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How far padded buffers are rounded up beyond the minimum
/// `image + kernel - 1` extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PaddingPolicy {
    /// Minimum extent, no rounding.
    Exact,
    /// Next power of two.
    PowerOfTwo,
    /// Next `2^a * 3^b * 5^c` size.
    #[default]
    Smooth,
}

/// Which algorithm computes the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Method {
    /// Spectral pipeline.
    #[default]
    Fft,
    /// Spatial brute force.
    Direct,
    /// Direct for kernels up to [`EngineConfig::direct_threshold`] samples,
    /// FFT above.
    Auto,
}

/// Engine options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Padded buffer rounding.
    pub padding: PaddingPolicy,
    /// Algorithm selection.
    pub method: Method,
    /// Largest kernel area (rows * cols) that [`Method::Auto`] runs directly.
    pub direct_threshold: usize,
    /// Run the two forward transforms concurrently and parallelize rows.
    /// Ignored without the `parallel` feature.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            padding: PaddingPolicy::Smooth,
            method: Method::Fft,
            direct_threshold: 49,
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Sets the padding policy.
    pub fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the algorithm.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the [`Method::Auto`] cutover.
    pub fn with_direct_threshold(mut self, threshold: usize) -> Self {
        self.direct_threshold = threshold;
        self
    }

    /// Enables or disables parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Resolves [`Method::Auto`] for a kernel of `kernel_rows x kernel_cols`.
    pub fn resolve_method(&self, kernel_rows: usize, kernel_cols: usize) -> Method {
        match self.method {
            Method::Auto => {
                if kernel_rows.saturating_mul(kernel_cols) <= self.direct_threshold {
                    Method::Direct
                } else {
                    Method::Fft
                }
            }
            m => m,
        }
    }

    /// Whether parallel execution is both requested and compiled in.
    #[inline]
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn use_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.padding, PaddingPolicy::Smooth);
        assert_eq!(c.method, Method::Fft);
        assert_eq!(c.direct_threshold, 49);
        assert!(c.parallel);
    }

    #[test]
    fn test_resolve_auto() {
        let c = EngineConfig::default().with_method(Method::Auto);
        assert_eq!(c.resolve_method(7, 7), Method::Direct);
        assert_eq!(c.resolve_method(8, 7), Method::Fft);
        assert_eq!(c.resolve_method(usize::MAX, 2), Method::Fft);

        let c = c.with_direct_threshold(0);
        assert_eq!(c.resolve_method(1, 1), Method::Fft);
    }

    #[test]
    fn test_resolve_explicit() {
        let c = EngineConfig::default().with_method(Method::Direct);
        assert_eq!(c.resolve_method(100, 100), Method::Direct);
        let c = c.with_method(Method::Fft);
        assert_eq!(c.resolve_method(1, 1), Method::Fft);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_yaml_partial() {
        let c: EngineConfig = serde_yaml::from_str("padding: power_of_two\nmethod: auto\n").unwrap();
        assert_eq!(c.padding, PaddingPolicy::PowerOfTwo);
        assert_eq!(c.method, Method::Auto);
        assert_eq!(c.direct_threshold, 49);
        assert!(c.parallel);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_yaml_roundtrip() {
        let c = EngineConfig::default()
            .with_padding(PaddingPolicy::Exact)
            .with_parallel(false);
        let text = serde_yaml::to_string(&c).unwrap();
        let back: EngineConfig = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, c);
    }
}
