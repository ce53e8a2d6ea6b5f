//! # fftcorr-ops
//!
//! 2D linear convolution and cross-correlation through the FFT.
//!
//! Results match direct spatial-domain convolution/correlation with zero
//! boundary conditions, in `O(N log N)` instead of `O(N * K)`.
//!
//! # Modules
//!
//! - [`layout`] - Padded sizes, placement and extraction offsets
//! - [`transform`] - Forward/inverse 2D DFT over padded buffers
//! - [`combine`] - Point-wise spectrum product
//! - [`extract`] - Linear result window
//! - [`engine`] - Orchestration
//! - [`direct`] - Spatial brute force
//! - [`config`] - Engine options
//!
//! # Example
//!
//! ```rust
//! use fftcorr_core::Array2D;
//! use fftcorr_ops::{convolve, correlate};
//!
//! let image = Array2D::from_fn(6, 9, |r, c| if r >= 3 && c >= 3 { 1.0 } else { 0.0 });
//! let kernel = Array2D::from_fn(4, 4, |r, c| (10 * (r + 1) + c + 1) as f64);
//!
//! let conv = convolve(&image, &kernel).unwrap();
//! let corr = correlate(&image, &kernel).unwrap();
//! assert_eq!(conv.dims(), (6, 9));
//! assert_ne!(conv, corr);
//! ```
//!
//! # Logging
//!
//! Operations emit `tracing` events (`trace!` per call and per engine stage,
//! `debug!` for planning decisions). Install a subscriber in the host to see
//! them.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod combine;
pub mod config;
pub mod direct;
pub mod engine;
pub mod extract;
pub mod layout;
pub mod sample;
pub mod transform;

#[cfg(feature = "parallel")]
pub mod batch;

pub use config::{EngineConfig, Method, PaddingPolicy};
pub use engine::{convolve, correlate, correlate_or_convolve, Engine, Stage};
pub use error::{OpsError, OpsResult};
pub use layout::{Layout, Mode, Offset};
pub use sample::Sample;
pub use transform::{PaddedBuffer, RustFftTransform, SpectralTransform, Spectrum};

pub use fftcorr_core::Array2D;
