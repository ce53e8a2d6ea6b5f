//! # fftcorr-core
//!
//! Core types for FFT-based convolution and correlation.
//!
//! - [`Array2D`] - Row-major 2D sample grid with explicit shape
//! - [`Error`] - Array construction failures
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. The engine lives in
//! `fftcorr-ops`:
//!
//! ```text
//! fftcorr-core (this crate)
//!    ^
//!    |
//!    +-- fftcorr-ops (planner, transform, combiner, extractor, engine)
//!    +-- fftcorr-bench (criterion benchmarks)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod array;
pub mod error;

pub use array::Array2D;
pub use error::{Error, Result};
