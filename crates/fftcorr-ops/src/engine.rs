//! Correlation engine.
//!
//! Runs one invocation through a fixed sequence of stages:
//!
//! ```text
//! Init -> Plan -> Place -> TransformImage -> TransformKernel
//!      -> Combine -> InverseTransform -> Extract -> Done
//! ```
//!
//! Any failure ends the invocation in [`Stage::Failed`]; nothing is retried.
//! Every input check happens in `Plan`, before a buffer is allocated.
//!
//! The engine owns no buffers between calls. One [`Engine`] can be shared by
//! any number of threads.
//!
//! # Example
//!
//! ```rust
//! use fftcorr_core::Array2D;
//! use fftcorr_ops::{correlate_or_convolve, Mode};
//!
//! let image = Array2D::from_fn(16, 16, |r, c| ((r + c) % 4) as f64);
//! let kernel = Array2D::filled(3, 3, 1.0 / 9.0);
//!
//! let blurred = correlate_or_convolve(&image, &kernel, Mode::Convolve).unwrap();
//! assert_eq!(blurred.dims(), (16, 16));
//! ```

use crate::combine::combine;
use crate::config::{EngineConfig, Method};
use crate::direct::correlate_or_convolve_direct;
use crate::extract::extract;
use crate::layout::{plan, Layout, Mode};
use crate::sample::Sample;
use crate::transform::{PaddedBuffer, RustFftTransform, SpectralTransform, Spectrum};
use crate::OpsResult;
use fftcorr_core::Array2D;
use tracing::{debug, trace};

/// Pipeline stage of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet.
    Init,
    /// Validating inputs and computing the [`Layout`].
    Plan,
    /// Writing image and kernel into zeroed padded buffers.
    Place,
    /// Forward transform of the image buffer.
    TransformImage,
    /// Forward transform of the kernel buffer.
    TransformKernel,
    /// Point-wise product of the spectra.
    Combine,
    /// Inverse transform of the product.
    InverseTransform,
    /// Copying the result window out.
    Extract,
    /// Success.
    Done,
    /// Terminal failure.
    Failed,
}

/// Convolution/correlation engine.
#[derive(Debug, Clone)]
pub struct Engine<X = RustFftTransform> {
    config: EngineConfig,
    transform: X,
}

impl Default for Engine<RustFftTransform> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine<RustFftTransform> {
    /// Creates an engine on the `rustfft` transform.
    pub fn new(config: EngineConfig) -> Self {
        let transform = RustFftTransform::new(config.parallel);
        Self { config, transform }
    }
}

impl<X> Engine<X> {
    /// Creates an engine on a custom transform.
    pub fn with_transform(config: EngineConfig, transform: X) -> Self {
        Self { config, transform }
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Convolves or correlates `image` with `kernel`.
    ///
    /// Output has the image's shape. See [`layout`](crate::layout) for the
    /// alignment rules.
    pub fn run<S: Sample>(
        &self,
        image: &Array2D<S>,
        kernel: &Array2D<S>,
        mode: Mode,
    ) -> OpsResult<Array2D<S>>
    where
        X: SpectralTransform<S::Real>,
    {
        trace!(
            image_rows = image.rows(),
            image_cols = image.cols(),
            kernel_rows = kernel.rows(),
            kernel_cols = kernel.cols(),
            ?mode,
            "correlate_or_convolve"
        );

        let method = self.config.resolve_method(kernel.rows(), kernel.cols());
        if self.config.method == Method::Auto {
            debug!(?method, kernel_rows = kernel.rows(), kernel_cols = kernel.cols(), "Auto method");
        }

        match method {
            Method::Direct => correlate_or_convolve_direct(image, kernel, mode),
            Method::Fft | Method::Auto => {
                let mut stage = Stage::Init;
                let result = self.run_spectral(image, kernel, mode, &mut stage);
                if let Err(err) = &result {
                    debug!(?stage, %err, "Correlation failed");
                    advance(&mut stage, Stage::Failed);
                }
                result
            }
        }
    }

    fn run_spectral<S: Sample>(
        &self,
        image: &Array2D<S>,
        kernel: &Array2D<S>,
        mode: Mode,
        stage: &mut Stage,
    ) -> OpsResult<Array2D<S>>
    where
        X: SpectralTransform<S::Real>,
    {
        advance(stage, Stage::Plan);
        let layout: Layout = plan(image.dims(), kernel.dims(), mode, self.config.padding)?;

        advance(stage, Stage::Place);
        let mut image_buf = PaddedBuffer::zeros(layout.pad_rows, layout.pad_cols)?;
        image_buf.place(image, layout.image_offset)?;
        let mut kernel_buf = PaddedBuffer::zeros(layout.pad_rows, layout.pad_cols)?;
        kernel_buf.place(kernel, layout.kernel_offset)?;

        let (image_spec, kernel_spec) = self.forward_pair(image_buf, kernel_buf, stage)?;

        advance(stage, Stage::Combine);
        let product = combine(image_spec, &kernel_spec, layout.conjugate_kernel())?;
        drop(kernel_spec);

        advance(stage, Stage::InverseTransform);
        let spatial = self.transform.inverse(product)?;

        advance(stage, Stage::Extract);
        let out = extract(&spatial, layout.result_offset, layout.image_rows, layout.image_cols)?;

        advance(stage, Stage::Done);
        Ok(out)
    }

    /// Forward-transforms both buffers, concurrently when enabled.
    fn forward_pair<T: rustfft::FftNum>(
        &self,
        image_buf: PaddedBuffer<T>,
        kernel_buf: PaddedBuffer<T>,
        stage: &mut Stage,
    ) -> OpsResult<(Spectrum<T>, Spectrum<T>)>
    where
        X: SpectralTransform<T>,
    {
        #[cfg(feature = "parallel")]
        {
            if self.config.use_parallel() {
                debug!("Forward transforms in parallel");
                advance(stage, Stage::TransformImage);
                let (image_spec, kernel_spec) = rayon::join(
                    || self.transform.forward(image_buf),
                    || self.transform.forward(kernel_buf),
                );
                let image_spec = image_spec?;
                advance(stage, Stage::TransformKernel);
                return Ok((image_spec, kernel_spec?));
            }
        }

        advance(stage, Stage::TransformImage);
        let image_spec = self.transform.forward(image_buf)?;
        advance(stage, Stage::TransformKernel);
        let kernel_spec = self.transform.forward(kernel_buf)?;
        Ok((image_spec, kernel_spec))
    }
}

#[inline]
fn advance(stage: &mut Stage, next: Stage) {
    trace!(from = ?*stage, to = ?next, "engine stage");
    *stage = next;
}

/// Convolves or correlates with a default [`Engine`].
pub fn correlate_or_convolve<S: Sample>(
    image: &Array2D<S>,
    kernel: &Array2D<S>,
    mode: Mode,
) -> OpsResult<Array2D<S>> {
    Engine::new(EngineConfig::default()).run(image, kernel, mode)
}

/// Linear convolution, output the size of `image`.
pub fn convolve<S: Sample>(image: &Array2D<S>, kernel: &Array2D<S>) -> OpsResult<Array2D<S>> {
    correlate_or_convolve(image, kernel, Mode::Convolve)
}

/// Linear cross-correlation, output the size of `image`.
pub fn correlate<S: Sample>(image: &Array2D<S>, kernel: &Array2D<S>) -> OpsResult<Array2D<S>> {
    correlate_or_convolve(image, kernel, Mode::Correlate)
}
