//! Parallel execution of independent invocations using Rayon.
//!
//! Each job gets its own padded and spectrum buffers; the only thing jobs
//! share is the immutable [`Engine`].
//!
//! # Example
//!
//! ```rust
//! use fftcorr_core::Array2D;
//! use fftcorr_ops::batch::{run_batch, Job};
//! use fftcorr_ops::{Engine, EngineConfig, Mode};
//!
//! let jobs: Vec<Job<f32>> = (1..5)
//!     .map(|k| Job::new(Array2D::filled(32, 32, 1.0), Array2D::filled(k, k, 1.0), Mode::Correlate))
//!     .collect();
//!
//! let results = run_batch(&Engine::new(EngineConfig::default()), &jobs);
//! assert_eq!(results.len(), 4);
//! assert!(results.iter().all(|r| r.is_ok()));
//! ```

use crate::engine::Engine;
use crate::layout::Mode;
use crate::sample::Sample;
use crate::transform::SpectralTransform;
use crate::OpsResult;
use fftcorr_core::Array2D;
use rayon::prelude::*;
use tracing::debug;

/// One image/kernel pair and what to do with it.
#[derive(Debug, Clone)]
pub struct Job<S> {
    /// Image operand.
    pub image: Array2D<S>,
    /// Kernel operand.
    pub kernel: Array2D<S>,
    /// Convolve or correlate.
    pub mode: Mode,
}

impl<S> Job<S> {
    /// Creates a job.
    pub fn new(image: Array2D<S>, kernel: Array2D<S>, mode: Mode) -> Self {
        Self { image, kernel, mode }
    }
}

/// Runs every job in parallel.
///
/// Results come back in job order. A failing job does not affect the others.
pub fn run_batch<S, X>(engine: &Engine<X>, jobs: &[Job<S>]) -> Vec<OpsResult<Array2D<S>>>
where
    S: Sample,
    X: SpectralTransform<S::Real>,
{
    debug!(jobs = jobs.len(), "Running correlation batch");
    jobs.par_iter()
        .map(|job| engine.run(&job.image, &job.kernel, job.mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::direct::correlate_or_convolve_direct;
    use crate::OpsError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_batch_matches_sequential() {
        let engine = Engine::new(EngineConfig::default());
        let jobs: Vec<Job<f64>> = (0..8)
            .map(|i| {
                let image = Array2D::from_fn(10 + i, 9, |r, c| ((r * 3 + c + i) % 7) as f64);
                let kernel = Array2D::from_fn(1 + i % 4, 2 + i % 3, |r, c| (r + c) as f64 - 1.0);
                let mode = if i % 2 == 0 { Mode::Convolve } else { Mode::Correlate };
                Job::new(image, kernel, mode)
            })
            .collect();

        let results = run_batch(&engine, &jobs);
        for (job, result) in jobs.iter().zip(results) {
            let got = result.unwrap();
            let want = correlate_or_convolve_direct(&job.image, &job.kernel, job.mode).unwrap();
            for (a, b) in got.iter().zip(want.iter()) {
                assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_failures_are_isolated() {
        let jobs = vec![
            Job::new(Array2D::filled(4, 4, 1.0f64), Array2D::filled(2, 2, 1.0), Mode::Convolve),
            Job::new(Array2D::zeros(0, 4), Array2D::filled(2, 2, 1.0), Mode::Convolve),
            Job::new(Array2D::filled(4, 4, 1.0f64), Array2D::filled(3, 3, 1.0), Mode::Correlate),
        ];
        let results = run_batch(&Engine::new(EngineConfig::default()), &jobs);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(OpsError::InvalidDimensions(_))));
        assert!(results[2].is_ok());
    }
}
