//! Padded buffer layout planning.
//!
//! Multiplying two spectra yields a *circular* convolution. To recover the
//! *linear* result the planner sizes the padded buffers so that no product
//! term wraps onto a sample that belongs to the output, and decides where
//! the image and kernel are written inside them.
//!
//! # Placement
//!
//! | Mode        | image offset (col, row)     | kernel offset | conjugate kernel |
//! |-------------|-----------------------------|---------------|------------------|
//! | `Convolve`  | `(0, 0)`                    | `(0, 0)`      | no               |
//! | `Correlate` | `(kcols - 1, krows - 1)`    | `(0, 0)`      | yes              |
//!
//! Conjugating the kernel spectrum reverses the *whole* padded kernel buffer
//! about index 0. A kernel occupying `[0, K)` ends up on `{0} U [P-K+1, P)`,
//! split across the wraparound seam. Shifting the image by `K - 1` moves
//! every contributing product back into one contiguous region. Leaving the
//! image at the origin instead rotates the whole result by `K - 1` per axis,
//! and no choice of extraction window can undo that.
//!
//! # Extraction
//!
//! The output has the image's shape. Per axis it starts at
//! [`result_axis_offset`]: `K / 2` for odd `K`, `K / 2 - 1` for even `K`,
//! for both modes.

use crate::config::PaddingPolicy;
use crate::{OpsError, OpsResult};
use tracing::{debug, trace};

/// Operation performed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Linear convolution (kernel flipped in both axes).
    Convolve,
    /// Linear cross-correlation (kernel slid without flipping).
    Correlate,
}

impl Mode {
    /// Whether the kernel spectrum is conjugated before combining.
    #[inline]
    pub fn conjugates_kernel(self) -> bool {
        matches!(self, Mode::Correlate)
    }

    /// Where the image's top-left sample goes in its padded buffer.
    #[inline]
    pub fn image_offset(self, kernel_rows: usize, kernel_cols: usize) -> Offset {
        match self {
            Mode::Convolve => Offset::ORIGIN,
            Mode::Correlate => {
                Offset::new(kernel_cols.saturating_sub(1), kernel_rows.saturating_sub(1))
            }
        }
    }
}

/// A `(column, row)` position inside a padded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset {
    /// Column (x).
    pub col: usize,
    /// Row (y).
    pub row: usize,
}

impl Offset {
    /// Top-left corner.
    pub const ORIGIN: Offset = Offset { col: 0, row: 0 };

    /// Creates an offset from column and row.
    #[inline]
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Complete buffer plan for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Mode the plan was made for.
    pub mode: Mode,
    /// Image rows.
    pub image_rows: usize,
    /// Image columns.
    pub image_cols: usize,
    /// Kernel rows.
    pub kernel_rows: usize,
    /// Kernel columns.
    pub kernel_cols: usize,
    /// Padded buffer rows.
    pub pad_rows: usize,
    /// Padded buffer columns.
    pub pad_cols: usize,
    /// Image placement.
    pub image_offset: Offset,
    /// Kernel placement.
    pub kernel_offset: Offset,
    /// First sample of the output inside the inverse-transformed buffer.
    pub result_offset: Offset,
}

impl Layout {
    /// Whether the combiner must conjugate the kernel spectrum.
    #[inline]
    pub fn conjugate_kernel(&self) -> bool {
        self.mode.conjugates_kernel()
    }

    /// Padded dimensions as `(rows, cols)`.
    #[inline]
    pub fn pad_dims(&self) -> (usize, usize) {
        (self.pad_rows, self.pad_cols)
    }
}

/// Plans buffer sizes and offsets.
///
/// `image` and `kernel` are `(rows, cols)`. Fails with
/// [`OpsError::InvalidDimensions`] on any zero extent and with
/// [`OpsError::TransformFailure`] when the padded size is not representable.
///
/// # Example
///
/// ```rust
/// use fftcorr_ops::layout::{plan, Mode, Offset};
/// use fftcorr_ops::config::PaddingPolicy;
///
/// let l = plan((6, 9), (4, 4), Mode::Correlate, PaddingPolicy::Exact).unwrap();
/// assert_eq!(l.pad_dims(), (9, 12));
/// assert_eq!(l.image_offset, Offset::new(3, 3));
/// assert_eq!(l.result_offset, Offset::new(1, 1));
/// ```
pub fn plan(
    image: (usize, usize),
    kernel: (usize, usize),
    mode: Mode,
    padding: PaddingPolicy,
) -> OpsResult<Layout> {
    let (image_rows, image_cols) = image;
    let (kernel_rows, kernel_cols) = kernel;
    trace!(image_rows, image_cols, kernel_rows, kernel_cols, ?mode, "layout::plan");

    if image_rows == 0 || image_cols == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "image must be non-empty, got {}x{}",
            image_rows, image_cols
        )));
    }
    if kernel_rows == 0 || kernel_cols == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "kernel must be non-empty, got {}x{}",
            kernel_rows, kernel_cols
        )));
    }

    let pad_rows = padded_extent(image_rows, kernel_rows, padding)?;
    let pad_cols = padded_extent(image_cols, kernel_cols, padding)?;
    pad_rows.checked_mul(pad_cols).ok_or_else(|| {
        OpsError::TransformFailure(format!("padded buffer {}x{} overflows", pad_rows, pad_cols))
    })?;
    debug!(pad_rows, pad_cols, ?padding, "Planned padded buffer");

    Ok(Layout {
        mode,
        image_rows,
        image_cols,
        kernel_rows,
        kernel_cols,
        pad_rows,
        pad_cols,
        image_offset: mode.image_offset(kernel_rows, kernel_cols),
        kernel_offset: Offset::ORIGIN,
        result_offset: Offset::new(
            result_axis_offset(kernel_cols),
            result_axis_offset(kernel_rows),
        ),
    })
}

/// Extraction offset along one axis for a kernel extent `k >= 1`.
#[inline]
pub fn result_axis_offset(k: usize) -> usize {
    if k % 2 == 1 { k / 2 } else { (k / 2).saturating_sub(1) }
}

/// Rounds `n >= 1` up according to `policy`, or `None` on overflow.
///
/// ```rust
/// use fftcorr_ops::layout::optimal_size;
/// use fftcorr_ops::config::PaddingPolicy;
///
/// assert_eq!(optimal_size(13, PaddingPolicy::Exact), Some(13));
/// assert_eq!(optimal_size(13, PaddingPolicy::PowerOfTwo), Some(16));
/// assert_eq!(optimal_size(13, PaddingPolicy::Smooth), Some(15));
/// ```
pub fn optimal_size(n: usize, policy: PaddingPolicy) -> Option<usize> {
    match policy {
        PaddingPolicy::Exact => Some(n),
        PaddingPolicy::PowerOfTwo => n.checked_next_power_of_two(),
        PaddingPolicy::Smooth => next_smooth(n.max(1)),
    }
}

/// Smallest `2^a * 3^b * 5^c >= n`.
///
/// Walks every `3^b * 5^c` below `n` and lifts it with the smallest power of
/// two that reaches `n`.
fn next_smooth(n: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut p5 = 1usize;
    loop {
        let mut p35 = p5;
        loop {
            let candidate = if p35 >= n {
                Some(p35)
            } else {
                n.div_ceil(p35)
                    .checked_next_power_of_two()
                    .and_then(|p2| p2.checked_mul(p35))
            };
            if let Some(c) = candidate {
                best = Some(best.map_or(c, |b| b.min(c)));
            }
            if p35 >= n {
                break;
            }
            match p35.checked_mul(3) {
                Some(next) => p35 = next,
                None => break,
            }
        }
        if p5 >= n {
            break;
        }
        match p5.checked_mul(5) {
            Some(next) => p5 = next,
            None => break,
        }
    }
    best
}

fn padded_extent(image: usize, kernel: usize, padding: PaddingPolicy) -> OpsResult<usize> {
    image
        .checked_add(kernel - 1)
        .and_then(|min| optimal_size(min, padding))
        .ok_or_else(|| {
            OpsError::TransformFailure(format!(
                "cannot pad extent {} + {} - 1 under {:?}",
                image, kernel, padding
            ))
        })
}
