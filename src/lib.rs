//! # sortxfer
//!
//! Color transfer by sorting: recolor a *target* image with the palette of a
//! *source* image by solving a one-dimensional optimal transport problem.
//!
//! ## The Problem
//!
//! Two images with the same number of pixels are two point clouds in RGB space.
//! Matching every target pixel to a distinct source pixel at minimum total cost
//! is an assignment problem: O(n³) exactly, hopeless for megapixel images.
//!
//! In one dimension the problem is trivial. Sort both sets and match them rank by
//! rank; that pairing is optimal for any convex cost. So we pick a direction `u`
//! in RGB space, sort both images by `<pixel, u>`, and pair ranks. Different
//! directions give different pairings; we search for the one whose pairing has
//! the lowest squared RGB cost, then write each source color into the position of
//! its rank-matched target pixel.
//!
//! ## Key Functions
//!
//! | Function | Use Case | Complexity |
//! |----------|----------|------------|
//! | [`transport_cost`] | Cost of the rank pairing along one direction | O(n log n) |
//! | [`search`] | Find a low-cost direction (sweep or sampling) | O(k · n log n) |
//! | [`transfer`] | Rebuild the target layout with source colors | O(n log n) |
//! | [`recolor`] | `search` followed by `transfer` | O(k · n log n) |
//!
//! ## Quick Start
//!
//! ```rust
//! use sortxfer::{recolor, PixelSet, SearchConfig};
//!
//! let target = PixelSet::from_rgb(&[[0, 0, 0], [200, 200, 200], [90, 90, 90]]);
//! let source = PixelSet::from_rgb(&[[250, 10, 10], [20, 0, 0], [120, 5, 5]]);
//!
//! let out = recolor(&target, &source, &SearchConfig::axis_sweep()).unwrap();
//!
//! // Darkest target pixel receives the darkest source color, and so on.
//! assert_eq!(out.pixels.to_rgb(), vec![[20, 0, 0], [250, 10, 10], [120, 5, 5]]);
//! ```
//!
//! ## What Can Go Wrong
//!
//! 1. **Different pixel counts**: the engine pairs pixels one to one. Crop or
//!    resize first (see [`raster::reconcile`]).
//! 2. **Local minimum**: the axis sweep stops at the first angle that does not
//!    improve the cost. It is a heuristic, not a global search.
//! 3. **Few trials**: random sampling with a small trial count is noisy. Fix a
//!    seed to make it reproducible.
//! 4. **Perceptual mismatch**: cost is plain squared RGB distance (optionally
//!    channel weighted). No color-space conversion happens.
//!
//! ## References
//!
//! - Pitié, Kokaram, Dahyot (2005). "N-Dimensional Probability Density Function
//!   Transfer and its Application to Colour Transfer"
//! - Rabin, Peyré, Delon, Bernot (2012). "Wasserstein Barycenter and Its
//!   Application to Texture Mixing"
//! - Peyré & Cuturi (2019). "Computational Optimal Transport", §2.6

use ndarray::{Array1, Array2, Axis};
use thiserror::Error;

pub mod assign;
pub mod cost;
pub mod raster;
pub mod search;

pub use assign::{recolor, transfer, Recolored};
pub use cost::{projection_order, sort_by_direction, transport_cost, ChannelWeights};
pub use search::{search, sweep_axis, AxisSweep, SampleRange, SearchConfig, SearchOutcome, Strategy};

/// Color transfer error variants.
#[derive(Debug, Error)]
pub enum Error {
    /// Pixel sets have different lengths.
    #[error("pixel sets have different lengths: {0} vs {1}")]
    LengthMismatch(usize, usize),

    /// A pixel set is empty.
    #[error("pixel set is empty")]
    EmptyInput,

    /// Random sampling was asked to draw no directions.
    #[error("trial count must be at least 1, got {0}")]
    InvalidTrialCount(usize),

    /// Symmetric sampling extent is not finite or below
    /// [`search::MIN_SAMPLE_EXTENT`].
    #[error("sampling extent must be finite and at least 1e-6, got {0}")]
    InvalidSampleRange(f64),

    /// Direction is the zero vector or has non-finite components.
    #[error("direction must be finite and non-zero")]
    DegenerateDirection,

    /// Channel weights must be finite and non-negative.
    #[error("channel weights must be finite and non-negative, got ({0}, {1}, {2})")]
    InvalidChannelWeights(f64, f64, f64),

    /// Pixel array does not have exactly three channels.
    #[error("pixel array must have 3 channels, got {0}")]
    ChannelCount(usize),

    /// Images cannot be paired pixel for pixel.
    #[error(
        "images must have the same number of pixels: target {}x{}, source {}x{}",
        .target_dims.0, .target_dims.1, .source_dims.0, .source_dims.1
    )]
    PixelCountMismatch {
        /// Target (width, height).
        target_dims: (u32, u32),
        /// Source (width, height).
        source_dims: (u32, u32),
    },

    /// Image decoding or encoding failed.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Result type for color transfer operations.
pub type Result<T> = std::result::Result<T, Error>;

const EPSILON: f64 = 1e-12;

/// An 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// An ordered set of RGB pixels, stored as an `n × 3` array (one row per pixel).
///
/// Channels are kept as `f64`. Values outside `0..=255` are tolerated by the
/// engine; only [`PixelSet::to_rgb`] clamps.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSet {
    data: Array2<f64>,
}

impl PixelSet {
    /// Build a pixel set from 8-bit RGB triples.
    pub fn from_rgb(pixels: &[Rgb]) -> Self {
        let data = Array2::from_shape_fn((pixels.len(), 3), |(i, c)| f64::from(pixels[i][c]));
        Self { data }
    }

    /// Wrap an `n × 3` array.
    pub fn from_array(data: Array2<f64>) -> Result<Self> {
        if data.ncols() != 3 {
            return Err(Error::ChannelCount(data.ncols()));
        }
        Ok(Self { data })
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Returns `true` if there are no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// The underlying `n × 3` array.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    /// Channels of pixel `i`.
    ///
    /// Panics if `i >= len()`.
    pub fn pixel(&self, i: usize) -> [f64; 3] {
        let row = self.data.row(i);
        [row[0], row[1], row[2]]
    }

    /// Convert back to 8-bit RGB, rounding and clamping each channel.
    pub fn to_rgb(&self) -> Vec<Rgb> {
        self.data
            .rows()
            .into_iter()
            .map(|row| [to_u8(row[0]), to_u8(row[1]), to_u8(row[2])])
            .collect()
    }

    /// Pixels reordered so that row `k` of the result is row `order[k]` of `self`.
    ///
    /// Panics if an index is out of bounds.
    pub fn select(&self, order: &[usize]) -> PixelSet {
        Self {
            data: self.data.select(Axis(0), order),
        }
    }

    /// Scalar projection of every pixel onto `direction`.
    pub(crate) fn project(&self, direction: &Direction) -> Array1<f64> {
        self.data.dot(&direction.to_array1())
    }
}

impl From<&[Rgb]> for PixelSet {
    fn from(pixels: &[Rgb]) -> Self {
        Self::from_rgb(pixels)
    }
}

#[inline]
fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// A projection axis in RGB space.
///
/// Always finite and non-zero. Length is irrelevant for sorting (positive
/// scaling preserves the order) so directions are not normalized on creation.
///
/// A vector whose Euclidean norm is below `1e-12` counts as zero: its
/// projections would be lost in rounding, and [`Direction::normalized`] would
/// divide by it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction([f64; 3]);

impl Direction {
    /// Create a direction from its components.
    pub fn new(r: f64, g: f64, b: f64) -> Result<Self> {
        Self::from_array([r, g, b])
    }

    /// Create a direction from an array of components.
    ///
    /// # Errors
    ///
    /// [`Error::DegenerateDirection`] if a component is not finite or the norm
    /// is below `1e-12`.
    pub fn from_array(v: [f64; 3]) -> Result<Self> {
        if v.iter().any(|c| !c.is_finite()) {
            return Err(Error::DegenerateDirection);
        }
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if norm < EPSILON {
            return Err(Error::DegenerateDirection);
        }
        Ok(Self(v))
    }

    /// Unit vector along channel `axis` (0 = red, 1 = green, 2 = blue).
    ///
    /// Panics if `axis >= 3`.
    pub fn axis(axis: usize) -> Self {
        assert!(axis < 3, "axis must be 0, 1 or 2");
        let mut v = [0.0; 3];
        v[axis] = 1.0;
        Self(v)
    }

    /// Components `[r, g, b]`.
    pub fn components(&self) -> [f64; 3] {
        self.0
    }

    /// Euclidean length.
    pub fn norm(&self) -> f64 {
        let [x, y, z] = self.0;
        (x * x + y * y + z * z).sqrt()
    }

    /// Same direction with unit length.
    pub fn normalized(&self) -> Self {
        let n = self.norm();
        Self([self.0[0] / n, self.0[1] / n, self.0[2] / n])
    }

    pub(crate) fn to_array1(self) -> Array1<f64> {
        Array1::from(self.0.to_vec())
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "({r:.2}, {g:.2}, {b:.2})")
    }
}
