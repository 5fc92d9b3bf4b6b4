//! Transport cost of a rank pairing along one direction.
//!
//! Projecting both pixel sets onto a direction `u` and sorting them gives a
//! one-to-one pairing by rank. Its cost is
//!
//! \[
//! C(u) = \sum_{k} \sum_{c \in \{r,g,b\}} w_c \, (a_{\sigma(k),c} - b_{\tau(k),c})^2
//! \]
//!
//! where `σ` and `τ` are the projection orders of `a` and `b`. Note the cost is
//! measured in full RGB, not along `u`: the direction only decides who is paired
//! with whom.

use crate::{Direction, Error, PixelSet, Result};

/// Per-channel weights applied to squared differences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelWeights {
    /// Red weight.
    pub r: f64,
    /// Green weight.
    pub g: f64,
    /// Blue weight.
    pub b: f64,
}

impl ChannelWeights {
    /// Plain squared RGB distance.
    pub const UNIFORM: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Rough luminance weighting (0.3, 0.58, 0.12).
    pub const LUMINANCE: Self = Self {
        r: 0.3,
        g: 0.58,
        b: 0.12,
    };

    /// Create weights, rejecting negative or non-finite values.
    pub fn new(r: f64, g: f64, b: f64) -> Result<Self> {
        let ok = |w: f64| w.is_finite() && w >= 0.0;
        if !(ok(r) && ok(g) && ok(b)) {
            return Err(Error::InvalidChannelWeights(r, g, b));
        }
        Ok(Self { r, g, b })
    }

    #[inline]
    fn weigh(&self, p: [f64; 3], q: [f64; 3]) -> f64 {
        let dr = p[0] - q[0];
        let dg = p[1] - q[1];
        let db = p[2] - q[2];
        self.r * dr * dr + self.g * dg * dg + self.b * db * db
    }
}

impl Default for ChannelWeights {
    fn default() -> Self {
        Self::UNIFORM
    }
}

/// Indices that sort `pixels` by their projection onto `direction`.
///
/// The sort is stable: pixels with equal projections keep their original
/// relative order, so the result is fully determined by the inputs.
///
/// # Example
///
/// ```rust
/// use sortxfer::{projection_order, Direction, PixelSet};
///
/// let px = PixelSet::from_rgb(&[[9, 0, 0], [1, 5, 0], [4, 0, 0]]);
/// let order = projection_order(&px, &Direction::axis(0)).unwrap();
/// assert_eq!(order, vec![1, 2, 0]);
/// ```
pub fn projection_order(pixels: &PixelSet, direction: &Direction) -> Result<Vec<usize>> {
    if pixels.is_empty() {
        return Err(Error::EmptyInput);
    }
    let proj = pixels.project(direction);
    let mut order: Vec<usize> = (0..pixels.len()).collect();
    order.sort_by(|&i, &j| proj[i].total_cmp(&proj[j]));
    Ok(order)
}

/// Sorted copy of `pixels` along `direction`, plus the order that produced it.
pub fn sort_by_direction(pixels: &PixelSet, direction: &Direction) -> Result<(PixelSet, Vec<usize>)> {
    let order = projection_order(pixels, direction)?;
    Ok((pixels.select(&order), order))
}

/// Cost of pairing `a` and `b` rank by rank along `direction`.
///
/// # Errors
///
/// - [`Error::LengthMismatch`] if the sets differ in length
/// - [`Error::EmptyInput`] if they are empty
///
/// # Example
///
/// ```rust
/// use sortxfer::{transport_cost, ChannelWeights, Direction, PixelSet};
///
/// let a = PixelSet::from_rgb(&[[0, 0, 0], [10, 10, 10]]);
/// let b = PixelSet::from_rgb(&[[10, 10, 10], [0, 0, 0]]);
/// let c = transport_cost(&a, &b, &Direction::axis(0), ChannelWeights::UNIFORM).unwrap();
/// assert_eq!(c, 0.0);
/// ```
pub fn transport_cost(
    a: &PixelSet,
    b: &PixelSet,
    direction: &Direction,
    weights: ChannelWeights,
) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch(a.len(), b.len()));
    }
    let (order_a, order_b) = both_orders(a, b, direction)?;

    let total = order_a
        .iter()
        .zip(order_b.iter())
        .map(|(&i, &j)| weights.weigh(a.pixel(i), b.pixel(j)))
        .sum();
    Ok(total)
}

#[cfg(not(feature = "parallel"))]
fn both_orders(a: &PixelSet, b: &PixelSet, direction: &Direction) -> Result<(Vec<usize>, Vec<usize>)> {
    Ok((projection_order(a, direction)?, projection_order(b, direction)?))
}

#[cfg(feature = "parallel")]
fn both_orders(a: &PixelSet, b: &PixelSet, direction: &Direction) -> Result<(Vec<usize>, Vec<usize>)> {
    let (oa, ob) = rayon::join(
        || projection_order(a, direction),
        || projection_order(b, direction),
    );
    Ok((oa?, ob?))
}
