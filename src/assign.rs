//! Assignment: write source colors into target positions.
//!
//! Given a direction, rank `k` of the sorted source is placed wherever rank `k`
//! of the sorted target came from:
//!
//! ```text
//! out[restore[k]] = source[order[k]]    for k in 0..n
//! ```
//!
//! `restore` is the projection order of the target. It is a permutation, so
//! every output position is written exactly once.

use crate::cost::projection_order;
use crate::search::{search, SearchConfig, SearchOutcome};
use crate::{Direction, Error, PixelSet, Result};
use ndarray::Array2;

/// Output of [`recolor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recolored {
    /// Recolored target, same length and layout as the input target.
    pub pixels: PixelSet,
    /// How the direction was chosen.
    pub outcome: SearchOutcome,
}

/// Recolor `target` with the colors of `source`, paired along `direction`.
///
/// The result has the target's length and layout and is a rearrangement of the
/// source pixels.
///
/// # Errors
///
/// - [`Error::LengthMismatch`] if the sets differ in length
/// - [`Error::EmptyInput`] if they are empty
///
/// # Example
///
/// ```rust
/// use sortxfer::{transfer, Direction, PixelSet};
///
/// let target = PixelSet::from_rgb(&[[200, 0, 0], [10, 0, 0], [90, 0, 0]]);
/// let source = PixelSet::from_rgb(&[[0, 0, 5], [0, 0, 250], [0, 0, 60]]);
/// let out = transfer(&target, &source, &Direction::new(1.0, 0.0, 1.0).unwrap()).unwrap();
/// assert_eq!(out.to_rgb(), vec![[0, 0, 250], [0, 0, 5], [0, 0, 60]]);
/// ```
pub fn transfer(target: &PixelSet, source: &PixelSet, direction: &Direction) -> Result<PixelSet> {
    if target.len() != source.len() {
        return Err(Error::LengthMismatch(target.len(), source.len()));
    }
    let restore = projection_order(target, direction)?;
    let order = projection_order(source, direction)?;

    let src = source.as_array();
    let mut out = Array2::zeros((target.len(), 3));
    for (&dst, &from) in restore.iter().zip(order.iter()) {
        out.row_mut(dst).assign(&src.row(from));
    }
    PixelSet::from_array(out)
}

/// Search for a direction, then [`transfer`] along it.
///
/// # Errors
///
/// Everything [`search`] and [`transfer`] can return.
pub fn recolor(target: &PixelSet, source: &PixelSet, config: &SearchConfig) -> Result<Recolored> {
    let outcome = search(target, source, config)?;
    let pixels = transfer(target, source, &outcome.direction)?;
    Ok(Recolored { pixels, outcome })
}
