//! Direction search.
//!
//! Every direction `u` induces a rank pairing between target and source pixels
//! (see [`crate::cost`]). This module looks for a `u` with low pairing cost.
//! Two strategies:
//!
//! - **Axis sweep** (deterministic). Three greedy 1D searches. Sweep `k` holds
//!   component `k` at zero and rotates within the other two: from the lower
//!   channel's unit vector toward the higher one (`g→b`, `r→b`, `r→g`), one
//!   degree at a time, stopping at the first angle that does not lower the
//!   cost. The three winning vectors are summed and normalized.
//! - **Random sampling**. Draw directions with uniformly distributed
//!   components from a seeded [`ChaCha8Rng`] and keep the cheapest.
//!
//! Neither strategy is a global optimizer. The sweep assumes the cost is
//! unimodal in the swept angle and can stop early at a local minimum; sampling
//! is only as good as its trial count.
//!
//! # Quality
//!
//! Both strategies report `min / max` over the costs they evaluated. It says
//! how much the choice of direction mattered for this pair of images (close to
//! 1: all directions were about as good), not how close the result is to
//! optimal.

use crate::cost::{transport_cost, ChannelWeights};
use crate::{Direction, Error, PixelSet, Result, EPSILON};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Uniform};

/// Largest angle (degrees) visited by an axis sweep.
pub const MAX_SWEEP_ANGLE: u32 = 90;

/// Default number of random directions.
pub const DEFAULT_TRIALS: usize = 20;

/// Smallest accepted [`SampleRange::Symmetric`] extent. Narrower ranges would
/// make almost every draw a degenerate direction.
pub const MIN_SAMPLE_EXTENT: f64 = 1e-6;

/// Range of each component of a randomly drawn direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleRange {
    /// Uniform over `[-extent / 2, extent / 2)`; covers every orientation.
    /// `extent` must be finite and at least [`MIN_SAMPLE_EXTENT`].
    Symmetric(f64),
    /// Uniform over `[0, 1)`; only the positive octant.
    UnitPositive,
}

impl SampleRange {
    fn distribution(self) -> Result<Uniform<f64>> {
        match self {
            SampleRange::Symmetric(extent) => {
                if !(extent.is_finite() && extent >= MIN_SAMPLE_EXTENT) {
                    return Err(Error::InvalidSampleRange(extent));
                }
                Ok(Uniform::new(-extent / 2.0, extent / 2.0))
            }
            SampleRange::UnitPositive => Ok(Uniform::new(0.0, 1.0)),
        }
    }
}

impl Default for SampleRange {
    fn default() -> Self {
        SampleRange::Symmetric(1000.0)
    }
}

/// How to look for a direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Greedy sweep of three rotation planes, one degree at a time.
    AxisSweep,
    /// Best of `trials` random directions (plus one initial draw).
    RandomSampling {
        /// Number of directions drawn after the initial one.
        trials: usize,
        /// Component range.
        range: SampleRange,
    },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::AxisSweep
    }
}

/// Configuration for [`search`].
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// Search strategy.
    pub strategy: Strategy,
    /// Weights applied to squared channel differences.
    pub channel_weights: ChannelWeights,
    /// RNG seed for random sampling. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl SearchConfig {
    /// Deterministic axis sweep with uniform weights.
    pub fn axis_sweep() -> Self {
        Self::default()
    }

    /// Random sampling with `trials` draws over the default range.
    pub fn random_sampling(trials: usize) -> Self {
        Self {
            strategy: Strategy::RandomSampling {
                trials,
                range: SampleRange::default(),
            },
            ..Self::default()
        }
    }

    /// Fix the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Weight the squared channel differences.
    pub fn with_channel_weights(mut self, weights: ChannelWeights) -> Self {
        self.channel_weights = weights;
        self
    }

    /// Set the sampling range. No effect on the axis sweep.
    pub fn with_range(mut self, range: SampleRange) -> Self {
        if let Strategy::RandomSampling { range: r, .. } = &mut self.strategy {
            *r = range;
        }
        self
    }
}

/// Result of a direction search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Chosen direction.
    pub direction: Direction,
    /// Transport cost along `direction`.
    pub cost: f64,
    /// `min / max` over the evaluated costs, in `[0, 1]`.
    pub quality: f64,
    /// Number of cost evaluations performed.
    pub evaluations: usize,
    /// Per-axis records (axis sweep only; empty for sampling).
    pub sweeps: Vec<AxisSweep>,
}

/// Record of one greedy rotation sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSweep {
    /// Channel held at zero (0 = red, 1 = green, 2 = blue).
    pub axis: usize,
    /// Cost at 0°, i.e. along the lower of the two swept channels.
    pub baseline_cost: f64,
    /// Last angle (degrees) that lowered the cost; 0 if none did.
    pub best_angle: u32,
    /// Cost at `best_angle`.
    pub best_cost: f64,
    /// Direction at `best_angle`.
    pub best_direction: Direction,
    /// Every evaluated cost in angle order, baseline first. If the sweep
    /// stopped early the last entry is the non-improving one.
    pub costs: Vec<f64>,
}

/// Sweep the rotation plane perpendicular to `e_axis`.
///
/// With `i < j` the two other channels, the sweep visits
/// `cos θ · e_i + sin θ · e_j`, starting at `e_i` (θ = 0°). The angle grows
/// one degree at a time up to [`MAX_SWEEP_ANGLE`]. The sweep ends at the first
/// angle whose cost is not strictly lower than the best so
/// far; ties keep the earlier (smaller) angle.
///
/// Panics if `axis >= 3`.
pub fn sweep_axis(
    target: &PixelSet,
    source: &PixelSet,
    axis: usize,
    weights: ChannelWeights,
) -> Result<AxisSweep> {
    let (from, to) = match axis {
        0 => (1, 2),
        1 => (0, 2),
        2 => (0, 1),
        _ => panic!("axis must be 0, 1 or 2"),
    };
    let baseline = Direction::axis(from);
    let baseline_cost = transport_cost(target, source, &baseline, weights)?;

    let mut best_angle = 0;
    let mut best_cost = baseline_cost;
    let mut best_direction = baseline;
    let mut costs = vec![baseline_cost];

    for angle in 1..=MAX_SWEEP_ANGLE {
        let (sin, cos) = f64::from(angle).to_radians().sin_cos();
        let mut v = [0.0; 3];
        v[from] = cos;
        v[to] = sin;
        let direction = Direction::from_array(v)?;

        let cost = transport_cost(target, source, &direction, weights)?;
        costs.push(cost);
        if cost < best_cost {
            best_angle = angle;
            best_cost = cost;
            best_direction = direction;
        } else {
            break;
        }
    }

    log::debug!(
        "axis {axis}: baseline {baseline_cost:.1}, best {best_cost:.1} at {best_angle} deg after {} evaluations",
        costs.len()
    );

    Ok(AxisSweep {
        axis,
        baseline_cost,
        best_angle,
        best_cost,
        best_direction,
        costs,
    })
}

/// Find a direction whose rank pairing of `target` and `source` is cheap.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if either set is empty
/// - [`Error::LengthMismatch`] if their lengths differ
/// - [`Error::InvalidTrialCount`] if random sampling is asked for 0 trials
/// - [`Error::InvalidSampleRange`] for a symmetric extent that is not finite
///   or below [`MIN_SAMPLE_EXTENT`]
///
/// # Example
///
/// ```rust
/// use sortxfer::{search, PixelSet, SearchConfig};
///
/// let target = PixelSet::from_rgb(&[[10, 20, 30], [200, 100, 50], [0, 0, 0]]);
/// let source = PixelSet::from_rgb(&[[0, 0, 255], [255, 0, 0], [0, 255, 0]]);
///
/// let swept = search(&target, &source, &SearchConfig::axis_sweep()).unwrap();
/// assert!((swept.direction.norm() - 1.0).abs() < 1e-9);
///
/// let sampled = search(&target, &source, &SearchConfig::random_sampling(8).with_seed(7)).unwrap();
/// assert_eq!(sampled.evaluations, 9);
/// ```
pub fn search(target: &PixelSet, source: &PixelSet, config: &SearchConfig) -> Result<SearchOutcome> {
    if target.is_empty() || source.is_empty() {
        return Err(Error::EmptyInput);
    }
    if target.len() != source.len() {
        return Err(Error::LengthMismatch(target.len(), source.len()));
    }

    let outcome = match config.strategy {
        Strategy::AxisSweep => axis_sweep(target, source, config.channel_weights)?,
        Strategy::RandomSampling { trials, range } => {
            if trials < 1 {
                return Err(Error::InvalidTrialCount(trials));
            }
            random_sampling(target, source, trials, range, config)?
        }
    };

    log::info!(
        "best direction {} (cost {:.1}, quality {:.3}, {} evaluations)",
        outcome.direction,
        outcome.cost,
        outcome.quality,
        outcome.evaluations
    );
    Ok(outcome)
}

fn axis_sweep(target: &PixelSet, source: &PixelSet, weights: ChannelWeights) -> Result<SearchOutcome> {
    let sweeps = run_sweeps(target, source, weights)?;

    let mut sum = [0.0; 3];
    for s in &sweeps {
        let v = s.best_direction.components();
        for c in 0..3 {
            sum[c] += v[c];
        }
    }

    let norm = (sum[0] * sum[0] + sum[1] * sum[1] + sum[2] * sum[2]).sqrt();
    let direction = if norm > EPSILON {
        Direction::from_array(sum)?.normalized()
    } else {
        // Unreachable with first-quadrant rotations.
        log::warn!("axis sweeps cancelled out, keeping the best single sweep");
        sweeps
            .iter()
            .min_by(|a, b| a.best_cost.total_cmp(&b.best_cost))
            .map(|s| s.best_direction.normalized())
            .ok_or(Error::DegenerateDirection)?
    };

    let cost = transport_cost(target, source, &direction, weights)?;
    let swept: Vec<f64> = sweeps.iter().flat_map(|s| s.costs.iter().copied()).collect();

    Ok(SearchOutcome {
        direction,
        cost,
        quality: dispersion(&swept),
        evaluations: swept.len() + 1,
        sweeps,
    })
}

#[cfg(not(feature = "parallel"))]
fn run_sweeps(target: &PixelSet, source: &PixelSet, weights: ChannelWeights) -> Result<Vec<AxisSweep>> {
    (0..3).map(|axis| sweep_axis(target, source, axis, weights)).collect()
}

// Sweeps are independent of each other; each one stays sequential in angle.
#[cfg(feature = "parallel")]
fn run_sweeps(target: &PixelSet, source: &PixelSet, weights: ChannelWeights) -> Result<Vec<AxisSweep>> {
    use rayon::prelude::*;
    (0..3usize)
        .into_par_iter()
        .map(|axis| sweep_axis(target, source, axis, weights))
        .collect()
}

fn random_sampling(
    target: &PixelSet,
    source: &PixelSet,
    trials: usize,
    range: SampleRange,
    config: &SearchConfig,
) -> Result<SearchOutcome> {
    let dist = range.distribution()?;
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    // Draw everything up front so results do not depend on evaluation order.
    let initial = draw_direction(&mut rng, &dist);
    let candidates: Vec<Direction> = (0..trials).map(|_| draw_direction(&mut rng, &dist)).collect();

    let initial_cost = transport_cost(target, source, &initial, config.channel_weights)?;
    let costs = evaluate_all(target, source, &candidates, config.channel_weights)?;

    let mut direction = initial;
    let mut cost = initial_cost;
    for (d, &c) in candidates.iter().zip(costs.iter()) {
        if c < cost {
            direction = *d;
            cost = c;
        }
    }

    log::debug!(
        "sampled {trials} directions: initial {initial_cost:.1}, best {cost:.1}, worst {:.1}",
        costs.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    );

    Ok(SearchOutcome {
        direction,
        cost,
        quality: dispersion(&costs),
        evaluations: trials + 1,
        sweeps: Vec::new(),
    })
}

fn draw_direction(rng: &mut ChaCha8Rng, dist: &Uniform<f64>) -> Direction {
    loop {
        let v = [dist.sample(rng), dist.sample(rng), dist.sample(rng)];
        if let Ok(d) = Direction::from_array(v) {
            return d;
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all(
    target: &PixelSet,
    source: &PixelSet,
    candidates: &[Direction],
    weights: ChannelWeights,
) -> Result<Vec<f64>> {
    candidates
        .iter()
        .map(|d| transport_cost(target, source, d, weights))
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_all(
    target: &PixelSet,
    source: &PixelSet,
    candidates: &[Direction],
    weights: ChannelWeights,
) -> Result<Vec<f64>> {
    use rayon::prelude::*;
    candidates
        .par_iter()
        .map(|d| transport_cost(target, source, d, weights))
        .collect()
}

/// `min / max`, or 1 when every cost is zero.
fn dispersion(costs: &[f64]) -> f64 {
    let min = costs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = costs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        min / max
    } else {
        1.0
    }
}
