//! Recolor an image with the palette of another.
//!
//! Run: cargo run --release -- target.png source.png -o output.png

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sortxfer::raster::{self, Reconcile};
use sortxfer::search::DEFAULT_TRIALS;
use sortxfer::{recolor, ChannelWeights, SampleRange, SearchConfig};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    /// Greedy rotation sweep around each axis (deterministic)
    Sweep,
    /// Best of N random directions
    Sampling,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RangeArg {
    /// Components uniform in [-500, 500)
    Symmetric,
    /// Components uniform in [0, 1)
    Unit,
}

#[derive(Parser, Debug)]
#[command(name = "sortxfer", version, about = "Transfer the palette of SOURCE onto TARGET.")]
struct Args {
    /// Image to recolor
    target: PathBuf,

    /// Image providing the palette
    source: PathBuf,

    /// Output file; the format follows the extension
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Direction search strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Sweep)]
    strategy: StrategyArg,

    /// Number of random directions (sampling only)
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    trials: usize,

    /// Component range of random directions (sampling only)
    #[arg(long, value_enum, default_value_t = RangeArg::Symmetric)]
    range: RangeArg,

    /// RNG seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Weight channel differences by rough luminance (0.3, 0.58, 0.12)
    #[arg(long)]
    luminance: bool,

    /// Center-crop both images to a common size instead of failing on a size mismatch
    #[arg(long)]
    crop: bool,
}

impl Args {
    fn search_config(&self) -> SearchConfig {
        let mut config = match self.strategy {
            StrategyArg::Sweep => SearchConfig::axis_sweep(),
            StrategyArg::Sampling => {
                let range = match self.range {
                    RangeArg::Symmetric => SampleRange::default(),
                    RangeArg::Unit => SampleRange::UnitPositive,
                };
                SearchConfig::random_sampling(self.trials).with_range(range)
            }
        };
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.luminance {
            config = config.with_channel_weights(ChannelWeights::LUMINANCE);
        }
        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let start = Instant::now();

    let target = raster::load_rgb(&args.target)
        .with_context(|| format!("failed to open target {}", args.target.display()))?;
    let source = raster::load_rgb(&args.source)
        .with_context(|| format!("failed to open source {}", args.source.display()))?;
    log::info!("target {}: {}x{}", args.target.display(), target.width(), target.height());
    log::info!("source {}: {}x{}", args.source.display(), source.width(), source.height());

    let policy = if args.crop { Reconcile::CropCenter } else { Reconcile::Reject };
    let (target, source) = raster::reconcile(target, source, policy)?;
    let (width, height) = target.dimensions();

    let target_px = raster::pixels_from_image(&target);
    let source_px = raster::pixels_from_image(&source);
    log::debug!("decoded in {:.2?}", start.elapsed());

    let out = recolor(&target_px, &source_px, &args.search_config())?;
    log::debug!("recolored in {:.2?}", start.elapsed());

    let img = raster::image_from_pixels(&out.pixels, width, height)?;
    raster::save_rgb(&img, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    log::info!(
        "saved {} (direction {}, quality {:.3}) in {:.2?}",
        args.output.display(),
        out.outcome.direction,
        out.outcome.quality,
        start.elapsed()
    );
    Ok(())
}
