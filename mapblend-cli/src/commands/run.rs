//! Run command - build a base and an overlay layer, then blend them.

use std::path::PathBuf;

use clap::Args;
use mapblend::blend::Opacity;

use super::common::{blend_options, fetch_progress, parse_layer, GlobalArgs, GridArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Default base layer: orthophotos.
pub const DEFAULT_BASE_LAYER: &str = "ORTHOIMAGERY.ORTHOPHOTOS";
/// Default overlay layer: topographic map.
pub const DEFAULT_OVERLAY_LAYER: &str = "GEOGRAPHICALGRIDSYSTEMS.MAPS.SCAN25TOUR.CV";

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    /// Layer drawn underneath
    #[arg(long, default_value = DEFAULT_BASE_LAYER)]
    pub base_layer: String,

    /// Layer drawn on top, faded by the opacity
    #[arg(long, default_value = DEFAULT_OVERLAY_LAYER)]
    pub overlay_layer: String,

    /// Opacity of the overlay, from 0.0 (invisible) to 1.0 (unchanged)
    ///
    /// Higher values show more of the overlay: the default 0.4 keeps 40%
    /// of it. Scripts built on `Image.blend(overlay, transparent, x)` count
    /// the other way; their `x` corresponds to `--opacity 1-x`.
    #[arg(long, default_value_t = Opacity::DEFAULT.value())]
    pub opacity: f32,

    /// Fade only the alpha channel of the overlay
    #[arg(long)]
    pub alpha_only: bool,

    /// Blended output file (.png, .tif, .webp or .tga)
    #[arg(long, default_value = "final.png")]
    pub output: PathBuf,
}

/// Run the run command.
pub fn run(args: RunArgs, global: &GlobalArgs) -> Result<(), CliError> {
    let base = parse_layer(&args.base_layer)?;
    let overlay = parse_layer(&args.overlay_layer)?;
    let grid = args.grid.to_grid()?;
    let options = blend_options(args.opacity, args.alpha_only)?;

    let runner = CliRunner::new(global)?;
    runner.log_startup("run");
    let builder = runner.map_builder()?;

    println!("Building blended map");
    println!("  Origin: {}", grid.origin());
    println!("  Grid: {0}x{0} tiles", grid.size());
    println!("  Base: {}", base);
    println!("  Overlay: {} (opacity {})", overlay, options.opacity);
    println!();

    let start = std::time::Instant::now();
    let output = builder.build_blended_map(
        &grid,
        &base,
        &overlay,
        &args.output,
        options,
        |layer| Some(fetch_progress(layer)),
    )?;

    println!();
    println!(
        "Blended map saved to {} in {:.2}s",
        output.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
