//! Layer command - fetch one layer's tile grid and assemble its mosaic.

use clap::Args;

use super::common::{fetch_progress, parse_layer, GlobalArgs, GridArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the layer command.
#[derive(Debug, Args)]
pub struct LayerArgs {
    /// Layer identifier on the tile service
    #[arg(long)]
    pub layer: String,

    #[command(flatten)]
    pub grid: GridArgs,
}

/// Run the layer command.
pub fn run(args: LayerArgs, global: &GlobalArgs) -> Result<(), CliError> {
    let layer = parse_layer(&args.layer)?;
    let grid = args.grid.to_grid()?;

    let runner = CliRunner::new(global)?;
    runner.log_startup("layer");
    let builder = runner.map_builder()?;

    println!("Building layer {}", layer);
    println!("  Origin: {}", grid.origin());
    println!("  Grid: {0}x{0} tiles", grid.size());
    println!();

    let start = std::time::Instant::now();
    let progress = fetch_progress(&layer);
    let path = builder.build_layer(&grid, &layer, Some(&progress))?;

    println!();
    println!(
        "Mosaic saved to {} in {:.2}s",
        path.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
