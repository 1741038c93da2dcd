//! mapblend CLI - Command-line interface
//!
//! Fetches WMTS tile grids, assembles them into mosaics and blends two
//! layers into one map.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::blend::BlendArgs;
use commands::common::GlobalArgs;
use commands::layer::LayerArgs;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "mapblend")]
#[command(version, about = "Build map mosaics from WMTS tiles and blend layers", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a tile grid for one layer and assemble it into a mosaic
    Layer(LayerArgs),
    /// Blend an existing image over another
    Blend(BlendArgs),
    /// Build a base and an overlay layer and blend the overlay over the base
    Run(RunArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Layer(args) => commands::layer::run(args, &cli.global),
        Commands::Blend(args) => commands::blend::run(args, &cli.global),
        Commands::Run(args) => commands::run::run(args, &cli.global),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from([
            "mapblend", "run", "--map-size", "4", "--col", "16598", "--row", "11273", "--zoom",
            "15",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.base_layer, commands::run::DEFAULT_BASE_LAYER);
        assert_eq!(args.overlay_layer, commands::run::DEFAULT_OVERLAY_LAYER);
        assert_eq!(args.opacity, 0.4);
        assert!(!args.alpha_only);
        assert_eq!(args.output, std::path::PathBuf::from("final.png"));
        assert_eq!(args.grid.col, Some(16598));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mapblend", "layer", "--layer", "TOPO", "--map-size", "2", "--lat", "-33.86",
            "--lon", "151.21", "--zoom", "12", "--debug", "--tile-size", "512",
        ])
        .unwrap();

        assert!(cli.global.debug);
        assert_eq!(cli.global.tile_size, Some(512));
        let Commands::Layer(args) = cli.command else {
            panic!("expected layer command");
        };
        assert_eq!(args.grid.lat, Some(-33.86));
        assert_eq!(args.grid.lon, Some(151.21));
    }

    #[test]
    fn test_grid_anchor_is_required_and_exclusive() {
        let base = ["mapblend", "layer", "--layer", "TOPO", "--map-size", "2", "--zoom", "12"];
        assert!(Cli::try_parse_from(base).is_err());

        let both = [
            &base[..],
            &["--col", "1", "--row", "2", "--lat", "10", "--lon", "10"],
        ]
        .concat();
        assert!(Cli::try_parse_from(both).is_err());

        let col_only = [&base[..], &["--col", "1"]].concat();
        assert!(Cli::try_parse_from(col_only).is_err());
    }

    #[test]
    fn test_run_opacity_help_states_direction() {
        let mut command = Cli::command();
        let run = command.find_subcommand_mut("run").unwrap();
        let opacity = run
            .get_arguments()
            .find(|arg| arg.get_id() == "opacity")
            .unwrap();

        let help = opacity.get_long_help().unwrap().to_string();
        assert!(help.contains("40%"));
        assert!(help.contains("1-x"));
        assert_eq!(opacity.get_default_values()[0].to_str(), Some("0.4"));
    }

    #[test]
    fn test_zero_map_size_rejected() {
        assert!(Cli::try_parse_from([
            "mapblend", "layer", "--layer", "TOPO", "--map-size", "0", "--col", "1", "--row",
            "1", "--zoom", "3",
        ])
        .is_err());
    }
}
