//! Blend command - composite one existing image over another.

use std::path::PathBuf;

use clap::Args;
use mapblend::blend::{blend_files, Opacity};

use super::common::{blend_options, GlobalArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the blend command.
#[derive(Debug, Args)]
pub struct BlendArgs {
    /// Image drawn on top, faded by the opacity
    #[arg(long)]
    pub top: PathBuf,

    /// Image underneath
    #[arg(long)]
    pub bottom: PathBuf,

    /// Output file (.png, .tif, .webp or .tga)
    #[arg(long)]
    pub output: PathBuf,

    /// Opacity of the top image, from 0.0 (invisible) to 1.0 (unchanged)
    #[arg(long, default_value_t = Opacity::DEFAULT.value())]
    pub opacity: f32,

    /// Fade only the alpha channel of the top image
    #[arg(long)]
    pub alpha_only: bool,
}

/// Run the blend command.
pub fn run(args: BlendArgs, global: &GlobalArgs) -> Result<(), CliError> {
    let options = blend_options(args.opacity, args.alpha_only)?;

    let runner = CliRunner::new(global)?;
    runner.log_startup("blend");

    blend_files(
        &args.top,
        &args.bottom,
        &args.output,
        options.opacity,
        options.mode,
    )?;

    println!(
        "Blended {} over {} at opacity {} into {}",
        args.top.display(),
        args.bottom.display(),
        options.opacity,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn save_solid(path: &Path, rgb: [u8; 3]) {
        RgbImage::from_pixel(2, 2, Rgb(rgb)).save(path).unwrap();
    }

    /// Global options whose config sends the log file into `dir`.
    fn global_logging_to(dir: &Path) -> GlobalArgs {
        let config = dir.join("mapblend.ini");
        fs::write(
            &config,
            format!("[logging]\nfile = {}\n", dir.join("mapblend.log").display()),
        )
        .unwrap();

        GlobalArgs {
            config: Some(config),
            debug: false,
            root: None,
            url_template: None,
            tile_size: None,
        }
    }

    fn args(dir: &Path, opacity: f32) -> BlendArgs {
        BlendArgs {
            top: dir.join("top.png"),
            bottom: dir.join("bottom.png"),
            output: dir.join("final.png"),
            opacity,
            alpha_only: false,
        }
    }

    // The only test here that initializes the global subscriber.
    #[test]
    fn test_blend_command_writes_output() {
        let temp = TempDir::new().unwrap();
        save_solid(&temp.path().join("top.png"), [255, 0, 0]);
        save_solid(&temp.path().join("bottom.png"), [0, 0, 255]);

        run(args(temp.path(), 0.5), &global_logging_to(temp.path())).unwrap();

        let written = image::open(temp.path().join("final.png"))
            .unwrap()
            .to_rgba8();
        assert!(written.pixels().all(|p| p.0 == [64, 0, 127, 255]));
        assert!(temp.path().join("mapblend.log").exists());
    }

    #[test]
    fn test_invalid_opacity_rejected_before_logging_starts() {
        let temp = TempDir::new().unwrap();
        save_solid(&temp.path().join("top.png"), [255, 0, 0]);
        save_solid(&temp.path().join("bottom.png"), [0, 0, 255]);

        let result = run(args(temp.path(), 1.5), &global_logging_to(temp.path()));

        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
        assert!(!temp.path().join("mapblend.log").exists());
        assert!(!temp.path().join("final.png").exists());
    }
}
