//! Two-layer blending.
//!
//! The top image is first faded by an [`Opacity`], then laid over the bottom
//! image with the Porter-Duff "over" operator on straight (non-premultiplied)
//! RGBA8 pixels:
//!
//! ```text
//! outA   = aT + aB·(1 − aT)
//! outRGB = (rgbT·aT + rgbB·aB·(1 − aT)) / outA        (0 when outA = 0)
//! ```
//!
//! where `aT`, `aB` are alphas normalized to `[0, 1]`. Results are rounded
//! to the nearest integer.
//!
//! # Fading
//!
//! [`FadeMode::TowardTransparent`] (the default) interpolates all four
//! channels of the top image toward transparent black `(0, 0, 0, 0)` by
//! `1 − opacity`, so color and alpha are both scaled by `opacity`. The
//! darkened color is visible in the composite wherever the bottom image
//! shows through. [`FadeMode::AlphaOnly`] scales only the alpha channel and
//! keeps the top image's colors intact.

use std::fmt;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError, ImageFormat, Rgba, RgbaImage};
use thiserror::Error;
use tracing::{info, instrument};

use crate::layer::{ensure_dir, StorageError};
use crate::mosaic::decode_file;

/// Errors raised by the blend step.
#[derive(Debug, Error)]
pub enum BlendError {
    /// The two images do not share the same dimensions.
    #[error(
        "Size error: images must have the same size (top is {}×{}, bottom is {}×{})",
        .top.0, .top.1, .bottom.0, .bottom.1
    )]
    SizeMismatch { top: (u32, u32), bottom: (u32, u32) },

    /// Opacity outside `[0, 1]` or not a number.
    #[error("Invalid opacity {0}: must be between 0.0 and 1.0")]
    InvalidOpacity(f32),

    /// Output path does not name a format with an alpha channel.
    #[error("Unsupported output format for {path}: use .png, .tif, .webp or .tga")]
    UnsupportedOutputFormat { path: PathBuf },

    /// An input image could not be opened or decoded.
    #[error("Failed to decode image {path}: {source}")]
    Decode { path: PathBuf, source: ImageError },

    /// Writing the result failed.
    #[error("Failed to save blended image to {path}: {source}")]
    Save { path: PathBuf, source: ImageError },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Opacity of the top layer, validated to lie in `[0, 1]`.
///
/// `1.0` keeps the top image untouched; `0.0` makes it vanish. Values
/// outside the range are rejected rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Opacity(f32);

impl Opacity {
    pub const OPAQUE: Opacity = Opacity(1.0);
    pub const TRANSPARENT: Opacity = Opacity(0.0);
    /// Overlay strength used when none is given.
    pub const DEFAULT: Opacity = Opacity(0.4);

    pub fn new(value: f32) -> Result<Self, BlendError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(BlendError::InvalidOpacity(value))
        }
    }

    pub const fn value(&self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for Opacity {
    type Error = BlendError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Opacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// How the top image is faded before compositing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FadeMode {
    /// Scale every channel, color included, by the opacity.
    #[default]
    TowardTransparent,
    /// Scale only the alpha channel by the opacity.
    AlphaOnly,
}

#[inline]
fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn scale(channel: u8, factor: f64) -> u8 {
    to_channel(channel as f64 * factor)
}

/// Fades one pixel by `opacity`.
#[inline]
fn fade_pixel(pixel: Rgba<u8>, opacity: Opacity, mode: FadeMode) -> Rgba<u8> {
    let factor = opacity.value() as f64;
    let [r, g, b, a] = pixel.0;
    match mode {
        FadeMode::TowardTransparent => Rgba([
            scale(r, factor),
            scale(g, factor),
            scale(b, factor),
            scale(a, factor),
        ]),
        FadeMode::AlphaOnly => Rgba([r, g, b, scale(a, factor)]),
    }
}

/// Composites `top` over `bottom` for one pixel.
#[inline]
fn over_pixel(top: Rgba<u8>, bottom: Rgba<u8>) -> Rgba<u8> {
    let top_alpha = top[3] as f64 / 255.0;
    let bottom_alpha = bottom[3] as f64 / 255.0;
    let bottom_weight = bottom_alpha * (1.0 - top_alpha);
    let out_alpha = top_alpha + bottom_weight;

    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |c: usize| {
        to_channel((top[c] as f64 * top_alpha + bottom[c] as f64 * bottom_weight) / out_alpha)
    };

    Rgba([channel(0), channel(1), channel(2), to_channel(out_alpha * 255.0)])
}

/// Returns a faded copy of `image`.
pub fn fade(image: &RgbaImage, opacity: Opacity, mode: FadeMode) -> RgbaImage {
    let mut faded = image.clone();
    for pixel in faded.pixels_mut() {
        *pixel = fade_pixel(*pixel, opacity, mode);
    }
    faded
}

/// Composites `top` over `bottom`. Both images must have the same size.
pub fn composite_over(top: &RgbaImage, bottom: &RgbaImage) -> Result<RgbaImage, BlendError> {
    if top.dimensions() != bottom.dimensions() {
        return Err(BlendError::SizeMismatch {
            top: top.dimensions(),
            bottom: bottom.dimensions(),
        });
    }

    let mut result = bottom.clone();
    for (out, top_pixel) in result.pixels_mut().zip(top.pixels()) {
        *out = over_pixel(*top_pixel, *out);
    }
    Ok(result)
}

/// Fades `top` by `opacity` and composites it over `bottom`.
///
/// Both images are converted to RGBA8 first; images without an alpha
/// channel are treated as fully opaque. The inputs are not modified.
pub fn blend(
    top: &DynamicImage,
    bottom: &DynamicImage,
    opacity: Opacity,
    mode: FadeMode,
) -> Result<RgbaImage, BlendError> {
    let top = top.to_rgba8();
    let bottom = bottom.to_rgba8();

    if top.dimensions() != bottom.dimensions() {
        return Err(BlendError::SizeMismatch {
            top: top.dimensions(),
            bottom: bottom.dimensions(),
        });
    }

    composite_over(&fade(&top, opacity, mode), &bottom)
}

/// Fails unless `path` names an output format able to store alpha.
pub fn check_output_format(path: &Path) -> Result<ImageFormat, BlendError> {
    match ImageFormat::from_path(path) {
        Ok(
            format @ (ImageFormat::Png | ImageFormat::Tiff | ImageFormat::WebP | ImageFormat::Tga),
        ) => Ok(format),
        _ => Err(BlendError::UnsupportedOutputFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn open_image(path: &Path) -> Result<DynamicImage, BlendError> {
    decode_file(path).map_err(|source| BlendError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Blends the image at `top_path` over the image at `bottom_path` and
/// writes the RGBA result to `output`.
///
/// Nothing is written when the inputs differ in size.
#[instrument(skip_all, fields(
    top = %top_path.display(),
    bottom = %bottom_path.display(),
    output = %output.display()
))]
pub fn blend_files(
    top_path: &Path,
    bottom_path: &Path,
    output: &Path,
    opacity: Opacity,
    mode: FadeMode,
) -> Result<(), BlendError> {
    let format = check_output_format(output)?;

    let top = open_image(top_path)?;
    let bottom = open_image(bottom_path)?;
    let result = blend(&top, &bottom, opacity, mode)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    result
        .save_with_format(output, format)
        .map_err(|source| BlendError::Save {
            path: output.to_path_buf(),
            source,
        })?;

    info!(
        width = result.width(),
        height = result.height(),
        opacity = %opacity,
        "Blended image saved"
    );
    Ok(())
}
