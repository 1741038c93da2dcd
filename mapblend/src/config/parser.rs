//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use image::ImageFormat;
use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::provider::UrlTemplate;

fn invalid(section: &str, key: &str, value: &str, reason: impl Into<String>) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_positive<T>(section: &str, key: &str, value: &str, unit: &str) -> Result<T, ConfigFileError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(invalid(
            section,
            key,
            value,
            format!("must be a positive integer ({})", unit),
        )),
    }
}

fn parse_extension(section: &str, key: &str, value: &str) -> Result<String, ConfigFileError> {
    let ext = value.trim().trim_start_matches('.').to_lowercase();
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid(
            section,
            key,
            value,
            "must be a file extension such as 'png' or 'jpg'",
        ));
    }
    Ok(ext)
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [service] section
    if let Some(section) = ini.section(Some("service")) {
        if let Some(v) = section.get("url_template") {
            config.service.url_template = UrlTemplate::parse(v.trim())
                .map_err(|e| invalid("service", "url_template", v, e.to_string()))?;
        }
        if let Some(v) = section.get("user_agent") {
            let v = v.trim();
            if !v.is_empty() {
                config.service.user_agent = v.to_string();
            }
        }
        if let Some(v) = section.get("timeout") {
            config.service.timeout = parse_positive("service", "timeout", v, "seconds")?;
        }
    }

    // [tiles] section
    if let Some(section) = ini.section(Some("tiles")) {
        if let Some(v) = section.get("size") {
            config.tiles.size = parse_positive("tiles", "size", v, "pixels")?;
        }
        if let Some(v) = section.get("extension") {
            config.tiles.extension = parse_extension("tiles", "extension", v)?;
        }
    }

    // [mosaic] section
    if let Some(section) = ini.section(Some("mosaic")) {
        if let Some(v) = section.get("extension") {
            let ext = parse_extension("mosaic", "extension", v)?;
            let writable = ImageFormat::from_extension(&ext)
                .map(|format| format.writing_enabled())
                .unwrap_or(false);
            if !writable {
                return Err(invalid(
                    "mosaic",
                    "extension",
                    v,
                    "not a writable image format",
                ));
            }
            config.mosaic.extension = ext;
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.output.directory = PathBuf::from(v);
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = PathBuf::from(v);
            }
        }
    }

    Ok(config)
}
