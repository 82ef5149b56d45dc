//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::provider::RequestHeaders;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();
    let mut mosaic = config.mosaic.clone();

    // [source] section
    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = non_empty(section, "url_template") {
            mosaic = mosaic.with_url_template(v);
        }
        if let Some(v) = section.get("prefix") {
            mosaic = mosaic.with_prefix(v.trim());
        }
    }

    // [grid] section
    if let Some(section) = ini.section(Some("grid")) {
        if let Some(v) = parse_number::<u32>(section, "grid", "grid_size")? {
            mosaic = mosaic.with_grid_size(v);
        }
        if let Some(v) = parse_number::<u32>(section, "grid", "tile_size")? {
            mosaic = mosaic.with_tile_size(v);
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = parse_number::<usize>(section, "download", "workers")? {
            mosaic = mosaic.with_workers(v);
        }
        if let Some(v) = parse_number::<u32>(section, "download", "max_attempts")? {
            mosaic = mosaic.with_max_attempts(v);
        }
        if let Some(v) = parse_number::<u64>(section, "download", "timeout")? {
            mosaic = mosaic.with_timeout(Duration::from_secs(v));
        }
    }

    // [headers] section
    if let Some(section) = ini.section(Some("headers")) {
        let mut headers: RequestHeaders = mosaic.headers().clone();
        if let Some(v) = section.get("user_agent") {
            headers.user_agent = v.trim().to_string();
        }
        if let Some(v) = section.get("accept") {
            headers.accept = v.trim().to_string();
        }
        if let Some(v) = section.get("referer") {
            headers.referer = v.trim().to_string();
        }
        mosaic = mosaic.with_headers(headers);
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = non_empty(section, "path") {
            mosaic = mosaic.with_output(expand_tilde(v));
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "directory") {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = v.to_string();
        }
    }

    config.mosaic = mosaic;
    Ok(config)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
) -> Result<Option<T>, ConfigFileError> {
    let Some(v) = non_empty(section, key) else {
        return Ok(None);
    };

    v.parse()
        .map(Some)
        .map_err(|_| ConfigFileError::InvalidValue {
            section: section_name.to_string(),
            key: key.to_string(),
            value: v.to_string(),
            reason: "must be a non-negative integer".to_string(),
        })
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
