//! INI serialization logic for converting `ConfigFile` → INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let mosaic = &config.mosaic;
    let grid = mosaic.grid();
    let headers = mosaic.headers();

    format!(
        r#"[source]
; Tile URL template. {{x}} and {{y}} are required, {{prefix}} is optional.
url_template = {}
; Value substituted for {{prefix}} (layer, plane or zoom level)
prefix = {}

[grid]
; Number of tiles along one edge of the square grid
grid_size = {}
; Tile edge length in pixels
tile_size = {}

[download]
; Maximum number of tiles fetched concurrently
workers = {}
; Attempts per tile, including the first (retries are immediate)
max_attempts = {}
; Per-request timeout in seconds
timeout = {}

[headers]
user_agent = {}
accept = {}
referer = {}

[output]
; Encoded format is chosen from the extension (.png, .jpg, .webp)
path = {}

[logging]
directory = {}
file = {}
"#,
        mosaic.url_template(),
        mosaic.prefix(),
        grid.grid_size(),
        grid.tile_size(),
        mosaic.workers(),
        mosaic.max_attempts(),
        mosaic.timeout().as_secs(),
        headers.user_agent,
        headers.accept,
        headers.referer,
        mosaic.output().display(),
        config.logging.directory.display(),
        config.logging.file,
    )
}
