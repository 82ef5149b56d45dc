//! Default values and constants for all configuration settings.

// =============================================================================
// Source defaults
// =============================================================================

/// Default tile URL template.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://maps.runescape.wiki/osrs/versions/2025-05-22_a/tiles/rendered/-1/3/{prefix}_{x}_{y}.png";

/// Default value substituted for `{prefix}` (map plane).
pub const DEFAULT_PREFIX: &str = "0";

// =============================================================================
// Grid defaults
// =============================================================================

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default number of tiles along one grid edge.
pub const DEFAULT_GRID_SIZE: u32 = 256;

// =============================================================================
// Download defaults
// =============================================================================

/// Default number of concurrent workers.
/// Tune to available bandwidth; every worker holds one connection.
pub const DEFAULT_WORKERS: usize = 64;

/// Default attempts per tile, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Header defaults
// =============================================================================

/// Browser-like User-Agent; some tile servers reject requests without one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0 Safari/537.36";

/// Default Accept header.
pub const DEFAULT_ACCEPT: &str =
    "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";

/// Default Referer header.
pub const DEFAULT_REFERER: &str = "https://maps.runescape.wiki/";

// =============================================================================
// Output and logging defaults
// =============================================================================

/// Default output file.
pub const DEFAULT_OUTPUT: &str = "full_map.png";

/// Default log directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "tilemosaic.log";
