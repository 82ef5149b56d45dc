//! Settings structs for the configuration file.
//!
//! Pure data types; parsing lives in [`super::parser`] and serialization in
//! [`super::writer`].

use super::defaults::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
use super::MosaicConfig;
use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// Job settings (`[source]`, `[grid]`, `[download]`, `[headers]`, `[output]`)
    pub mosaic: MosaicConfig,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory that holds the log file
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
