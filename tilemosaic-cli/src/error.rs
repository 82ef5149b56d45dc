//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;
use tilemosaic::canvas::WriteError;
use tilemosaic::config::{ConfigError, ConfigFileError};
use tilemosaic::pipeline::MosaicError;
use tilemosaic::provider::TransportError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Config file could not be read or written
    ConfigFile(ConfigFileError),
    /// Effective configuration is invalid
    Config(ConfigError),
    /// HTTP client could not be built
    Transport(TransportError),
    /// The job failed before producing an image
    Mosaic(MosaicError),
    /// Failed to write output file
    FileWrite { path: PathBuf, error: WriteError },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Mosaic(MosaicError::Canvas(_)) = self {
            eprintln!();
            eprintln!("The canvas is held in memory as RGBA (4 bytes per pixel).");
            eprintln!("Try a smaller --grid-size or --tile-size.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Config file error: {}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Transport(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Mosaic(e) => write!(f, "Mosaic failed: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Transport(e) => Some(e),
            CliError::Mosaic(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::LoggingInit(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<MosaicError> for CliError {
    fn from(e: MosaicError) -> Self {
        match e {
            MosaicError::Config(e) => CliError::Config(e),
            other => CliError::Mosaic(other),
        }
    }
}
