//! Configuration for tilemosaic.
//!
//! [`MosaicConfig`] is the immutable value handed to the pipeline.
//! [`ConfigFile`] loads it (plus logging settings) from an INI file.
//!
//! # Example
//!
//! ```
//! use tilemosaic::config::MosaicConfig;
//!
//! let config = MosaicConfig::default()
//!     .with_grid_size(8)
//!     .with_workers(16);
//! assert_eq!(config.grid().tile_count(), 64);
//! ```

mod defaults;
mod file;
mod mosaic;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use mosaic::{ConfigError, MosaicConfig};
pub use settings::{ConfigFile, LoggingSettings};
