//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, and the job itself
//! so `main` only has to parse arguments and report errors.

use crate::error::CliError;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tilemosaic::canvas::ImageFileWriter;
use tilemosaic::config::{ConfigFile, MosaicConfig};
use tilemosaic::logging::{init_logging, LoggingGuard};
use tilemosaic::pipeline::{MosaicError, MosaicJob, MosaicReport};
use tilemosaic::provider::ReqwestTransport;
use tilemosaic::tile::ImageDecoder;
use tracing::info;

/// Loads the configuration file, honoring an explicit path if given.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
}

impl CliRunner {
    /// Initializes logging from the loaded configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Loaded configuration file
    /// * `console` - Mirror log events to stderr
    /// * `debug` - Enable debug-level logging when RUST_LOG is unset
    pub fn new(config: &ConfigFile, console: bool, debug: bool) -> Result<Self, CliError> {
        let logging_guard = init_logging(
            &config.logging.directory,
            &config.logging.file,
            console,
            debug,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        info!("tilemosaic v{}", tilemosaic::VERSION);

        Ok(Self { logging_guard })
    }

    /// Downloads the grid, assembles the canvas and writes it out.
    pub async fn run(&self, config: MosaicConfig) -> Result<MosaicReport, CliError> {
        let transport =
            Arc::new(ReqwestTransport::new(config.workers()).map_err(CliError::Transport)?);
        let job = MosaicJob::new(config, transport, Arc::new(ImageDecoder))?;

        let output = job.config().output().to_path_buf();
        info!(
            url_template = job.config().url_template(),
            output = %output.display(),
            "Configuration loaded"
        );

        let mosaic = job.run(io::stdout()).await?;

        println!("Saving final image …");
        job.save(&mosaic, &ImageFileWriter).map_err(|e| match e {
            MosaicError::Write(error) => CliError::FileWrite {
                path: output.clone(),
                error,
            },
            other => CliError::from(other),
        })?;

        let report = mosaic.report;
        println!(
            "Done → {} ({}×{})",
            output.display(),
            mosaic.image.width(),
            mosaic.image.height()
        );
        info!(
            fetched = report.fetched(),
            placeholders = report.placeholders,
            downloaded = %report.stats.format_bytes(),
            "Run complete"
        );

        Ok(report)
    }
}
