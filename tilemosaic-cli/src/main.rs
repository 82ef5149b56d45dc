//! tilemosaic CLI - Command-line interface
//!
//! Downloads a grid of map tiles and saves them as one image. Values come
//! from `~/.tilemosaic/config.ini` (or `--config`), overridden by flags.

mod error;
mod runner;

use clap::Parser;
use error::CliError;
use runner::{load_config, CliRunner};
use std::path::PathBuf;
use std::time::Duration;
use tilemosaic::config::{config_file_path, ConfigFile, MosaicConfig};

#[derive(Debug, Parser)]
#[command(name = "tilemosaic")]
#[command(version = tilemosaic::VERSION)]
#[command(about = "Download a grid of map tiles and stitch them into one image", long_about = None)]
struct Args {
    /// Config file to read instead of ~/.tilemosaic/config.ini
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Tile URL template with {x}, {y} and optional {prefix} placeholders
    #[arg(long)]
    url_template: Option<String>,

    /// Value substituted for {prefix} in the URL template
    #[arg(long)]
    prefix: Option<String>,

    /// Number of tiles along each edge of the grid
    #[arg(long)]
    grid_size: Option<u32>,

    /// Edge length of one tile in pixels
    #[arg(long)]
    tile_size: Option<u32>,

    /// Maximum number of concurrent downloads
    #[arg(long, short = 'w')]
    workers: Option<usize>,

    /// Attempts per tile before it is left transparent
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output image path (format inferred from the extension)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    save_config: bool,

    /// Mirror log output to stderr
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Enable debug-level logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    /// Applies command-line overrides on top of the file configuration.
    fn apply(&self, mut config: MosaicConfig) -> MosaicConfig {
        if let Some(template) = &self.url_template {
            config = config.with_url_template(template.clone());
        }
        if let Some(prefix) = &self.prefix {
            config = config.with_prefix(prefix.clone());
        }
        if let Some(grid_size) = self.grid_size {
            config = config.with_grid_size(grid_size);
        }
        if let Some(tile_size) = self.tile_size {
            config = config.with_tile_size(tile_size);
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(attempts) = self.max_attempts {
            config = config.with_max_attempts(attempts);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(output) = &self.output {
            config = config.with_output(output.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        e.exit();
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let file = load_config(args.config.as_deref())?;
    let mosaic = args.apply(file.mosaic.clone());

    // Fail on a bad configuration before touching the log directory
    mosaic.validate()?;

    if args.save_config {
        let path = args.config.clone().unwrap_or_else(config_file_path);
        let updated = ConfigFile {
            mosaic,
            logging: file.logging,
        };
        updated.save_to(&path)?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let runner = CliRunner::new(&file, args.verbose, args.debug)?;
    runner.run(mosaic).await?;
    Ok(())
}
