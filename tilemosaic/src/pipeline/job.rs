//! One complete mosaic run.

use super::{MosaicError, TileScheduler};
use crate::canvas::{Canvas, Compositor, MosaicWriter};
use crate::config::{ConfigError, MosaicConfig};
use crate::progress::{format_bytes, FetchStats, FetchStatsSnapshot, ProgressReporter};
use crate::provider::{Transport, UrlTemplate};
use crate::tile::{FetchSettings, TileDecoder, TileFetcher};
use image::RgbaImage;
use std::io::Write;
use std::sync::Arc;
use tracing::{info, instrument};

/// Totals for a finished job.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicReport {
    /// Tiles in the grid
    pub tiles: usize,
    /// Tiles that became transparent placeholders
    pub placeholders: usize,
    /// Highest number of concurrent fetches observed
    pub peak_in_flight: usize,
    /// Download counters at the end of the job
    pub stats: FetchStatsSnapshot,
}

impl MosaicReport {
    /// Tiles decoded from real responses.
    pub fn fetched(&self) -> usize {
        self.tiles - self.placeholders
    }
}

/// The assembled canvas plus its report.
#[derive(Debug)]
pub struct Mosaic {
    pub image: RgbaImage,
    pub report: MosaicReport,
}

/// Downloads every tile of a grid and assembles the canvas.
///
/// Built from an explicit [`MosaicConfig`]; the configuration is validated
/// once here so that [`MosaicJob::run`] can only fail for fatal reasons.
pub struct MosaicJob<T, D> {
    config: MosaicConfig,
    urls: UrlTemplate,
    transport: Arc<T>,
    decoder: Arc<D>,
}

impl<T, D> MosaicJob<T, D>
where
    T: Transport + 'static,
    D: TileDecoder + 'static,
{
    /// Validates the configuration and prepares a job.
    pub fn new(
        config: MosaicConfig,
        transport: Arc<T>,
        decoder: Arc<D>,
    ) -> Result<Self, ConfigError> {
        let urls = config.validate()?;
        Ok(Self {
            config,
            urls,
            transport,
            decoder,
        })
    }

    pub fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Runs the job, rendering progress to `sink`.
    ///
    /// The canvas is allocated before any request is made, so an oversized
    /// grid fails fast. Every coordinate is composited exactly once, either
    /// with its decoded tile or with a transparent placeholder.
    #[instrument(
        name = "mosaic_job",
        skip_all,
        fields(
            grid = self.config.grid().grid_size(),
            tile = self.config.grid().tile_size(),
            workers = self.config.workers()
        )
    )]
    pub async fn run<W: Write>(&self, sink: W) -> Result<Mosaic, MosaicError> {
        let grid = self.config.grid();
        let mut canvas = Canvas::allocate(grid)?;

        let stats = Arc::new(FetchStats::new());
        let fetcher = TileFetcher::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.decoder),
            FetchSettings {
                urls: self.urls.clone(),
                headers: self.config.headers().clone(),
                timeout: self.config.timeout(),
                max_attempts: self.config.max_attempts(),
                tile_size: grid.tile_size(),
            },
            Arc::clone(&stats),
        );
        let scheduler = TileScheduler::new(fetcher, self.config.workers());

        let mut progress = ProgressReporter::new(grid.tile_count(), sink);
        progress.message(&format!(
            "Starting download with {} workers …",
            self.config.workers()
        ));
        info!(tiles = grid.tile_count(), "Starting mosaic download");

        let mut stream = scheduler.dispatch(grid.coords());
        let mut compositor = Compositor::new(&mut canvas);
        while let Some(outcome) = stream.next().await {
            compositor.composite(&outcome)?;
            progress.record(&outcome);
        }
        let dispatch = stream.finish().await?;
        let coverage = compositor.finish();
        let placeholders = progress.placeholders();
        progress.finish();

        if !coverage.is_complete() {
            return Err(MosaicError::Incomplete {
                missing: coverage.remaining,
            });
        }

        let stats = stats.snapshot();
        info!(
            tiles = dispatch.dispatched,
            placeholders,
            peak_in_flight = dispatch.peak_in_flight,
            attempts = stats.attempts,
            retries = stats.retries,
            downloaded = %stats.format_bytes(),
            rate = %format!("{}/s", format_bytes(stats.avg_bytes_per_sec as u64)),
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Mosaic assembled"
        );

        Ok(Mosaic {
            image: canvas.into_image(),
            report: MosaicReport {
                tiles: dispatch.dispatched,
                placeholders,
                peak_in_flight: dispatch.peak_in_flight,
                stats,
            },
        })
    }

    /// Saves a finished mosaic to the configured output path.
    pub fn save<M: MosaicWriter + ?Sized>(
        &self,
        mosaic: &Mosaic,
        writer: &M,
    ) -> Result<(), MosaicError> {
        writer.write(&mosaic.image, self.config.output())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::ImageFileWriter;
    use crate::provider::{MockTransport, Script, TransportError};
    use crate::tile::png_tile;
    use crate::tile::ImageDecoder;
    use std::time::Duration;

    fn config() -> MosaicConfig {
        MosaicConfig::default()
            .with_url_template("https://tiles.example.com/{prefix}_{x}_{y}.png")
            .with_prefix("7")
            .with_grid_size(2)
            .with_tile_size(2)
            .with_workers(2)
            .with_max_attempts(2)
            .with_timeout(Duration::from_secs(1))
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = MosaicJob::new(
            config().with_workers(0),
            Arc::new(MockTransport::new(Ok(Vec::new()))),
            Arc::new(ImageDecoder),
        );
        assert!(matches!(result, Err(ConfigError::ZeroWorkers)));
    }

    #[tokio::test]
    async fn test_run_assembles_all_tiles() {
        let transport = Arc::new(
            MockTransport::new(Ok(png_tile(2, [0, 0, 255, 255])))
                .with_script(
                    "https://tiles.example.com/7_1_1.png",
                    Script::Always(Err(TransportError::Status(404))),
                )
                .with_script(
                    "https://tiles.example.com/7_0_1.png",
                    Script::FailThenSucceed(1, png_tile(2, [0, 255, 0, 255])),
                ),
        );
        let job = MosaicJob::new(config(), Arc::clone(&transport), Arc::new(ImageDecoder))
            .unwrap();

        let mut output = Vec::new();
        let mosaic = job.run(&mut output).await.unwrap();

        assert_eq!(mosaic.image.dimensions(), (4, 4));
        assert_eq!(mosaic.report.tiles, 4);
        assert_eq!(mosaic.report.placeholders, 1);
        assert_eq!(mosaic.report.fetched(), 3);
        assert_eq!(mosaic.report.stats.retries, 2);
        assert!(mosaic.report.peak_in_flight <= 2);

        assert_eq!(mosaic.image.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(mosaic.image.get_pixel(1, 3).0, [0, 255, 0, 255]);
        assert_eq!(mosaic.image.get_pixel(3, 3).0, [0, 0, 0, 0]);
        assert_eq!(transport.calls_for("https://tiles.example.com/7_1_1.png"), 2);

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Starting download with 2 workers"));
        assert!(output.contains("\rDownloaded 4/4"));
    }

    #[tokio::test]
    async fn test_save_writes_configured_output() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("out.png");
        let job = MosaicJob::new(
            config().with_output(&path),
            Arc::new(MockTransport::new(Ok(png_tile(2, [9, 9, 9, 255])))),
            Arc::new(ImageDecoder),
        )
        .unwrap();

        let mosaic = job.run(std::io::sink()).await.unwrap();
        job.save(&mosaic, &ImageFileWriter).unwrap();

        let saved = image::open(&path).unwrap().to_rgba8();
        assert_eq!(saved, mosaic.image);
    }
}
