//! Progress reporting and fetch statistics.
//!
//! [`ProgressReporter`] renders a single updating line while tiles complete;
//! [`FetchStats`] accumulates counters from the workers.

mod stats;

pub use stats::{format_bytes, FetchStats, FetchStatsSnapshot};

use crate::tile::{FetchOutcome, TileSource};
use std::io::Write;
use tracing::warn;

/// Counts completed tiles and renders `Downloaded done/total` to a sink.
///
/// Output errors are ignored: progress is cosmetic and must never fail a job.
pub struct ProgressReporter<W: Write> {
    sink: W,
    total: usize,
    done: usize,
    placeholders: usize,
    digits: usize,
}

impl<W: Write> ProgressReporter<W> {
    /// Creates a reporter for `total` tiles.
    pub fn new(total: usize, sink: W) -> Self {
        Self {
            sink,
            total,
            done: 0,
            placeholders: 0,
            digits: total.to_string().len(),
        }
    }

    /// Writes a free-form line, such as the start banner.
    pub fn message(&mut self, text: &str) {
        let _ = writeln!(self.sink, "{}", text);
        let _ = self.sink.flush();
    }

    /// Records one completed tile and redraws the progress line.
    pub fn record(&mut self, outcome: &FetchOutcome) {
        self.done += 1;

        if let TileSource::Placeholder {
            attempts,
            last_error,
        } = &outcome.source
        {
            self.placeholders += 1;
            warn!(
                x = outcome.coord.x,
                y = outcome.coord.y,
                attempts,
                error = %last_error,
                "Tile {} left transparent",
                outcome.coord
            );
        }

        let _ = write!(
            self.sink,
            "\rDownloaded {:>width$}/{}",
            self.done,
            self.total,
            width = self.digits
        );
        let _ = self.sink.flush();
    }

    /// Tiles completed so far.
    pub fn done(&self) -> usize {
        self.done
    }

    /// Tiles that ended up as placeholders.
    pub fn placeholders(&self) -> usize {
        self.placeholders
    }

    /// Total tiles expected.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Ends the progress line with a summary and returns the sink.
    pub fn finish(mut self) -> W {
        let _ = writeln!(self.sink);
        if self.placeholders > 0 {
            let _ = writeln!(
                self.sink,
                "{} of {} tiles unavailable, left transparent",
                self.placeholders, self.total
            );
        }
        let _ = self.sink.flush();
        self.sink
    }
}
