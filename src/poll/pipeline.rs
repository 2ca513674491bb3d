use std::{path::PathBuf, sync::Arc};

use crate::{
    compose::{
        border::pad,
        fetcher::TileFetcher,
        grid::{AssembleStats, GridAssembler},
    },
    config::Config,
    foundation::{core::Timestamp, error::EarthwallResult},
    publish::{PublishReport, Publisher},
    sink::WallpaperSink,
    source::{
        http_client,
        metadata::{HttpMetadataSource, MetadataSource},
        tile::HttpTileSource,
    },
    state::{
        freshness::StalenessTracker,
        status::{DisplayStatus, StatusReporter},
    },
};

/// What one poll cycle did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A newer image was composed, written and handed to the sink.
    Applied {
        timestamp: Timestamp,
        report: PublishReport,
        stats: AssembleStats,
    },
    /// The published date is not newer than the applied one.
    Unchanged { timestamp: Timestamp },
    /// The published date could not be parsed; nothing was claimed.
    Unparsable { raw: String },
    MetadataFailed { message: String },
    /// Claimed, but the reported tiles did not cover the grid.
    ComposeFailed { timestamp: Timestamp, message: String },
    /// Claimed and composed, but the file could not be written.
    PublishFailed { timestamp: Timestamp, message: String },
}

impl CycleOutcome {
    /// Whether the claim succeeded and tile work was attempted.
    pub fn claimed(&self) -> bool {
        matches!(
            self,
            CycleOutcome::Applied { .. }
                | CycleOutcome::ComposeFailed { .. }
                | CycleOutcome::PublishFailed { .. }
        )
    }
}

impl std::fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleOutcome::Applied {
                timestamp,
                report,
                stats,
            } => write!(
                f,
                "applied {timestamp} -> {} ({} tiles, {} placeholders, sink {})",
                report.path.display(),
                stats.tiles,
                stats.placeholders,
                if report.sink_applied { "ok" } else { "failed" }
            ),
            CycleOutcome::Unchanged { timestamp } => write!(f, "unchanged ({timestamp})"),
            CycleOutcome::Unparsable { raw } => write!(f, "unparsable date '{raw}'"),
            CycleOutcome::MetadataFailed { message } => write!(f, "metadata failed: {message}"),
            CycleOutcome::ComposeFailed { timestamp, message } => {
                write!(f, "compose failed for {timestamp}: {message}")
            }
            CycleOutcome::PublishFailed { timestamp, message } => {
                write!(f, "publish failed for {timestamp}: {message}")
            }
        }
    }
}

/// Collaborators of a [`Pipeline`].
pub struct PipelineParts {
    pub metadata: Arc<dyn MetadataSource>,
    pub assembler: GridAssembler,
    pub publisher: Publisher,
    pub tracker: Arc<StalenessTracker>,
    pub reporter: Arc<dyn StatusReporter>,
    pub border_rgba: [u8; 4],
    pub output_path: PathBuf,
}

/// One staleness-gated fetch-and-compose cycle: metadata, claim, tiles, border, publish.
pub struct Pipeline {
    metadata: Arc<dyn MetadataSource>,
    assembler: GridAssembler,
    publisher: Publisher,
    tracker: Arc<StalenessTracker>,
    reporter: Arc<dyn StatusReporter>,
    border_rgba: [u8; 4],
    output_path: PathBuf,
}

impl Pipeline {
    pub fn new(parts: PipelineParts) -> Self {
        Self {
            metadata: parts.metadata,
            assembler: parts.assembler,
            publisher: parts.publisher,
            tracker: parts.tracker,
            reporter: parts.reporter,
            border_rgba: parts.border_rgba,
            output_path: parts.output_path,
        }
    }

    /// Wire the HTTP providers described by `cfg`.
    pub fn from_config(
        cfg: &Config,
        sink: Arc<dyn WallpaperSink>,
        tracker: Arc<StalenessTracker>,
        reporter: Arc<dyn StatusReporter>,
    ) -> EarthwallResult<Self> {
        cfg.validate()?;
        let spec = cfg.grid_spec()?;
        let client = http_client(cfg.http_timeout())?;
        let tiles = HttpTileSource::new(client.clone(), cfg.tile_base_url.clone(), spec);
        let fetcher = TileFetcher::new(Arc::new(tiles), spec.tile_size);
        Ok(Self::new(PipelineParts {
            metadata: Arc::new(HttpMetadataSource::new(client, cfg.metadata_url.clone())),
            assembler: GridAssembler::new(fetcher, spec, cfg.fetch_threads)?,
            publisher: Publisher::new(sink, cfg.fill_mode),
            tracker,
            reporter,
            border_rgba: cfg.border_rgba,
            output_path: cfg.resolved_output_path(),
        }))
    }

    pub fn tracker(&self) -> &Arc<StalenessTracker> {
        &self.tracker
    }

    pub fn reporter(&self) -> &Arc<dyn StatusReporter> {
        &self.reporter
    }

    pub fn output_path(&self) -> &std::path::Path {
        &self.output_path
    }

    /// Run one tick. Never fails: every error is logged, reported and folded into the outcome.
    #[tracing::instrument(skip(self))]
    pub fn run_cycle(&self) -> CycleOutcome {
        let raw = match self.metadata.latest_date() {
            Ok(raw) => raw,
            Err(e) => {
                let message = format!("{e:#}");
                tracing::warn!(error = %message, "failed to fetch latest image info");
                self.reporter.report(DisplayStatus::FetchError);
                return CycleOutcome::MetadataFailed { message };
            }
        };

        let timestamp = match Timestamp::parse(&raw) {
            Ok(ts) => ts,
            Err(e) => {
                tracing::warn!(error = %e, "latest image date is not parseable");
                self.reporter.report(DisplayStatus::Date(raw.clone()));
                return CycleOutcome::Unparsable { raw };
            }
        };

        if !self.tracker.try_claim(timestamp, &raw) {
            tracing::debug!(%timestamp, "no newer image");
            self.reporter.report(DisplayStatus::Date(raw));
            return CycleOutcome::Unchanged { timestamp };
        }

        tracing::info!(%timestamp, "newer image available, composing");
        let outcome = self.compose_and_publish(timestamp);
        self.reporter.report(DisplayStatus::Date(raw));
        outcome
    }

    fn compose_and_publish(&self, timestamp: Timestamp) -> CycleOutcome {
        let (canvas, stats) = match self.assembler.assemble_with_stats(timestamp) {
            Ok(v) => v,
            Err(e) => {
                let message = format!("{e:#}");
                tracing::error!(%timestamp, error = %message, "grid assembly failed");
                return CycleOutcome::ComposeFailed { timestamp, message };
            }
        };

        let bordered = pad(&canvas, self.assembler.spec().border, self.border_rgba);
        drop(canvas);

        match self.publisher.publish(&bordered, &self.output_path) {
            Ok(report) => CycleOutcome::Applied {
                timestamp,
                report,
                stats,
            },
            Err(e) => {
                let message = format!("{e:#}");
                tracing::error!(%timestamp, error = %message, "publishing wallpaper failed");
                CycleOutcome::PublishFailed { timestamp, message }
            }
        }
    }
}
