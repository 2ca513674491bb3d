//! Earthwall keeps the desktop background in sync with the latest full-disk image from the
//! Himawari weather satellite.
//!
//! Each poll cycle:
//!
//! - Asks a [`MetadataSource`] for the date of the newest image
//! - Claims it through the [`StalenessTracker`] if it is strictly newer than the applied one
//! - Fetches the tile grid concurrently with a [`GridAssembler`] and pads it with a border
//! - Writes the PNG atomically and hands it to a [`WallpaperSink`] via the [`Publisher`]
//!
//! [`Pipeline`] runs a single cycle; [`PollLoop`] drives it on an interval.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod compose;
/// JSON configuration and its defaults.
pub mod config;
pub(crate) mod poll;
pub(crate) mod publish;
pub(crate) mod sink;
pub(crate) mod source;
pub(crate) mod state;

pub use crate::foundation::core::{GridCoord, GridSpec, TIMESTAMP_FORMAT, Timestamp, UrlFields};
pub use crate::foundation::error::{EarthwallError, EarthwallResult};

pub use crate::compose::border::pad;
pub use crate::compose::fetcher::TileFetcher;
pub use crate::compose::grid::{AssembleStats, GridAssembler};
pub use crate::compose::raster::{Canvas, FinalImage, Tile, decode_png};
pub use crate::config::Config;
pub use crate::poll::pipeline::{CycleOutcome, Pipeline, PipelineParts};
pub use crate::poll::poll_loop::{LoopState, PollLoop};
pub use crate::publish::{PublishReport, Publisher, write_atomic};
pub use crate::sink::detect::{Desktop, detect_desktop, detect_desktop_from};
pub use crate::sink::dconf::{DconfDesktop, DconfSink};
pub use crate::sink::gnome::GnomeSink;
pub use crate::sink::kde::KdeSink;
pub use crate::sink::macos::MacSink;
pub use crate::sink::{FillMode, NoopSink, SinkCommand, WallpaperSink, run_plan, select_sink};
pub use crate::source::http_client;
pub use crate::source::metadata::{HttpMetadataSource, LatestImageInfo, MetadataSource};
pub use crate::source::tile::{HttpTileSource, TileSource, tile_url};
pub use crate::state::freshness::{FreshnessState, StalenessTracker};
pub use crate::state::status::{DisplayStatus, StatusBoard, StatusReporter};
