#![allow(dead_code)]

use std::{
    collections::{BTreeSet, VecDeque},
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use earthwall::{
    DisplayStatus, EarthwallError, EarthwallResult, FillMode, FinalImage, GridAssembler,
    GridCoord, GridSpec, MetadataSource, Pipeline, PipelineParts, Publisher, StalenessTracker,
    StatusReporter, TileFetcher, TileSource, Timestamp, WallpaperSink,
};
use image::{Rgba, RgbaImage};

pub const TILE_RGBA: [u8; 4] = [30, 90, 160, 255];
pub const BORDER_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Replays scripted replies in order, then repeats the last one.
pub struct ScriptedMetadata {
    replies: Mutex<VecDeque<Result<String, String>>>,
    last: Mutex<Option<Result<String, String>>>,
    pub calls: AtomicUsize,
}

impl ScriptedMetadata {
    pub fn new(replies: &[Result<&str, &str>]) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn dates(dates: &[&str]) -> Self {
        let replies: Vec<Result<&str, &str>> = dates.iter().map(|d| Ok(*d)).collect();
        Self::new(&replies)
    }
}

impl MetadataSource for ScriptedMetadata {
    fn latest_date(&self) -> EarthwallResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.replies.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(reply) = next {
            *last = Some(reply);
        }
        match last.clone() {
            Some(Ok(date)) => Ok(date),
            Some(Err(msg)) => Err(EarthwallError::metadata(msg)),
            None => Err(EarthwallError::metadata("script is empty")),
        }
    }
}

/// Serves one solid PNG for every coordinate except the failing ones.
pub struct SolidTiles {
    png: Vec<u8>,
    fail: BTreeSet<GridCoord>,
    pub calls: AtomicUsize,
}

impl SolidTiles {
    pub fn new(tile_size: u32, fail: &[GridCoord]) -> Self {
        let png = FinalImage::from_image(RgbaImage::from_pixel(
            tile_size,
            tile_size,
            Rgba(TILE_RGBA),
        ))
        .encode_png()
        .unwrap();
        Self {
            png,
            fail: fail.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl TileSource for SolidTiles {
    fn fetch_tile(&self, _ts: Timestamp, coord: GridCoord) -> EarthwallResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.contains(&coord) {
            return Err(EarthwallError::Other(anyhow::anyhow!("HTTP 404 for tile {coord}")));
        }
        Ok(self.png.clone())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub calls: Mutex<Vec<(PathBuf, FillMode)>>,
}

impl WallpaperSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn apply(&self, path: &Path, mode: FillMode) -> EarthwallResult<()> {
        self.calls.lock().unwrap().push((path.to_path_buf(), mode));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub history: Mutex<Vec<DisplayStatus>>,
}

impl RecordingReporter {
    pub fn last(&self) -> Option<DisplayStatus> {
        self.history.lock().unwrap().last().cloned()
    }
}

impl StatusReporter for RecordingReporter {
    fn report(&self, status: DisplayStatus) {
        self.history.lock().unwrap().push(status);
    }
}

pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("earthwall_it_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub struct Harness {
    pub pipeline: Arc<Pipeline>,
    pub metadata: Arc<ScriptedMetadata>,
    pub tiles: Arc<SolidTiles>,
    pub sink: Arc<RecordingSink>,
    pub reporter: Arc<RecordingReporter>,
    pub tracker: Arc<StalenessTracker>,
    pub out: PathBuf,
}

pub struct HarnessOpts<'a> {
    pub name: &'a str,
    pub grid_size: u32,
    pub tile_size: u32,
    pub border: u32,
    pub fail: &'a [GridCoord],
}

impl Default for HarnessOpts<'_> {
    fn default() -> Self {
        Self {
            name: "default",
            grid_size: 2,
            tile_size: 8,
            border: 2,
            fail: &[],
        }
    }
}

pub fn harness(metadata: ScriptedMetadata, opts: HarnessOpts<'_>) -> Harness {
    let out = scratch_dir(opts.name).join("wallpaper.png");
    harness_at(metadata, opts, out)
}

pub fn harness_at(metadata: ScriptedMetadata, opts: HarnessOpts<'_>, out: PathBuf) -> Harness {
    let metadata = Arc::new(metadata);
    let tiles = Arc::new(SolidTiles::new(opts.tile_size, opts.fail));
    let sink = Arc::new(RecordingSink::default());
    let reporter = Arc::new(RecordingReporter::default());
    let tracker = Arc::new(StalenessTracker::new());

    let spec = GridSpec::new(opts.grid_size, opts.tile_size, opts.border).unwrap();
    let assembler =
        GridAssembler::new(TileFetcher::new(tiles.clone(), opts.tile_size), spec, None).unwrap();
    let pipeline = Pipeline::new(PipelineParts {
        metadata: metadata.clone(),
        assembler,
        publisher: Publisher::new(sink.clone(), FillMode::Fit),
        tracker: tracker.clone(),
        reporter: reporter.clone(),
        border_rgba: BORDER_RGBA,
        output_path: out.clone(),
    });

    Harness {
        pipeline: Arc::new(pipeline),
        metadata,
        tiles,
        sink,
        reporter,
        tracker,
        out,
    }
}
