use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    foundation::core::GridSpec,
    foundation::error::{EarthwallError, EarthwallResult},
    sink::FillMode,
};

/// Provider endpoint returning `{"date": "...", "file": "..."}` for the newest full-disk image.
pub const DEFAULT_METADATA_URL: &str =
    "https://jh170034-1.kudpc.kyoto-u.ac.jp/himawari/img/D531106/latest.json";
/// Root of the tile tree.
///
/// Tiles live under `{base}/{grid}d/{tile}/{Y}/{M}/{D}/{HHMMSS}_{c}_{r}.png`.
pub const DEFAULT_TILE_BASE_URL: &str = "https://anzu.shinshu-u.ac.jp/himawari/img/D531106";
/// File name of the single persisted wallpaper inside the OS temp dir.
pub const OUTPUT_FILE_NAME: &str = "earth_wallpaper_full.png";

/// Runtime configuration. Every field has a default, so an empty JSON object is valid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub metadata_url: String,
    pub tile_base_url: String,
    /// Tiles per edge; also the "resolution" segment of the tile URL.
    pub grid_size: u32,
    pub tile_size: u32,
    /// Padding added on each side of the assembled canvas, in pixels.
    pub border: u32,
    /// Border fill (RGBA8, straight alpha).
    pub border_rgba: [u8; 4],
    pub poll_interval_secs: u64,
    pub http_timeout_secs: u64,
    /// Worker threads for tile downloads; `None` runs every tile concurrently.
    pub fetch_threads: Option<usize>,
    /// Absolute output path; `None` uses the OS temp dir.
    pub output_path: Option<PathBuf>,
    pub fill_mode: FillMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            tile_base_url: DEFAULT_TILE_BASE_URL.to_string(),
            grid_size: 4,
            tile_size: 550,
            border: 180,
            border_rgba: [0, 0, 0, 255],
            poll_interval_secs: 10,
            http_timeout_secs: 30,
            fetch_threads: None,
            output_path: None,
            fill_mode: FillMode::default(),
        }
    }
}

impl Config {
    /// Load and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> EarthwallResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            EarthwallError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn from_reader(r: impl Read) -> EarthwallResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| EarthwallError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> EarthwallResult<()> {
        self.grid_spec()?;
        if self.poll_interval_secs == 0 {
            return Err(EarthwallError::config("poll_interval_secs must be > 0"));
        }
        if self.http_timeout_secs == 0 {
            return Err(EarthwallError::config("http_timeout_secs must be > 0"));
        }
        if let Some(n) = self.fetch_threads
            && n == 0
        {
            return Err(EarthwallError::config("fetch_threads must be >= 1 when set"));
        }
        if let Some(p) = &self.output_path
            && !p.is_absolute()
        {
            return Err(EarthwallError::config(format!(
                "output_path '{}' must be absolute",
                p.display()
            )));
        }
        Ok(())
    }

    pub fn grid_spec(&self) -> EarthwallResult<GridSpec> {
        GridSpec::new(self.grid_size, self.tile_size, self.border)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Where the composed wallpaper is written each cycle.
    pub fn resolved_output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(OUTPUT_FILE_NAME))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
