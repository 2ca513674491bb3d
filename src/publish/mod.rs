//! Persisting the final image and handing it to the wallpaper sink.

use std::{
    fs::{self, File},
    io::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    compose::raster::FinalImage,
    foundation::error::{EarthwallError, EarthwallResult},
    sink::{FillMode, WallpaperSink},
};

/// Result of a successful write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishReport {
    pub path: PathBuf,
    pub bytes: usize,
    /// `false` when the sink rejected the file; the file itself is still current.
    pub sink_applied: bool,
}

pub struct Publisher {
    sink: Arc<dyn WallpaperSink>,
    fill_mode: FillMode,
}

impl Publisher {
    pub fn new(sink: Arc<dyn WallpaperSink>, fill_mode: FillMode) -> Self {
        Self { sink, fill_mode }
    }

    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }

    /// Encode `img` as PNG, replace `dest` atomically, then apply it as the wallpaper.
    ///
    /// Encode and write failures are errors and skip the sink. Sink failures are logged and
    /// reported through [`PublishReport::sink_applied`].
    pub fn publish(&self, img: &FinalImage, dest: &Path) -> EarthwallResult<PublishReport> {
        let bytes = img
            .encode_png()
            .map_err(|e| EarthwallError::publish(format!("{e:#}")))?;
        write_atomic(dest, &bytes)?;
        tracing::info!(path = %dest.display(), bytes = bytes.len(), "wallpaper saved");

        let sink_applied = match self.sink.apply(dest, self.fill_mode) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(sink = self.sink.name(), error = %e, "failed to apply wallpaper");
                false
            }
        };

        Ok(PublishReport {
            path: dest.to_path_buf(),
            bytes: bytes.len(),
            sink_applied,
        })
    }
}

/// Write `bytes` to a sibling temp file and rename it over `path`, so readers see either the
/// old file or the complete new one.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> EarthwallResult<()> {
    let dir = path.parent().ok_or_else(|| {
        EarthwallError::publish(format!("invalid output path '{}'", path.display()))
    })?;
    fs::create_dir_all(dir)
        .map_err(|e| EarthwallError::publish(format!("create dir '{}': {e}", dir.display())))?;

    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("earthwall");
    let tmp = dir.join(format!(".{name}.{}.tmp", std::process::id()));

    let written = File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(bytes)?;
            f.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(EarthwallError::publish(format!("write '{}': {e}", path.display())));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/publish/publisher.rs"]
mod tests;
