//! Desktop wallpaper backends.
//!
//! Every backend turns `(path, fill mode)` into a short plan of external commands
//! (`gsettings`, `dconf`, `qdbus`, `osascript`) that is then run in order. The backend is chosen
//! once at startup from [`detect::detect_desktop`] by [`select_sink`].

use std::{
    path::Path,
    process::{Command, Stdio},
    sync::Arc,
};

use crate::foundation::error::{EarthwallError, EarthwallResult};

pub(crate) mod dconf;
pub(crate) mod detect;
pub(crate) mod gnome;
pub(crate) mod kde;
pub(crate) mod macos;

use detect::Desktop;

/// How the desktop should fit the image to the screen.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    Center,
    Crop,
    /// Scale to fit, keeping aspect ratio. The bordered disk relies on this.
    #[default]
    Fit,
    Span,
    Stretch,
    Tile,
}

impl FillMode {
    pub const ALL: [FillMode; 6] = [
        FillMode::Center,
        FillMode::Crop,
        FillMode::Fit,
        FillMode::Span,
        FillMode::Stretch,
        FillMode::Tile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FillMode::Center => "center",
            FillMode::Crop => "crop",
            FillMode::Fit => "fit",
            FillMode::Span => "span",
            FillMode::Stretch => "stretch",
            FillMode::Tile => "tile",
        }
    }

    /// `picture-options` value understood by GNOME and its dconf-based forks.
    pub fn gnome_option(self) -> &'static str {
        match self {
            FillMode::Center => "centered",
            FillMode::Crop => "zoom",
            FillMode::Fit => "scaled",
            FillMode::Span => "spanned",
            FillMode::Stretch => "stretched",
            FillMode::Tile => "wallpaper",
        }
    }

    /// Plasma `org.kde.image` FillMode.
    pub fn kde_fill_mode(self) -> u8 {
        match self {
            FillMode::Center => 6,
            FillMode::Crop | FillMode::Span => 2,
            FillMode::Fit => 1,
            FillMode::Stretch => 0,
            FillMode::Tile => 3,
        }
    }
}

impl std::fmt::Display for FillMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FillMode {
    type Err = EarthwallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FillMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                EarthwallError::config(format!(
                    "unknown fill mode '{s}' (expected one of center, crop, fit, span, stretch, tile)"
                ))
            })
    }
}

/// Capability to show an image file as the desktop background.
pub trait WallpaperSink: Send + Sync {
    fn name(&self) -> &'static str;

    /// `path` must be absolute and fully written before this is called.
    fn apply(&self, path: &Path, mode: FillMode) -> EarthwallResult<()>;
}

/// One external command of a backend plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Failure of a best-effort command is logged and ignored.
    pub required: bool,
}

impl SinkCommand {
    pub fn required<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            required: true,
        }
    }

    pub fn best_effort<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: false,
            ..Self::required(program, args)
        }
    }

    fn run(&self) -> EarthwallResult<()> {
        let out = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| EarthwallError::sink(format!("failed to run {}: {e}", self.program)))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(EarthwallError::sink(format!(
                "{} exited with {}: {}",
                self.program,
                out.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Run `plan` in order, stopping at the first failing required command.
pub fn run_plan(plan: &[SinkCommand]) -> EarthwallResult<()> {
    for cmd in plan {
        match cmd.run() {
            Ok(()) => {}
            Err(e) if cmd.required => return Err(e),
            Err(e) => {
                tracing::debug!(program = %cmd.program, error = %e, "best-effort command failed")
            }
        }
    }
    Ok(())
}

/// `file://` URI for an absolute path.
pub(crate) fn file_uri(path: &Path) -> EarthwallResult<String> {
    Ok(format!("file://{}", utf8_path(path)?))
}

pub(crate) fn utf8_path(path: &Path) -> EarthwallResult<&str> {
    path.to_str()
        .ok_or_else(|| EarthwallError::sink(format!("path is not valid UTF-8: {}", path.display())))
}

/// Accepts every request without touching the desktop.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl WallpaperSink for NoopSink {
    fn name(&self) -> &'static str {
        "none"
    }

    fn apply(&self, path: &Path, _mode: FillMode) -> EarthwallResult<()> {
        tracing::info!(path = %path.display(), "no wallpaper backend, image left on disk");
        Ok(())
    }
}

/// Pick the backend for `desktop`, probing for helper programs once. Unsupported desktops and
/// a KDE session without `qdbus` get a [`NoopSink`].
pub fn select_sink(desktop: Desktop) -> Arc<dyn WallpaperSink> {
    select_sink_with(desktop, kde::find_qdbus)
}

pub(crate) fn select_sink_with(
    desktop: Desktop,
    find_qdbus: impl FnOnce() -> Option<&'static str>,
) -> Arc<dyn WallpaperSink> {
    match desktop {
        Desktop::Gnome => Arc::new(gnome::GnomeSink),
        Desktop::Kde => match find_qdbus() {
            Some(qdbus) => Arc::new(kde::KdeSink::new(qdbus)),
            None => {
                tracing::warn!("KDE detected but neither qdbus6 nor qdbus is available");
                Arc::new(NoopSink)
            }
        },
        Desktop::Mate => Arc::new(dconf::DconfSink(dconf::DconfDesktop::Mate)),
        Desktop::Cinnamon => Arc::new(dconf::DconfSink(dconf::DconfDesktop::Cinnamon)),
        Desktop::Deepin => Arc::new(dconf::DconfSink(dconf::DconfDesktop::Deepin)),
        Desktop::MacOs => Arc::new(macos::MacSink),
        Desktop::Unknown => {
            tracing::warn!("desktop environment not recognized, wallpaper will not be applied");
            Arc::new(NoopSink)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sink/backends.rs"]
mod tests;
