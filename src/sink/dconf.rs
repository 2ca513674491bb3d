//! GNOME forks that are configured through raw `dconf write`.

use std::path::Path;

use crate::{
    foundation::error::EarthwallResult,
    sink::{FillMode, SinkCommand, WallpaperSink, file_uri, run_plan, utf8_path},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DconfDesktop {
    Mate,
    Cinnamon,
    Deepin,
}

impl DconfDesktop {
    pub fn name(self) -> &'static str {
        match self {
            DconfDesktop::Mate => "mate",
            DconfDesktop::Cinnamon => "cinnamon",
            DconfDesktop::Deepin => "deepin",
        }
    }

    fn base(self) -> &'static str {
        match self {
            DconfDesktop::Mate => "/org/mate/desktop/background",
            DconfDesktop::Cinnamon => "/org/cinnamon/desktop/background",
            DconfDesktop::Deepin => "/com/deepin/wrap/gnome/desktop/background",
        }
    }
}

/// GVariant string literal.
fn gvariant_str(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

pub fn plan(
    desktop: DconfDesktop,
    path: &Path,
    mode: FillMode,
) -> EarthwallResult<Vec<SinkCommand>> {
    let base = desktop.base();
    // MATE stores a plain filename, the others a file:// URI.
    let (key, value) = match desktop {
        DconfDesktop::Mate => ("picture-filename", utf8_path(path)?.to_string()),
        DconfDesktop::Cinnamon | DconfDesktop::Deepin => ("picture-uri", file_uri(path)?),
    };
    Ok(vec![
        SinkCommand::required(
            "dconf",
            [
                "write".to_string(),
                format!("{base}/picture-options"),
                gvariant_str(mode.gnome_option()),
            ],
        ),
        SinkCommand::required(
            "dconf",
            ["write".to_string(), format!("{base}/{key}"), gvariant_str(&value)],
        ),
    ])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DconfSink(pub DconfDesktop);

impl WallpaperSink for DconfSink {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn apply(&self, path: &Path, mode: FillMode) -> EarthwallResult<()> {
        run_plan(&plan(self.0, path, mode)?)
    }
}
