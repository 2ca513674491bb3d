use std::path::Path;

use crate::{
    foundation::error::EarthwallResult,
    sink::{FillMode, SinkCommand, WallpaperSink, run_plan, utf8_path},
};

/// System Events has no fill-mode knob; the mode is ignored here.
pub fn plan(path: &Path) -> EarthwallResult<Vec<SinkCommand>> {
    let quoted = format!(
        "\"{}\"",
        utf8_path(path)?.replace('\\', "\\\\").replace('"', "\\\"")
    );
    Ok(vec![SinkCommand::required(
        "osascript",
        [
            "-e".to_string(),
            format!(
                "tell application \"System Events\" to tell every desktop to set picture to {quoted}"
            ),
        ],
    )])
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MacSink;

impl WallpaperSink for MacSink {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn apply(&self, path: &Path, _mode: FillMode) -> EarthwallResult<()> {
        run_plan(&plan(path)?)
    }
}
