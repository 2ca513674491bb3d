use std::path::Path;

use crate::{
    foundation::error::EarthwallResult,
    sink::{FillMode, SinkCommand, WallpaperSink, file_uri, run_plan},
};

const SCHEMA: &str = "org.gnome.desktop.background";

/// Fill mode first, then the picture; the dark variant exists only on GNOME 42+.
pub fn plan(path: &Path, mode: FillMode) -> EarthwallResult<Vec<SinkCommand>> {
    let uri = file_uri(path)?;
    Ok(vec![
        SinkCommand::required(
            "gsettings",
            ["set", SCHEMA, "picture-options", mode.gnome_option()],
        ),
        SinkCommand::required("gsettings", ["set", SCHEMA, "picture-uri", uri.as_str()]),
        SinkCommand::best_effort("gsettings", ["set", SCHEMA, "picture-uri-dark", uri.as_str()]),
    ])
}

/// GNOME and its derivatives (Ubuntu, Pop, Budgie) through `gsettings`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GnomeSink;

impl WallpaperSink for GnomeSink {
    fn name(&self) -> &'static str {
        "gnome"
    }

    fn apply(&self, path: &Path, mode: FillMode) -> EarthwallResult<()> {
        run_plan(&plan(path, mode)?)
    }
}
