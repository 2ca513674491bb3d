use std::{path::Path, process::Command};

use crate::{
    foundation::error::EarthwallResult,
    sink::{FillMode, SinkCommand, WallpaperSink, file_uri, run_plan},
};

/// Plasma 6 ships `qdbus6`, Plasma 5 ships `qdbus`.
pub fn find_qdbus() -> Option<&'static str> {
    ["qdbus6", "qdbus"]
        .into_iter()
        .find(|exe| Command::new(exe).arg("--version").output().is_ok())
}

/// Plasma shell scripting over D-Bus, with the `qdbus` binary resolved at startup.
#[derive(Clone, Copy, Debug)]
pub struct KdeSink {
    qdbus: &'static str,
}

impl KdeSink {
    pub fn new(qdbus: &'static str) -> Self {
        Self { qdbus }
    }
}

impl WallpaperSink for KdeSink {
    fn name(&self) -> &'static str {
        "kde"
    }

    fn apply(&self, path: &Path, mode: FillMode) -> EarthwallResult<()> {
        run_plan(&plan(self.qdbus, path, mode)?)
    }
}

pub fn plan(qdbus: &str, path: &Path, mode: FillMode) -> EarthwallResult<Vec<SinkCommand>> {
    let uri = file_uri(path)?;
    let script = format!(
        "var allDesktops = desktops();\n\
         for (var i = 0; i < allDesktops.length; i++) {{\n\
           var d = allDesktops[i];\n\
           d.wallpaperPlugin = 'org.kde.image';\n\
           d.currentConfigGroup = ['Wallpaper', 'org.kde.image', 'General'];\n\
           d.writeConfig('FillMode', '{fill}');\n\
           d.writeConfig('Image', '{uri}');\n\
         }}\n",
        fill = mode.kde_fill_mode(),
        uri = uri.replace('\\', "\\\\").replace('\'', "\\'"),
    );
    Ok(vec![SinkCommand::required(
        qdbus,
        [
            "org.kde.plasmashell".to_string(),
            "/PlasmaShell".to_string(),
            "org.kde.PlasmaShell.evaluateScript".to_string(),
            script,
        ],
    )])
}
