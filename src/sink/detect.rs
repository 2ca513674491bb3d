//! Desktop environment detection.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Desktop {
    Gnome,
    Kde,
    Mate,
    Cinnamon,
    Deepin,
    MacOs,
    Unknown,
}

impl Desktop {
    pub fn name(self) -> &'static str {
        match self {
            Desktop::Gnome => "gnome",
            Desktop::Kde => "kde",
            Desktop::Mate => "mate",
            Desktop::Cinnamon => "cinnamon",
            Desktop::Deepin => "deepin",
            Desktop::MacOs => "macos",
            Desktop::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Desktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn detect_desktop() -> Desktop {
    let current = std::env::var("XDG_CURRENT_DESKTOP").ok();
    let session = std::env::var("DESKTOP_SESSION").ok();
    detect_desktop_from(std::env::consts::OS, current.as_deref(), session.as_deref())
}

/// `current` is the colon-separated `XDG_CURRENT_DESKTOP`; `session` is `DESKTOP_SESSION`,
/// consulted only when `current` names nothing we know.
pub fn detect_desktop_from(os: &str, current: Option<&str>, session: Option<&str>) -> Desktop {
    if os == "macos" {
        return Desktop::MacOs;
    }
    for value in [current, session].into_iter().flatten() {
        for token in value.split(':') {
            if let Some(d) = match_token(token) {
                return d;
            }
        }
    }
    Desktop::Unknown
}

fn match_token(token: &str) -> Option<Desktop> {
    let t = token.trim().to_ascii_lowercase();
    match t.as_str() {
        "x-cinnamon" | "cinnamon" => Some(Desktop::Cinnamon),
        "mate" => Some(Desktop::Mate),
        "deepin" | "dde" => Some(Desktop::Deepin),
        "kde" | "plasma" | "plasmawayland" | "plasmax11" => Some(Desktop::Kde),
        "gnome" | "gnome-xorg" | "gnome-wayland" | "unity" | "ubuntu" | "pop"
        | "budgie-desktop" => Some(Desktop::Gnome),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sink/detect.rs"]
mod tests;
