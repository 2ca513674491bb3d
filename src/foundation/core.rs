use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::foundation::error::{EarthwallError, EarthwallResult};

/// Date format used by the provider's `latest.json` and by status display.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Second-resolution capture time of one full-disk image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Parse a provider date string (`YYYY-MM-DD HH:MM:SS`).
    ///
    /// The layout is strict: every field zero-padded, single separators, no leap seconds. Any
    /// string that does not format back to itself is rejected.
    pub fn parse(raw: &str) -> EarthwallResult<Self> {
        let t = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map_err(|e| EarthwallError::metadata(format!("unparsable image date '{raw}': {e}")))?;
        let ts = Self(t);
        if t.nanosecond() != 0 || ts.to_string() != raw {
            return Err(EarthwallError::metadata(format!(
                "unparsable image date '{raw}': expected {TIMESTAMP_FORMAT} exactly"
            )));
        }
        Ok(ts)
    }

    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> EarthwallResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .map(Self)
            .ok_or_else(|| {
                EarthwallError::config(format!(
                    "invalid timestamp {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                ))
            })
    }

    /// Zero-padded components used to address tiles.
    pub fn url_fields(self) -> UrlFields {
        let t = self.0;
        UrlFields {
            year: format!("{:04}", t.year()),
            month: format!("{:02}", t.month()),
            day: format!("{:02}", t.day()),
            time: format!("{:02}{:02}{:02}", t.hour(), t.minute(), t.second()),
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlFields {
    pub year: String,
    pub month: String,
    pub day: String,
    /// `HHMMSS`
    pub time: String,
}

/// Cell position inside the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCoord {
    pub column: u32,
    pub row: u32,
}

impl GridCoord {
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Geometry of one composition: `grid_size`² tiles of `tile_size`² pixels plus a border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    pub grid_size: u32,
    pub tile_size: u32,
    pub border: u32,
}

impl GridSpec {
    pub fn new(grid_size: u32, tile_size: u32, border: u32) -> EarthwallResult<Self> {
        if grid_size == 0 {
            return Err(EarthwallError::config("grid_size must be > 0"));
        }
        if tile_size == 0 {
            return Err(EarthwallError::config("tile_size must be > 0"));
        }
        let canvas = grid_size
            .checked_mul(tile_size)
            .ok_or_else(|| EarthwallError::config("grid_size * tile_size overflows"))?;
        border
            .checked_mul(2)
            .and_then(|b| b.checked_add(canvas))
            .ok_or_else(|| EarthwallError::config("canvas + 2 * border overflows"))?;
        Ok(Self {
            grid_size,
            tile_size,
            border,
        })
    }

    pub fn tile_count(self) -> usize {
        (self.grid_size as usize) * (self.grid_size as usize)
    }

    /// Edge length of the assembled (unbordered) canvas.
    pub fn canvas_edge(self) -> u32 {
        self.grid_size * self.tile_size
    }

    /// Edge length of the bordered final image.
    pub fn final_edge(self) -> u32 {
        self.canvas_edge() + 2 * self.border
    }

    /// Every coordinate of the grid exactly once, row-major.
    pub fn coords(self) -> Vec<GridCoord> {
        let mut out = Vec::with_capacity(self.tile_count());
        for row in 0..self.grid_size {
            for column in 0..self.grid_size {
                out.push(GridCoord { column, row });
            }
        }
        out
    }

    pub fn contains(self, coord: GridCoord) -> bool {
        coord.column < self.grid_size && coord.row < self.grid_size
    }

    /// Top-left pixel of `coord` on the canvas.
    pub fn tile_origin(self, coord: GridCoord) -> (u32, u32) {
        (coord.column * self.tile_size, coord.row * self.tile_size)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
