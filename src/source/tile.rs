use anyhow::Context as _;

use crate::foundation::{
    core::{GridCoord, GridSpec, Timestamp},
    error::EarthwallResult,
};

/// Per-coordinate retrieval of encoded tile bytes.
pub trait TileSource: Send + Sync {
    fn fetch_tile(&self, ts: Timestamp, coord: GridCoord) -> EarthwallResult<Vec<u8>>;
}

/// Build the tile address for one grid cell.
///
/// `{base}/{grid}d/{tile}/{YYYY}/{MM}/{DD}/{HHMMSS}_{column}_{row}.png`
pub fn tile_url(base: &str, spec: GridSpec, ts: Timestamp, coord: GridCoord) -> String {
    let f = ts.url_fields();
    format!(
        "{}/{}d/{}/{}/{}/{}/{}_{}_{}.png",
        base.trim_end_matches('/'),
        spec.grid_size,
        spec.tile_size,
        f.year,
        f.month,
        f.day,
        f.time,
        coord.column,
        coord.row
    )
}

pub struct HttpTileSource {
    client: reqwest::blocking::Client,
    base_url: String,
    spec: GridSpec,
}

impl HttpTileSource {
    pub fn new(
        client: reqwest::blocking::Client,
        base_url: impl Into<String>,
        spec: GridSpec,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            spec,
        }
    }
}

impl TileSource for HttpTileSource {
    fn fetch_tile(&self, ts: Timestamp, coord: GridCoord) -> EarthwallResult<Vec<u8>> {
        let url = tile_url(&self.base_url, self.spec, ts, coord);
        let body = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .with_context(|| format!("GET {url}"))?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/tile.rs"]
mod tests;
