use std::sync::Arc;

use image::RgbaImage;

use crate::{
    compose::raster::{Tile, decode_png},
    foundation::{
        core::{GridCoord, Timestamp},
        error::{EarthwallError, EarthwallResult},
    },
    source::tile::TileSource,
};

/// Downloads and decodes single tiles, degrading every failure to a blank placeholder.
#[derive(Clone)]
pub struct TileFetcher {
    source: Arc<dyn TileSource>,
    tile_size: u32,
}

impl TileFetcher {
    pub fn new(source: Arc<dyn TileSource>, tile_size: u32) -> Self {
        Self { source, tile_size }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Never fails: network, status, body and decode errors are logged and replaced by an
    /// all-zero `tile_size`² tile. The next poll cycle is the retry.
    pub fn fetch(&self, coord: GridCoord, ts: Timestamp) -> Tile {
        match self.try_fetch(coord, ts) {
            Ok(image) => Tile {
                coord,
                timestamp: ts,
                image,
                placeholder: false,
            },
            Err(e) => {
                tracing::warn!(
                    %coord,
                    timestamp = %ts,
                    error = %format_args!("{e:#}"),
                    "tile fetch failed, using blank placeholder"
                );
                Tile::placeholder(coord, ts, self.tile_size)
            }
        }
    }

    fn try_fetch(&self, coord: GridCoord, ts: Timestamp) -> EarthwallResult<RgbaImage> {
        let bytes = self.source.fetch_tile(ts, coord)?;
        let image = decode_png(&bytes)?;
        if image.dimensions() != (self.tile_size, self.tile_size) {
            return Err(EarthwallError::compose(format!(
                "tile {coord} decoded to {}x{}, expected {}x{}",
                image.width(),
                image.height(),
                self.tile_size,
                self.tile_size
            )));
        }
        Ok(image)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/fetcher.rs"]
mod tests;
