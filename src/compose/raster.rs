use anyhow::Context as _;
use image::{
    RgbaImage,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};

use crate::foundation::{
    core::{GridCoord, Timestamp},
    error::{EarthwallError, EarthwallResult},
};

/// One decoded grid cell.
#[derive(Clone, Debug)]
pub struct Tile {
    pub coord: GridCoord,
    pub timestamp: Timestamp,
    pub image: RgbaImage,
    /// `true` when the download or decode failed and `image` is all zero.
    pub placeholder: bool,
}

impl Tile {
    pub fn placeholder(coord: GridCoord, timestamp: Timestamp, tile_size: u32) -> Self {
        Self {
            coord,
            timestamp,
            image: RgbaImage::new(tile_size, tile_size),
            placeholder: true,
        }
    }
}

/// Assembled tile grid, before the border is added.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Transparent black square of `edge`² pixels.
    pub fn blank(edge: u32) -> Self {
        Self {
            image: RgbaImage::new(edge, edge),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Copy `tile` verbatim with its top-left corner at `(x, y)`.
    pub(crate) fn place(&mut self, tile: &RgbaImage, x: u32, y: u32) -> EarthwallResult<()> {
        let fits_x = x
            .checked_add(tile.width())
            .is_some_and(|r| r <= self.image.width());
        let fits_y = y
            .checked_add(tile.height())
            .is_some_and(|b| b <= self.image.height());
        if !fits_x || !fits_y {
            return Err(EarthwallError::compose(format!(
                "tile {}x{} at ({x}, {y}) exceeds canvas {}x{}",
                tile.width(),
                tile.height(),
                self.image.width(),
                self.image.height()
            )));
        }
        image::imageops::replace(&mut self.image, tile, i64::from(x), i64::from(y));
        Ok(())
    }
}

/// Bordered, publish-ready wallpaper.
#[derive(Clone, Debug, PartialEq)]
pub struct FinalImage {
    image: RgbaImage,
}

impl FinalImage {
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Lossless PNG encoding. Fast compression: the file is rewritten every cycle.
    pub fn encode_png(&self) -> EarthwallResult<Vec<u8>> {
        let mut buf = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut buf, CompressionType::Fast, FilterType::Adaptive);
        self.image
            .write_with_encoder(encoder)
            .context("encode final image as png")?;
        Ok(buf)
    }
}

pub fn decode_png(bytes: &[u8]) -> EarthwallResult<RgbaImage> {
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .context("decode png from memory")?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/raster.rs"]
mod tests;
