use image::{Rgba, RgbaImage};

use crate::compose::raster::{Canvas, FinalImage};

/// Pad `canvas` with `border` pixels of `fill_rgba` on every side.
///
/// The canvas is copied unmodified at `(border, border)`; nothing is scaled.
pub fn pad(canvas: &Canvas, border: u32, fill_rgba: [u8; 4]) -> FinalImage {
    let src = canvas.as_image();
    let mut out = RgbaImage::from_pixel(
        src.width() + 2 * border,
        src.height() + 2 * border,
        Rgba(fill_rgba),
    );
    image::imageops::replace(&mut out, src, i64::from(border), i64::from(border));
    FinalImage::from_image(out)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/border.rs"]
mod tests;
