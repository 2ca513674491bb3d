use image::Rgba;

use super::*;

fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, (x ^ y) as u8, 255 - x as u8]))
}

#[test]
fn placeholder_tile_is_blank_and_flagged() {
    let ts = Timestamp::parse("2026-01-11 16:10:00").unwrap();
    let tile = Tile::placeholder(GridCoord::new(1, 2), ts, 8);
    assert!(tile.placeholder);
    assert_eq!(tile.image.dimensions(), (8, 8));
    assert!(tile.image.as_raw().iter().all(|&b| b == 0));
}

#[test]
fn place_copies_tile_at_offset() {
    let mut canvas = Canvas::blank(6);
    let tile = RgbaImage::from_pixel(3, 3, Rgba([9, 8, 7, 255]));
    canvas.place(&tile, 3, 0).unwrap();

    assert_eq!(canvas.as_image().get_pixel(3, 0), &Rgba([9, 8, 7, 255]));
    assert_eq!(canvas.as_image().get_pixel(5, 2), &Rgba([9, 8, 7, 255]));
    assert_eq!(canvas.as_image().get_pixel(2, 0), &Rgba([0, 0, 0, 0]));
    assert_eq!(canvas.as_image().get_pixel(3, 3), &Rgba([0, 0, 0, 0]));
}

#[test]
fn place_replaces_rather_than_blends() {
    let mut canvas = Canvas::from_image(RgbaImage::from_pixel(2, 2, Rgba([200, 200, 200, 255])));
    let tile = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
    canvas.place(&tile, 0, 0).unwrap();
    assert_eq!(canvas.as_image(), &tile);
}

#[test]
fn place_rejects_out_of_bounds() {
    let mut canvas = Canvas::blank(4);
    let tile = RgbaImage::new(3, 3);
    assert!(canvas.place(&tile, 2, 0).is_err());
    assert!(canvas.place(&tile, 0, u32::MAX).is_err());
}

#[test]
fn png_round_trip_is_lossless() {
    let img = FinalImage::from_image(gradient(37, 21));
    let bytes = img.encode_png().unwrap();
    let back = decode_png(&bytes).unwrap();
    assert_eq!(back.dimensions(), (37, 21));
    assert_eq!(&back, img.as_image());
}

#[test]
fn decode_png_rejects_garbage_and_truncation() {
    assert!(decode_png(b"not a png").is_err());

    let bytes = FinalImage::from_image(gradient(16, 16)).encode_png().unwrap();
    assert!(decode_png(&bytes[..bytes.len() / 2]).is_err());
}
