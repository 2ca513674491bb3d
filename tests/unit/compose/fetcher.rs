use image::Rgba;

use super::*;
use crate::compose::raster::FinalImage;

enum Reply {
    Png(u32),
    Bytes(&'static [u8]),
    Fail,
}

struct OneShot(Reply);

impl TileSource for OneShot {
    fn fetch_tile(&self, _ts: Timestamp, _coord: GridCoord) -> EarthwallResult<Vec<u8>> {
        match &self.0 {
            Reply::Png(edge) => {
                FinalImage::from_image(RgbaImage::from_pixel(*edge, *edge, Rgba([1, 2, 3, 255])))
                    .encode_png()
            }
            Reply::Bytes(b) => Ok(b.to_vec()),
            Reply::Fail => Err(EarthwallError::Other(anyhow::anyhow!(
                "connection refused"
            ))),
        }
    }
}

fn fetch_with(reply: Reply) -> Tile {
    let fetcher = TileFetcher::new(Arc::new(OneShot(reply)), 4);
    let ts = Timestamp::parse("2026-01-11 16:10:00").unwrap();
    fetcher.fetch(GridCoord::new(1, 0), ts)
}

#[test]
fn successful_fetch_decodes_tile() {
    let tile = fetch_with(Reply::Png(4));
    assert!(!tile.placeholder);
    assert_eq!(tile.coord, GridCoord::new(1, 0));
    assert_eq!(tile.image.get_pixel(3, 3), &Rgba([1, 2, 3, 255]));
}

#[test]
fn network_error_yields_placeholder() {
    let tile = fetch_with(Reply::Fail);
    assert!(tile.placeholder);
    assert_eq!(tile.image.dimensions(), (4, 4));
    assert!(tile.image.as_raw().iter().all(|&b| b == 0));
}

#[test]
fn malformed_payload_yields_placeholder() {
    let tile = fetch_with(Reply::Bytes(b"<html>404</html>"));
    assert!(tile.placeholder);
    assert_eq!(tile.image.dimensions(), (4, 4));
}

#[test]
fn wrong_tile_size_yields_placeholder() {
    let tile = fetch_with(Reply::Png(5));
    assert!(tile.placeholder);
    assert_eq!(tile.image.dimensions(), (4, 4));
}
