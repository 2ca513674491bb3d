//! Tile fetching, grid assembly and border padding.

pub(crate) mod border;
pub(crate) mod fetcher;
pub(crate) mod grid;
pub(crate) mod raster;
