use std::{sync::mpsc, time::Instant};

use crate::{
    compose::{
        fetcher::TileFetcher,
        raster::{Canvas, Tile},
    },
    foundation::{
        core::{GridSpec, Timestamp},
        error::{EarthwallError, EarthwallResult},
    },
};

/// Counters for one assembly run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssembleStats {
    /// Tiles written to the canvas (always `grid_size`² on success).
    pub tiles: usize,
    /// Tiles that were blank placeholders.
    pub placeholders: usize,
    pub elapsed_ms: u128,
}

/// Fans tile downloads out over a worker pool and stitches the results by coordinate.
pub struct GridAssembler {
    fetcher: TileFetcher,
    spec: GridSpec,
    pool: rayon::ThreadPool,
}

impl GridAssembler {
    /// `threads = None` sizes the pool to one worker per tile. The pool lives as long as the
    /// assembler, so failing to start workers is reported here rather than per cycle.
    pub fn new(
        fetcher: TileFetcher,
        spec: GridSpec,
        threads: Option<usize>,
    ) -> EarthwallResult<Self> {
        if fetcher.tile_size() != spec.tile_size {
            return Err(EarthwallError::config(format!(
                "fetcher tile size {} does not match grid tile size {}",
                fetcher.tile_size(),
                spec.tile_size
            )));
        }
        if let Some(n) = threads
            && n == 0
        {
            return Err(EarthwallError::config("fetch threads must be >= 1 when set"));
        }
        let pool = build_fetch_pool(threads.unwrap_or(spec.tile_count()))?;
        Ok(Self {
            fetcher,
            spec,
            pool,
        })
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn assemble(&self, ts: Timestamp) -> EarthwallResult<Canvas> {
        self.assemble_with_stats(ts).map(|(canvas, _)| canvas)
    }

    /// Fetch every cell of the grid for `ts` and return the complete canvas.
    ///
    /// Returns only once all `grid_size`² fetches have reported; tiles are placed in completion
    /// order, keyed by coordinate. Fails only if the reported tiles do not cover the grid.
    #[tracing::instrument(skip(self), fields(grid = self.spec.grid_size))]
    pub fn assemble_with_stats(
        &self,
        ts: Timestamp,
    ) -> EarthwallResult<(Canvas, AssembleStats)> {
        let started = Instant::now();
        let coords = self.spec.coords();

        let mut canvas = Canvas::blank(self.spec.canvas_edge());
        let mut stats = AssembleStats::default();
        let mut placed = vec![false; coords.len()];

        let fetcher = &self.fetcher;
        let (tx, rx) = mpsc::channel::<Tile>();
        self.pool.in_place_scope(|s| -> EarthwallResult<()> {
            for &coord in &coords {
                let tx = tx.clone();
                s.spawn(move |_| {
                    // Receiver only goes away on an earlier placement error.
                    let _ = tx.send(fetcher.fetch(coord, ts));
                });
            }
            drop(tx);

            for tile in rx.iter() {
                self.place_tile(&mut canvas, &mut placed, &tile)?;
                stats.tiles += 1;
                if tile.placeholder {
                    stats.placeholders += 1;
                }
            }
            Ok(())
        })?;

        if stats.tiles != coords.len() {
            return Err(EarthwallError::compose(format!(
                "only {} of {} tiles reported",
                stats.tiles,
                coords.len()
            )));
        }

        stats.elapsed_ms = started.elapsed().as_millis();
        tracing::info!(
            tiles = stats.tiles,
            placeholders = stats.placeholders,
            ms = stats.elapsed_ms,
            "grid assembled"
        );
        Ok((canvas, stats))
    }

    fn place_tile(
        &self,
        canvas: &mut Canvas,
        placed: &mut [bool],
        tile: &Tile,
    ) -> EarthwallResult<()> {
        if !self.spec.contains(tile.coord) {
            return Err(EarthwallError::compose(format!(
                "tile {} lies outside the {}x{} grid",
                tile.coord, self.spec.grid_size, self.spec.grid_size
            )));
        }
        let slot = (tile.coord.row * self.spec.grid_size + tile.coord.column) as usize;
        if std::mem::replace(&mut placed[slot], true) {
            return Err(EarthwallError::compose(format!("tile {} reported twice", tile.coord)));
        }
        let (x, y) = self.spec.tile_origin(tile.coord);
        canvas.place(&tile.image, x, y)
    }
}

fn build_fetch_pool(threads: usize) -> EarthwallResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("earthwall-tile-{i}"))
        .build()
        .map_err(|e| EarthwallError::compose(format!("failed to build tile fetch pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/grid.rs"]
mod tests;
