//! Generation pipeline: solve the grid, shuffle routings, render into one canvas

use std::fmt;

use image::Rgb;
use log::{debug, info, warn};

use crate::algorithm::renderer::{TileGeometry, TileRenderer};
use crate::algorithm::shuffle::{ContinuityShuffle, ShuffleStats};
use crate::algorithm::solver::{ExhaustionPolicy, GridSolver, SolverConfig};
use crate::io::configuration::{
    DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_SEED, MAX_PERMUTATION_ATTEMPTS, PERMUTATION_SWAPS,
    SHUFFLE_SWAP_DENOMINATOR, SHUFFLE_SWAP_NUMERATOR,
};
use crate::io::error::{Result, WithContext, invalid_parameter, precondition};
use crate::math::color::{DEFAULT_PALETTE, is_closed_under_rotation};
use crate::math::random::RandomSource;
use crate::spatial::canvas::Canvas;
use crate::spatial::grid::{PortColors, TileGrid};
use crate::spatial::ports::{PortMap, Routing};

/// Everything needed to reproduce one generated image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Grid width in tiles
    pub columns: usize,
    /// Grid height in tiles
    pub rows: usize,
    /// Seed of the random stream shared by solving and shuffling
    pub seed: u64,
    /// Pixel dimensions of each tile
    pub geometry: TileGeometry,
    /// Colors drawn for unconstrained ports
    pub palette: Vec<Rgb<u8>>,
    /// Transpositions per routing draw
    pub permutation_swaps: usize,
    /// Routing draws per cell before the exhaustion policy applies
    pub max_attempts: usize,
    /// Behavior when a cell runs out of attempts
    pub exhaustion: ExhaustionPolicy,
    /// Whether to run the continuity-preserving shuffle
    pub shuffle: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            seed: DEFAULT_SEED,
            geometry: TileGeometry::default(),
            palette: DEFAULT_PALETTE.to_vec(),
            permutation_swaps: PERMUTATION_SWAPS,
            max_attempts: MAX_PERMUTATION_ATTEMPTS,
            exhaustion: ExhaustionPolicy::default(),
            shuffle: true,
        }
    }
}

impl GenerationConfig {
    /// Check geometry, grid and sampler parameters together
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error for the first inconsistent value,
    /// including a canvas too large for 32-bit pixel coordinates
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        self.solver_config().validate()?;
        self.canvas_size()?;
        if !is_closed_under_rotation(&self.palette) {
            // Derived colors may fall outside the palette
            debug!("Palette is not closed under channel rotation");
        }
        Ok(())
    }

    /// Canvas dimensions `(columns·L, rows·L)` in pixels
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if either side overflows `u32`
    pub fn canvas_size(&self) -> Result<(u32, u32)> {
        let side = self.geometry.side();
        let scale = |parameter: &'static str, count: usize| {
            u32::try_from(count)
                .ok()
                .and_then(|count| count.checked_mul(side))
                .ok_or_else(|| {
                    invalid_parameter(
                        parameter,
                        &count,
                        &format!("canvas side exceeds {} pixels with tile side {side}", u32::MAX),
                    )
                })
        };
        Ok((scale("columns", self.columns)?, scale("rows", self.rows)?))
    }

    /// Parameters handed to the grid solver
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            columns: self.columns,
            rows: self.rows,
            palette: self.palette.clone(),
            permutation_swaps: self.permutation_swaps,
            max_attempts: self.max_attempts,
            exhaustion: self.exhaustion,
        }
    }
}

/// Pipeline stage reported to progress observers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Placing tiles
    Solve,
    /// Swapping same-colored exits
    Shuffle,
    /// Rasterizing tiles into the canvas
    Render,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Solve => "Solving",
            Self::Shuffle => "Shuffling",
            Self::Render => "Rendering",
        };
        f.write_str(name)
    }
}

/// Owns the random stream and the grid across the pipeline stages
///
/// Stages run in a fixed order so that a seed always maps to the same image:
/// [`solve`](Self::solve), then optionally [`shuffle`](Self::shuffle), then
/// [`render`](Self::render).
pub struct JigsawGenerator {
    config: GenerationConfig,
    renderer: TileRenderer,
    random: RandomSource,
    grid: Option<TileGrid>,
}

impl JigsawGenerator {
    /// Validate the configuration and seed the random stream
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if the configuration is inconsistent
    pub fn new(config: GenerationConfig) -> Result<Self> {
        config.validate()?;
        let renderer = TileRenderer::new(config.geometry)?;
        let random = RandomSource::new(config.seed);
        Ok(Self {
            config,
            renderer,
            random,
            grid: None,
        })
    }

    /// Configuration in use
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Solved grid, once [`solve`](Self::solve) has succeeded
    pub const fn grid(&self) -> Option<&TileGrid> {
        self.grid.as_ref()
    }

    /// Tile renderer for the configured geometry
    pub const fn renderer(&self) -> &TileRenderer {
        &self.renderer
    }

    /// Place every tile, calling `on_tile` with the number of tiles placed so far
    ///
    /// # Errors
    ///
    /// Returns the solver failure; no grid is kept in that case
    pub fn solve(&mut self, mut on_tile: impl FnMut(usize)) -> Result<&TileGrid> {
        info!(
            "Solving {}x{} grid with seed {}",
            self.config.columns, self.config.rows, self.config.seed
        );
        self.grid = None;

        let solver = GridSolver::new(self.config.solver_config());
        let mut placed = 0;
        let mut rejected = 0;
        let grid = solver.solve(&mut self.random, |_, _, attempts| {
            placed += 1;
            rejected += attempts.saturating_sub(1);
            on_tile(placed);
        })?;
        debug!("Rejected {rejected} candidate routings");

        Ok(&*self.grid.insert(grid))
    }

    /// Run the continuity-preserving shuffle over the solved grid
    ///
    /// # Errors
    ///
    /// Returns a precondition error if the grid has not been solved
    pub fn shuffle(&mut self) -> Result<ShuffleStats> {
        let grid = self
            .grid
            .as_mut()
            .ok_or_else(|| precondition("shuffle", &"grid has not been solved"))?;

        let shuffle = ContinuityShuffle::new(SHUFFLE_SWAP_NUMERATOR, SHUFFLE_SWAP_DENOMINATOR);
        let stats = shuffle.apply(grid, &mut self.random);
        info!(
            "Shuffle swapped {} exit pairs ({} anchored pairs kept)",
            stats.swaps, stats.skipped_anchored
        );
        Ok(stats)
    }

    /// Rasterize every tile into a fresh canvas at `(x·L, y·L)`
    ///
    /// `on_tile` receives the number of tiles drawn so far.
    ///
    /// # Errors
    ///
    /// Returns a precondition error if the grid is missing or incomplete
    pub fn render(&self, mut on_tile: impl FnMut(usize)) -> Result<Canvas> {
        let grid = self
            .grid
            .as_ref()
            .ok_or_else(|| precondition("render grid", &"grid has not been solved"))?;
        if !grid.is_complete() {
            return Err(precondition(
                "render grid",
                &format!(
                    "{} of {} tiles placed",
                    grid.placed_count(),
                    grid.columns() * grid.rows()
                ),
            ));
        }

        let breaks = grid.seam_breaks();
        if breaks.is_empty() {
            debug!("All seams are continuous");
        } else {
            warn!("{} seams break color continuity", breaks.len());
            for seam in &breaks {
                debug!("Seam break at tile {},{} ({})", seam.x, seam.y, seam.port);
            }
        }

        let (width, height) = self.config.canvas_size()?;
        info!("Rendering {width}x{height} canvas");
        let mut canvas = Canvas::new(width, height);
        let side = self.renderer.side();

        let mut drawn = 0;
        for y in 0..grid.rows() {
            for x in 0..grid.columns() {
                let Some(tile) = grid.tile(x, y) else {
                    continue;
                };
                let (left, top) = tile_origin(x, y, side)
                    .ok_or_else(|| precondition("render grid", &"tile origin overflows"))
                    .with_cell(x, y)?;
                let mut region = canvas.view(left, top, side, side).with_cell(x, y)?;
                self.renderer
                    .render(&mut region, &tile.routing, &tile.colors)
                    .with_cell(x, y)?;
                drawn += 1;
                on_tile(drawn);
            }
        }

        Ok(canvas)
    }

    /// Run solve, shuffle (if enabled) and render without progress reporting
    ///
    /// # Errors
    ///
    /// Returns the first stage failure
    pub fn generate(&mut self) -> Result<Canvas> {
        self.solve(|_| {})?;
        if self.config.shuffle {
            self.shuffle()?;
        }
        self.render(|_| {})
    }
}

fn tile_origin(x: usize, y: usize, side: u32) -> Option<(u32, u32)> {
    let left = u32::try_from(x).ok()?.checked_mul(side)?;
    let top = u32::try_from(y).ok()?.checked_mul(side)?;
    Some((left, top))
}

/// Colors for a standalone piece: port `k` takes `palette[k mod len]`
///
/// # Errors
///
/// Returns an invalid parameter error for an empty palette
pub fn cycled_colors(palette: &[Rgb<u8>]) -> Result<PortColors> {
    if palette.is_empty() {
        return Err(invalid_parameter(
            "palette",
            &"[]",
            &"needs at least one color",
        ));
    }
    Ok(PortMap::from_fn(|port| {
        palette
            .get(port.index() % palette.len())
            .copied()
            .unwrap_or(Rgb([0, 0, 0]))
    }))
}

/// Render a single piece with an explicit routing onto its own canvas
///
/// # Errors
///
/// Returns an invalid parameter error for a bad geometry or an empty palette
pub fn render_piece(
    geometry: TileGeometry,
    routing: &Routing,
    palette: &[Rgb<u8>],
) -> Result<Canvas> {
    let renderer = TileRenderer::new(geometry)?;
    let colors = cycled_colors(palette)?;
    let side = renderer.side();
    info!(
        "Rendering single {side}x{side} piece with exits {:?}",
        routing.exit_indices()
    );

    let piece = renderer.rasterize(routing, &colors);
    let mut canvas = Canvas::new(side, side);
    canvas.paint(&piece);
    Ok(canvas)
}
