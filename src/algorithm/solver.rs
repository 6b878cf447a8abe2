//! Greedy per-cell routing and color assignment with rejection sampling
//!
//! Cells are visited in [`TileGrid::traversal`] order so that the west and
//! north neighbors of a cell are always placed first. For each cell a routing
//! is drawn and redrawn until the colors it forces on the new tile agree, then
//! fresh colors are drawn and the forced ones written over them.

use image::Rgb;
use log::{debug, warn};

use crate::io::configuration::MAX_GRID_DIMENSION;
use crate::io::error::{Result, TilingError, invalid_parameter};
use crate::math::color::rotate;
use crate::math::random::RandomSource;
use crate::spatial::grid::{PortColors, Tile, TileGrid};
use crate::spatial::ports::{Port, PortMap, Routing};

/// What to do when a cell exhausts its attempt budget
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExhaustionPolicy {
    /// Fail the whole generation with [`TilingError::SampleExhaustion`]
    #[default]
    Abort,
    /// Keep the last drawn routing; later derivations win conflicts
    Relax,
}

/// Parameters of the rejection sampler
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Grid width in tiles
    pub columns: usize,
    /// Grid height in tiles
    pub rows: usize,
    /// Colors drawn for ports that no neighbor constrains
    pub palette: Vec<Rgb<u8>>,
    /// Transpositions applied per routing draw
    pub permutation_swaps: usize,
    /// Routing draws per cell before giving up
    pub max_attempts: usize,
    /// Behavior once `max_attempts` is reached
    pub exhaustion: ExhaustionPolicy,
}

impl SolverConfig {
    /// Check the solver parameters before any draw
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error for an unusable setup
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [("columns", self.columns), ("rows", self.rows)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }
        if self.palette.is_empty() {
            return Err(invalid_parameter(
                "palette",
                &"[]",
                &"needs at least one color",
            ));
        }
        if self.max_attempts == 0 {
            return Err(invalid_parameter(
                "max_attempts",
                &self.max_attempts,
                &"must be positive",
            ));
        }
        Ok(())
    }
}

/// A color the neighbor across `facing` forces onto one port of the new tile
pub type Derivation = (Port, Rgb<u8>);

/// The two colors a placed `neighbor` across `facing` forces on a candidate routing
///
/// The facing port inherits the rotated color of the neighbor's incoming lane.
/// The port routed into the facing port must rotate into the neighbor's
/// outgoing color, so it takes the inverse rotation of that color.
pub fn derivations(routing: &Routing, neighbor: &Tile, facing: Port) -> [Derivation; 2] {
    let across = facing.opposite();
    [
        (facing, rotate(neighbor.incoming_color(across))),
        (
            routing.entry(facing),
            rotate(rotate(neighbor.outgoing_color(across))),
        ),
    ]
}

/// Whether no two derivations force different colors onto the same port
pub fn derivations_agree(derived: &[Derivation]) -> bool {
    derived.iter().enumerate().all(|(i, &(port, color))| {
        derived
            .iter()
            .skip(i + 1)
            .all(|&(other_port, other_color)| other_port != port || other_color == color)
    })
}

/// Places tiles one cell at a time against their already-placed neighbors
pub struct GridSolver {
    config: SolverConfig,
}

impl GridSolver {
    /// Create a solver
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solver parameters
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve every cell in traversal order
    ///
    /// `on_tile` is called after each placement with the cell coordinates and
    /// the number of routing draws it took.
    ///
    /// # Errors
    ///
    /// Returns the first cell failure; tiles placed before it are left untouched
    pub fn solve(
        &self,
        random: &mut RandomSource,
        mut on_tile: impl FnMut(usize, usize, usize),
    ) -> Result<TileGrid> {
        let mut grid = TileGrid::new(self.config.columns, self.config.rows);
        let mut total_attempts = 0;

        for (x, y) in TileGrid::traversal(self.config.columns, self.config.rows) {
            let (tile, attempts) = self.solve_cell(&grid, x, y, random)?;
            grid.place(x, y, tile);
            total_attempts += attempts;
            on_tile(x, y, attempts);
        }

        debug!(
            "Solved {}x{} grid with {total_attempts} routing draws",
            self.config.columns, self.config.rows
        );
        Ok(grid)
    }

    /// Draw a routing and colors for `(x, y)` given its placed predecessors
    ///
    /// Returns the tile and the number of routing draws used.
    ///
    /// # Errors
    ///
    /// Returns a precondition error if a required predecessor is missing and
    /// a sample exhaustion error if no compatible routing was drawn in time
    /// under [`ExhaustionPolicy::Abort`]
    pub fn solve_cell(
        &self,
        grid: &TileGrid,
        x: usize,
        y: usize,
        random: &mut RandomSource,
    ) -> Result<(Tile, usize)> {
        let west = Self::predecessor(grid, x, y, Port::West)?;
        let north = Self::predecessor(grid, x, y, Port::North)?;
        let constraints: Vec<(Port, &Tile)> = [(Port::West, west), (Port::North, north)]
            .into_iter()
            .filter_map(|(facing, tile)| tile.map(|tile| (facing, tile)))
            .collect();

        let mut attempts = 0;
        let routing = loop {
            let routing = self.draw_routing(random);
            attempts += 1;

            let derived: Vec<Derivation> = constraints
                .iter()
                .flat_map(|&(facing, neighbor)| derivations(&routing, neighbor, facing))
                .collect();
            if derivations_agree(&derived) {
                break routing;
            }

            if attempts >= self.config.max_attempts {
                match self.config.exhaustion {
                    ExhaustionPolicy::Abort => {
                        return Err(TilingError::SampleExhaustion {
                            column: x,
                            row: y,
                            attempts,
                        });
                    }
                    ExhaustionPolicy::Relax => {
                        warn!(
                            "Tile {x},{y}: no compatible routing after {attempts} draws, keeping a conflicting one"
                        );
                        break routing;
                    }
                }
            }
        };

        let mut colors = self.draw_colors(random);
        // West first, then north: north wins if both target one port
        for &(facing, neighbor) in &constraints {
            for (port, color) in derivations(&routing, neighbor, facing) {
                colors[port] = color;
            }
        }

        Ok((Tile::new(routing, colors), attempts))
    }

    fn predecessor(grid: &TileGrid, x: usize, y: usize, facing: Port) -> Result<Option<&Tile>> {
        let Some((nx, ny)) = grid.neighbor_position(x, y, facing) else {
            return Ok(None);
        };
        match grid.tile(nx, ny) {
            Some(tile) => Ok(Some(tile)),
            None => Err(TilingError::PreconditionViolation {
                operation: "solve tile",
                reason: format!("{facing} neighbor {nx},{ny} has not been placed"),
                cell: Some([x, y]),
            }),
        }
    }

    fn draw_routing(&self, random: &mut RandomSource) -> Routing {
        let exits = random.permutation::<4>(self.config.permutation_swaps);
        // A permutation of 0..4 always converts
        Routing::from_exits(exits).unwrap_or_default()
    }

    fn draw_colors(&self, random: &mut RandomSource) -> PortColors {
        let drawn = random.choose_with_replacement(&self.config.palette, 4);
        PortMap::from_fn(|port| {
            drawn
                .get(port.index())
                .copied()
                .unwrap_or(Rgb([0, 0, 0]))
        })
    }
}
