//! Tile grid storage and seam continuity checks
//!
//! The grid stores one optional [`Tile`] per cell in an `ndarray` matrix indexed
//! `[row, column]`. Public accessors take `(x, y)`, i.e. column first, to match
//! canvas coordinates. Cells stay `None` until the solver places them.

use image::Rgb;
use ndarray::Array2;

use crate::math::color::rotate;
use crate::spatial::ports::{Port, PortMap, Routing};

/// One color per port, indexed by the port a path enters through
pub type PortColors = PortMap<Rgb<u8>>;

/// A placed jigsaw piece: routing permutation plus port colors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Routing permutation and its inverse
    pub routing: Routing,
    /// Color of the path entering at each port
    pub colors: PortColors,
}

impl Tile {
    /// Create a tile from its parts
    pub const fn new(routing: Routing, colors: PortColors) -> Self {
        Self { routing, colors }
    }

    /// Color carried by the outgoing lane of `port`, which starts the path at `port`
    pub fn outgoing_color(&self, port: Port) -> Rgb<u8> {
        self.colors[port]
    }

    /// Color of the incoming lane of `port`, painted by the path that exits there
    pub fn incoming_color(&self, port: Port) -> Rgb<u8> {
        self.colors[self.routing.entry(port)]
    }
}

/// Whether the seam between `tile` and the `neighbor` across `port` is continuous
///
/// Each outgoing lane must carry the rotation of the incoming lane it meets.
pub fn seam_is_continuous(tile: &Tile, neighbor: &Tile, port: Port) -> bool {
    let facing = port.opposite();
    tile.outgoing_color(port) == rotate(neighbor.incoming_color(facing))
        && neighbor.outgoing_color(facing) == rotate(tile.incoming_color(port))
}

/// A seam that failed the continuity check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeamBreak {
    /// Column of the tile on the west or north side of the seam
    pub x: usize,
    /// Row of the tile on the west or north side of the seam
    pub y: usize,
    /// Port of that tile facing the seam (`East` or `South`)
    pub port: Port,
}

/// Rectangular grid of optionally placed tiles
#[derive(Clone, Debug)]
pub struct TileGrid {
    tiles: Array2<Option<Tile>>,
}

impl TileGrid {
    /// Create an empty grid of `columns × rows` cells
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            tiles: Array2::from_elem((rows, columns), None),
        }
    }

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.tiles.ncols()
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.tiles.nrows()
    }

    /// Tile at `(x, y)` if the cell exists and has been placed
    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.tiles.get([y, x]).and_then(Option::as_ref)
    }

    /// Mutable tile at `(x, y)` if placed
    pub fn tile_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        self.tiles.get_mut([y, x]).and_then(Option::as_mut)
    }

    /// Store a tile, returning `false` if `(x, y)` is outside the grid
    pub fn place(&mut self, x: usize, y: usize, tile: Tile) -> bool {
        self.tiles.get_mut([y, x]).map(|cell| *cell = Some(tile)).is_some()
    }

    /// Whether every cell holds a tile
    pub fn is_complete(&self) -> bool {
        self.tiles.iter().all(Option::is_some)
    }

    /// Number of placed tiles
    pub fn placed_count(&self) -> usize {
        self.tiles.iter().filter(|cell| cell.is_some()).count()
    }

    /// Coordinates of the cell across `port` from `(x, y)`, if inside the grid
    pub fn neighbor_position(&self, x: usize, y: usize, port: Port) -> Option<(usize, usize)> {
        let (dx, dy) = port.offset();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.columns() && ny < self.rows()).then_some((nx, ny))
    }

    /// Placed tile across `port` from `(x, y)`
    pub fn neighbor(&self, x: usize, y: usize, port: Port) -> Option<&Tile> {
        self.neighbor_position(x, y, port)
            .and_then(|(nx, ny)| self.tile(nx, ny))
    }

    /// Cells in generation order: corner, top row, left column, then the
    /// interior column by column
    pub fn traversal(columns: usize, rows: usize) -> Vec<(usize, usize)> {
        let mut order = Vec::with_capacity(columns * rows);
        if columns == 0 || rows == 0 {
            return order;
        }

        order.push((0, 0));
        order.extend((1..columns).map(|x| (x, 0)));
        order.extend((1..rows).map(|y| (0, y)));
        for x in 1..columns {
            order.extend((1..rows).map(|y| (x, y)));
        }
        order
    }

    /// Every seam between placed neighbors that breaks color continuity
    pub fn seam_breaks(&self) -> Vec<SeamBreak> {
        let mut breaks = Vec::new();
        for y in 0..self.rows() {
            for x in 0..self.columns() {
                let Some(tile) = self.tile(x, y) else {
                    continue;
                };
                for port in [Port::East, Port::South] {
                    if let Some(neighbor) = self.neighbor(x, y, port)
                        && !seam_is_continuous(tile, neighbor, port)
                    {
                        breaks.push(SeamBreak { x, y, port });
                    }
                }
            }
        }
        breaks
    }
}
