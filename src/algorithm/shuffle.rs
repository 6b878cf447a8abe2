//! Post-pass that adds route variety without breaking seam continuity
//!
//! Swapping the exits of two ports that carry the same color leaves every lane
//! color unchanged, so seams stay continuous. The only swaps refused are those
//! touching an anchored port: a U-turn facing a neighbor whose own facing port
//! is also a U-turn, which together close a loop across the seam.

use log::debug;

use crate::math::random::RandomSource;
use crate::spatial::grid::TileGrid;
use crate::spatial::ports::Port;

/// Counters reported by one shuffle pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShuffleStats {
    /// Same-colored port pairs considered
    pub candidates: usize,
    /// Pairs whose exits were swapped
    pub swaps: usize,
    /// Pairs skipped because a port was anchored
    pub skipped_anchored: usize,
}

/// Whether port `port` of the tile at `(x, y)` is anchored
///
/// A port is anchored when its path turns back through itself and the
/// neighbor across it does the same with the facing port.
pub fn is_anchored(grid: &TileGrid, x: usize, y: usize, port: Port) -> bool {
    let Some(tile) = grid.tile(x, y) else {
        return false;
    };
    tile.routing.is_fixed(port)
        && grid
            .neighbor(x, y, port)
            .is_some_and(|neighbor| neighbor.routing.is_fixed(port.opposite()))
}

/// Randomly swaps exits of same-colored, unanchored port pairs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContinuityShuffle {
    numerator: u64,
    denominator: u64,
}

impl ContinuityShuffle {
    /// Swap each eligible pair with probability `numerator / denominator`
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Run the pass over every tile in traversal order
    pub fn apply(&self, grid: &mut TileGrid, random: &mut RandomSource) -> ShuffleStats {
        let mut stats = ShuffleStats::default();
        for (x, y) in TileGrid::traversal(grid.columns(), grid.rows()) {
            self.shuffle_tile(grid, x, y, random, &mut stats);
        }
        debug!(
            "Shuffle: {} swaps over {} candidate pairs, {} anchored skips",
            stats.swaps, stats.candidates, stats.skipped_anchored
        );
        stats
    }

    /// Consider every port pair of one tile
    ///
    /// An anchored first port ends its pairing; an anchored second port only
    /// skips that pair. Anchors are re-evaluated after each swap.
    pub fn shuffle_tile(
        &self,
        grid: &mut TileGrid,
        x: usize,
        y: usize,
        random: &mut RandomSource,
        stats: &mut ShuffleStats,
    ) {
        for (i, first) in Port::ALL.into_iter().enumerate() {
            for second in Port::ALL.into_iter().skip(i + 1) {
                let Some(tile) = grid.tile(x, y) else {
                    return;
                };
                if tile.colors[first] != tile.colors[second] {
                    continue;
                }
                stats.candidates += 1;

                if is_anchored(grid, x, y, first) {
                    stats.skipped_anchored += 1;
                    break;
                }
                if is_anchored(grid, x, y, second) {
                    stats.skipped_anchored += 1;
                    continue;
                }

                if random.weighted_bool(self.numerator, self.denominator)
                    && let Some(tile) = grid.tile_mut(x, y)
                {
                    tile.routing.swap_exits(first, second);
                    stats.swaps += 1;
                }
            }
        }
    }
}
