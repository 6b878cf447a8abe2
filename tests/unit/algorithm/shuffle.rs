//! Tests for anchor detection and the continuity-preserving shuffle

#[cfg(test)]
mod tests {
    use image::Rgb;
    use jigtile::algorithm::shuffle::{ContinuityShuffle, ShuffleStats, is_anchored};
    use jigtile::algorithm::solver::{ExhaustionPolicy, GridSolver, SolverConfig};
    use jigtile::math::color::{BLUE, DEFAULT_PALETTE, GREEN, RED};
    use jigtile::math::random::RandomSource;
    use jigtile::spatial::grid::{Tile, TileGrid};
    use jigtile::spatial::ports::{Port, PortMap, Routing};

    const GRAY: Rgb<u8> = Rgb([5, 5, 5]);

    fn identity_row(columns: usize, color: Rgb<u8>) -> TileGrid {
        let mut grid = TileGrid::new(columns, 1);
        for x in 0..columns {
            grid.place(x, 0, Tile::new(Routing::identity(), PortMap([color; 4])));
        }
        grid
    }

    fn exits(grid: &TileGrid, x: usize, y: usize) -> [usize; 4] {
        grid.tile(x, y)
            .map(|tile| tile.routing.exit_indices())
            .expect("tile placed")
    }

    // Tests anchoring needs a fixed port facing a fixed port
    // Verified by ignoring the neighbor's routing
    #[test]
    fn test_is_anchored() {
        let mut grid = identity_row(2, GRAY);
        assert!(is_anchored(&grid, 0, 0, Port::East));
        assert!(is_anchored(&grid, 1, 0, Port::West));
        assert!(!is_anchored(&grid, 0, 0, Port::West));
        assert!(!is_anchored(&grid, 0, 0, Port::North));
        assert!(!is_anchored(&grid, 5, 5, Port::East));

        if let Some(tile) = grid.tile_mut(1, 0) {
            tile.routing.swap_exits(Port::West, Port::North);
        }
        assert!(!is_anchored(&grid, 0, 0, Port::East));
        assert!(!is_anchored(&grid, 1, 0, Port::West));
    }

    // Tests a lone tile with one color swaps every pair at certain odds
    // Verified by swapping entries instead of exits
    #[test]
    fn test_shuffle_lone_tile() {
        let mut grid = identity_row(1, GRAY);
        let stats = ContinuityShuffle::new(1, 1).apply(&mut grid, &mut RandomSource::new(1));

        assert_eq!(
            stats,
            ShuffleStats {
                candidates: 6,
                swaps: 6,
                skipped_anchored: 0
            }
        );
        assert_eq!(exits(&grid, 0, 0), [3, 2, 1, 0]);
    }

    // Tests anchored first ports end their pairing and anchored second ports skip one pair
    // Verified by continuing past an anchored first port
    #[test]
    fn test_shuffle_respects_anchors() {
        let mut grid = identity_row(2, GRAY);
        let stats = ContinuityShuffle::new(1, 1).apply(&mut grid, &mut RandomSource::new(1));

        assert_eq!(exits(&grid, 0, 0), [3, 1, 2, 0]);
        assert_eq!(exits(&grid, 1, 0), [2, 1, 0, 3]);
        assert_eq!(
            stats,
            ShuffleStats {
                candidates: 11,
                swaps: 6,
                skipped_anchored: 5
            }
        );
        assert!(is_anchored(&grid, 0, 0, Port::East));
        assert!(is_anchored(&grid, 1, 0, Port::West));
    }

    // Tests ports with different colors are never paired
    // Verified by dropping the color comparison
    #[test]
    fn test_shuffle_skips_different_colors() {
        let mut grid = TileGrid::new(1, 1);
        let routing = Routing::from_exits([1, 2, 0, 3]).expect("valid permutation");
        grid.place(0, 0, Tile::new(routing, PortMap([RED, GREEN, BLUE, GRAY])));

        let stats = ContinuityShuffle::new(1, 1).apply(&mut grid, &mut RandomSource::new(1));
        assert_eq!(stats, ShuffleStats::default());
        assert_eq!(exits(&grid, 0, 0), [1, 2, 0, 3]);
    }

    // Tests zero odds leave every routing untouched
    // Verified by swapping regardless of the coin flip
    #[test]
    fn test_shuffle_zero_odds() {
        let mut grid = identity_row(3, GRAY);
        let stats = ContinuityShuffle::new(0, 5).apply(&mut grid, &mut RandomSource::new(4));
        assert_eq!(stats.swaps, 0);
        assert!(stats.candidates > 0);
        for x in 0..3 {
            assert_eq!(exits(&grid, x, 0), [0, 1, 2, 3]);
        }
    }

    // Tests shuffling a solved grid keeps seams continuous, inverses valid and anchors fixed
    // Verified by swapping ports of different colors
    #[test]
    fn test_shuffle_preserves_continuity() {
        for seed in [1, 7, 21] {
            let solver = GridSolver::new(SolverConfig {
                columns: 8,
                rows: 6,
                palette: DEFAULT_PALETTE.to_vec(),
                permutation_swaps: 8,
                max_attempts: 10_000,
                exhaustion: ExhaustionPolicy::Abort,
            });
            let mut random = RandomSource::new(seed);
            let mut grid = solver.solve(&mut random, |_, _, _| {}).expect("solve succeeds");

            let mut anchors = Vec::new();
            for (x, y) in TileGrid::traversal(8, 6) {
                for port in Port::ALL {
                    if is_anchored(&grid, x, y, port) {
                        anchors.push((x, y, port));
                    }
                }
            }
            let before = grid.clone();

            let stats = ContinuityShuffle::new(3, 5).apply(&mut grid, &mut random);
            assert!(stats.swaps > 0, "seed {seed}");
            assert!(grid.seam_breaks().is_empty(), "seed {seed}");

            for &(x, y, port) in &anchors {
                let tile = grid.tile(x, y).expect("tile placed");
                assert!(tile.routing.is_fixed(port));
            }
            for (x, y) in TileGrid::traversal(8, 6) {
                let tile = grid.tile(x, y).expect("tile placed");
                let original = before.tile(x, y).expect("tile placed");
                assert_eq!(tile.colors, original.colors);
                for port in Port::ALL {
                    assert_eq!(tile.routing.exit(tile.routing.entry(port)), port);
                    assert_eq!(tile.incoming_color(port), original.incoming_color(port));
                }
            }
        }
    }
}
