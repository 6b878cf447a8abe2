//! Generator constants and runtime configuration defaults

use image::Rgb;

// Tile geometry, in pixels
/// Width of tabs and spokes
pub const DEFAULT_LINE_WIDTH: u32 = 30;
/// Gap between the tile edge, the two lanes of a side and the far edge
pub const DEFAULT_SEPARATION: u32 = 100;
/// Depth of the boundary tabs measured from the tile edge
pub const DEFAULT_STUB_LENGTH: u32 = 50;
/// Thickness of the darker tile border
pub const DEFAULT_BORDER_WIDTH: u32 = 3;

/// Tile border color
pub const BORDER_COLOR: Rgb<u8> = Rgb([64, 64, 64]);
/// Tile background color
pub const FILL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

// Grid defaults
/// Default number of tile columns
pub const DEFAULT_COLUMNS: usize = 10;
/// Default number of tile rows
pub const DEFAULT_ROWS: usize = 10;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

// Sampling parameters
/// Transpositions applied to the identity when drawing a routing
pub const PERMUTATION_SWAPS: usize = 8;
/// Routing draws per cell before sampling is declared exhausted
pub const MAX_PERMUTATION_ATTEMPTS: usize = 10_000;
/// Numerator of the shuffle swap probability
pub const SHUFFLE_SWAP_NUMERATOR: u64 = 3;
/// Denominator of the shuffle swap probability
pub const SHUFFLE_SWAP_DENOMINATOR: u64 = 5;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 1;

// Output settings
/// Output path used when none is given
pub const DEFAULT_OUTPUT: &str = "jigsaw_pattern.png";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
