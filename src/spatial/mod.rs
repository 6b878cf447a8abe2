//! Spatial data structures
//!
//! This module contains spatial-related functionality including:
//! - Port directions and routing permutations
//! - The tile grid and seam continuity checks
//! - The pixel canvas and its sub-views

/// Pixel canvas, sub-views and painters
pub mod canvas;
/// Tile grid storage and continuity checks
pub mod grid;
/// Port directions and routing permutations
pub mod ports;

pub use canvas::{Canvas, CanvasView, Painter};
pub use grid::{PortColors, Tile, TileGrid};
pub use ports::{Port, PortMap, Routing};
