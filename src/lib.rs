//! Procedural generator for grids of four-ported jigsaw tiles
//!
//! Each tile routes the paths entering its four ports to four exits and colors
//! every path. Routings and colors are chosen tile by tile so that each track
//! continues across every seam, shifting through the red, green and blue
//! channels as it crosses from one tile into the next.

#![forbid(unsafe_code)]

/// Grid solving, shuffling, tile rendering and the generation pipeline
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Color rotation and seeded random sampling
pub mod math;
/// Ports, routings, the tile grid and the pixel canvas
pub mod spatial;

pub use io::error::{Result, TilingError};
