//! Mathematical utilities for the generator

/// Channel rotation over RGB colors
pub mod color;
/// Seeded random stream and sampling helpers
pub mod random;
