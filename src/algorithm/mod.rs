/// Generation pipeline from configuration to canvas
pub mod executor;
/// Single-tile rasterization
pub mod renderer;
/// Continuity-preserving routing shuffle
pub mod shuffle;
/// Greedy rejection-sampling grid solver
pub mod solver;
