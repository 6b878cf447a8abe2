//! Input/output and ambient infrastructure
//!
//! This module contains:
//! - Command-line parsing and the generation driver
//! - Named constants for defaults and limits
//! - The error type shared by every operation
//! - PNG persistence and progress display

/// Command-line arguments and the generation driver
pub mod cli;
/// Default values and limits
pub mod configuration;
/// Error types and context propagation
pub mod error;
/// PNG export and import
pub mod image;
/// Progress bars for pipeline phases
pub mod progress;
