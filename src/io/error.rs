//! Error types and context management for generation and persistence

use std::fmt;
use std::path::PathBuf;

/// Main error type for all generator operations
#[derive(Debug)]
pub enum TilingError {
    /// Configuration or geometry validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// An operation was called with arguments it cannot honor
    ///
    /// Raised before any pixel or tile is written, e.g. for:
    /// - A render region whose size differs from the tile side
    /// - A canvas view that leaves its parent
    /// - A grid cell whose predecessors have not been placed
    PreconditionViolation {
        /// Operation that rejected its input
        operation: &'static str,
        /// Description of the violated precondition
        reason: String,
        /// Grid cell `[column, row]` being processed, when known
        cell: Option<[usize; 2]>,
    },

    /// Rejection sampling ran out of attempts for one cell
    SampleExhaustion {
        /// Column of the cell
        column: usize,
        /// Row of the cell
        row: usize,
        /// Number of routings drawn before giving up
        attempts: usize,
    },

    /// Failed to decode an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// A loaded image does not match the canvas it is read into
    DimensionMismatch {
        /// Path of the loaded image
        path: PathBuf,
        /// Canvas dimensions (width, height)
        expected: (u32, u32),
        /// File dimensions (width, height)
        found: (u32, u32),
    },

    /// A written image read back with different pixels
    VerificationFailed {
        /// Path of the written image
        path: PathBuf,
        /// Number of pixels that differ from the canvas
        differing_pixels: usize,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl TilingError {
    /// Whether the failure comes from reading or writing files rather than generation
    pub const fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::ImageLoad { .. }
                | Self::ImageExport { .. }
                | Self::DimensionMismatch { .. }
                | Self::VerificationFailed { .. }
                | Self::FileSystem { .. }
        )
    }
}

impl fmt::Display for TilingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::PreconditionViolation {
                operation,
                reason,
                cell,
            } => {
                write!(f, "Precondition violated in {operation}: {reason}")?;
                if let Some([column, row]) = cell {
                    write!(f, " (tile {column},{row})")?;
                }
                Ok(())
            }
            Self::SampleExhaustion {
                column,
                row,
                attempts,
            } => {
                write!(
                    f,
                    "No compatible routing for tile {column},{row} after {attempts} attempts"
                )
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::DimensionMismatch {
                path,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Image '{}' is {}x{}, expected {}x{}",
                    path.display(),
                    found.0,
                    found.1,
                    expected.0,
                    expected.1
                )
            }
            Self::VerificationFailed {
                path,
                differing_pixels,
            } => {
                write!(
                    f,
                    "Image '{}' differs from the generated canvas in {differing_pixels} pixels",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for TilingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generator results
pub type Result<T> = std::result::Result<T, TilingError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Grid cell `[column, row]` where the error occurred
    pub cell: Option<[usize; 2]>,
    /// Operation being performed
    pub operation: Option<&'static str>,
}

/// Enriches errors with the cell being processed
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the cell context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the cell context applied
    fn with_cell(self, column: usize, row: usize) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<TilingError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only precondition failures carry positional context
            if let TilingError::PreconditionViolation {
                operation, cell, ..
            } = &mut error
            {
                if cell.is_none() {
                    *cell = context.cell;
                }
                if let Some(op) = context.operation {
                    *operation = op;
                }
            }
            error
        })
    }

    fn with_cell(self, column: usize, row: usize) -> Result<T> {
        self.with_context(ErrorContext {
            cell: Some([column, row]),
            ..Default::default()
        })
    }
}

impl From<image::ImageError> for TilingError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for TilingError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> TilingError {
    TilingError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a precondition error without cell context
pub fn precondition(operation: &'static str, reason: &impl ToString) -> TilingError {
    TilingError::PreconditionViolation {
        operation,
        reason: reason.to_string(),
        cell: None,
    }
}
