//! PNG export and import for the pixel canvas

use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::io::error::{Result, TilingError};
use crate::spatial::canvas::Canvas;

/// Export the canvas as an RGB8 PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or saved to the specified path
pub fn export_canvas_as_png(canvas: &Canvas, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| TilingError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    canvas
        .as_image()
        .save_with_format(output_path, ImageFormat::Png)
        .map_err(|e| TilingError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}

/// Load a PNG that must be exactly `width × height` pixels
///
/// Any color type is accepted and converted to RGB8; the image is never
/// resized.
///
/// # Errors
///
/// Returns an error if the file cannot be decoded or has other dimensions
pub fn import_png(input_path: &Path, width: u32, height: u32) -> Result<RgbImage> {
    let img = image::open(input_path).map_err(|e| TilingError::ImageLoad {
        path: input_path.to_path_buf(),
        source: e,
    })?;

    let pixels = img.to_rgb8();
    if pixels.dimensions() != (width, height) {
        return Err(TilingError::DimensionMismatch {
            path: input_path.to_path_buf(),
            expected: (width, height),
            found: pixels.dimensions(),
        });
    }
    Ok(pixels)
}
