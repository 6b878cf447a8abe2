//! Owned RGB pixel canvas with nestable rectangular sub-views
//!
//! Pixels live in one `image::RgbImage`. A [`CanvasView`] borrows that buffer
//! mutably and stores only an origin and a size, so tile code works in local
//! coordinates without ever touching global offsets or raw rows.

use std::path::Path;

use image::{Rgb, RgbImage};
use rayon::iter::ParallelIterator;

use crate::io::error::{Result, precondition};

/// Source of pixel colors addressed in region-local coordinates
pub trait Painter {
    /// Color for the pixel at `(x, y)` relative to the painted region
    fn paint(&self, x: u32, y: u32) -> Rgb<u8>;
}

impl Painter for RgbImage {
    fn paint(&self, x: u32, y: u32) -> Rgb<u8> {
        self.get_pixel_checked(x, y).copied().unwrap_or(Rgb([0, 0, 0]))
    }
}

/// Two-tone fill: `edge` within `width` pixels of the region border, `fill` inside
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderedFill {
    /// Region width in pixels
    pub region_width: u32,
    /// Region height in pixels
    pub region_height: u32,
    /// Border thickness, may be 0
    pub width: u32,
    /// Border color
    pub edge: Rgb<u8>,
    /// Interior color
    pub fill: Rgb<u8>,
}

impl Painter for BorderedFill {
    fn paint(&self, x: u32, y: u32) -> Rgb<u8> {
        let on_border = x < self.width
            || y < self.width
            || x >= self.region_width.saturating_sub(self.width)
            || y >= self.region_height.saturating_sub(self.width);
        if on_border { self.edge } else { self.fill }
    }
}

// Rejects regions that do not fit inside a `width × height` parent
fn check_region(parent: (u32, u32), origin: (u32, u32), size: (u32, u32)) -> Result<()> {
    let fits = |start: u32, len: u32, limit: u32| {
        start.checked_add(len).is_some_and(|end| end <= limit)
    };
    if fits(origin.0, size.0, parent.0) && fits(origin.1, size.1, parent.1) {
        Ok(())
    } else {
        Err(precondition(
            "canvas view",
            &format!(
                "region {}x{} at ({}, {}) exceeds {}x{}",
                size.0, size.1, origin.0, origin.1, parent.0, parent.1
            ),
        ))
    }
}

/// Full-size pixel buffer the generator renders into
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    pixels: RgbImage,
}

impl Canvas {
    /// Create a black canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbImage::new(width, height),
        }
    }

    /// Wrap an existing image
    pub const fn from_image(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Pixel at `(x, y)`, `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// Underlying image
    pub const fn as_image(&self) -> &RgbImage {
        &self.pixels
    }

    /// Overwrite every pixel from `painter`
    ///
    /// Pixels are independent, so the fill runs in parallel.
    pub fn paint<P: Painter + Sync + ?Sized>(&mut self, painter: &P) {
        self.pixels
            .par_enumerate_pixels_mut()
            .for_each(|(x, y, pixel)| *pixel = painter.paint(x, y));
    }

    /// Borrow the `width × height` region whose top-left corner is `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns a precondition error if the region leaves the canvas
    pub fn view(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<CanvasView<'_>> {
        check_region((self.width(), self.height()), (x, y), (width, height))?;
        Ok(CanvasView {
            parent: &mut self.pixels,
            origin: (x, y),
            size: (width, height),
        })
    }

    /// Save the canvas as PNG
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or encoding fails
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        crate::io::image::export_canvas_as_png(self, path.as_ref())
    }

    /// Load PNG pixels into this canvas
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded or its size differs from
    /// the canvas
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.pixels = crate::io::image::import_png(path.as_ref(), self.width(), self.height())?;
        Ok(())
    }
}

/// Mutable window into a canvas, addressed in local coordinates
#[derive(Debug)]
pub struct CanvasView<'a> {
    parent: &'a mut RgbImage,
    origin: (u32, u32),
    size: (u32, u32),
}

impl CanvasView<'_> {
    /// View width in pixels
    pub const fn width(&self) -> u32 {
        self.size.0
    }

    /// View height in pixels
    pub const fn height(&self) -> u32 {
        self.size.1
    }

    /// Top-left corner in canvas coordinates
    pub const fn origin(&self) -> (u32, u32) {
        self.origin
    }

    /// Pixel at local `(x, y)`, `None` outside the view
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        if x >= self.size.0 || y >= self.size.1 {
            return None;
        }
        self.parent
            .get_pixel_checked(self.origin.0 + x, self.origin.1 + y)
            .copied()
    }

    /// Borrow a nested region relative to this view
    ///
    /// # Errors
    ///
    /// Returns a precondition error if the region leaves this view
    pub fn view(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<CanvasView<'_>> {
        check_region(self.size, (x, y), (width, height))?;
        Ok(CanvasView {
            parent: &mut *self.parent,
            origin: (self.origin.0 + x, self.origin.1 + y),
            size: (width, height),
        })
    }

    /// Overwrite every pixel of the view from `painter`
    pub fn paint<P: Painter + ?Sized>(&mut self, painter: &P) {
        for y in 0..self.size.1 {
            for x in 0..self.size.0 {
                if let Some(pixel) = self
                    .parent
                    .get_pixel_mut_checked(self.origin.0 + x, self.origin.1 + y)
                {
                    *pixel = painter.paint(x, y);
                }
            }
        }
    }
}
