//! Rasterization of a single jigsaw tile
//!
//! Every side is drawn in a canonical frame where the side is the top edge and
//! the origin is the top-left corner. Side `d` is obtained by rotating that
//! frame `d` quarter turns clockwise, so one set of shape formulas covers all
//! four ports.
//!
//! Along each side there are two lanes. The outgoing lane sits `separation`
//! pixels from the side's start and carries the path that enters the tile
//! there. The incoming lane sits `separation` pixels from the side's end and
//! carries the path that exits there. Because a neighbor's side runs the other
//! way, each outgoing tab lines up with the neighbor's incoming tab.

use std::f64::consts::SQRT_2;

use image::{Rgb, RgbImage};

use crate::io::configuration::{
    BORDER_COLOR, DEFAULT_BORDER_WIDTH, DEFAULT_LINE_WIDTH, DEFAULT_SEPARATION,
    DEFAULT_STUB_LENGTH, FILL_COLOR,
};
use crate::io::error::{Result, invalid_parameter, precondition};
use crate::spatial::canvas::{BorderedFill, CanvasView, Painter};
use crate::spatial::grid::PortColors;
use crate::spatial::ports::{Port, Routing};

/// Pixel dimensions shared by every tile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGeometry {
    /// Width of tabs and spokes
    pub line_width: u32,
    /// Gap between the tile edge and the outgoing lane, between the lanes,
    /// and between the incoming lane and the far edge
    pub separation: u32,
    /// Depth of the boundary tabs
    pub stub_length: u32,
    /// Thickness of the darker background border (0 disables it)
    pub border_width: u32,
}

impl Default for TileGeometry {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            separation: DEFAULT_SEPARATION,
            stub_length: DEFAULT_STUB_LENGTH,
            border_width: DEFAULT_BORDER_WIDTH,
        }
    }
}

impl TileGeometry {
    /// Side length `2·line_width + 3·separation` of the square tile
    pub const fn side(&self) -> u32 {
        self.line_width
            .saturating_mul(2)
            .saturating_add(self.separation.saturating_mul(3))
    }

    /// Stroke width of diagonal spokes, `⌊line_width / √2⌋ + 1`
    pub fn diagonal_width(&self) -> u32 {
        ((f64::from(self.line_width) / SQRT_2) as u32 + 1).min(self.line_width.max(1))
    }

    /// Check that every derived length is positive and every shape stays inside the tile
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error naming the first violated constraint
    pub fn validate(&self) -> Result<()> {
        if self.line_width == 0 {
            return Err(invalid_parameter(
                "line_width",
                &self.line_width,
                &"must be positive",
            ));
        }
        if self.separation < self.line_width {
            return Err(invalid_parameter(
                "separation",
                &self.separation,
                &format!(
                    "must be at least the line width ({}) to leave room for the notches",
                    self.line_width
                ),
            ));
        }
        if self.stub_length == 0 || self.stub_length > self.separation {
            return Err(invalid_parameter(
                "stub_length",
                &self.stub_length,
                &format!("must be between 1 and the separation ({})", self.separation),
            ));
        }
        let inset = self.line_width - self.diagonal_width();
        if self.stub_length < inset {
            return Err(invalid_parameter(
                "stub_length",
                &self.stub_length,
                &format!("must be at least the diagonal inset ({inset})"),
            ));
        }
        let side = u64::from(self.line_width) * 2 + u64::from(self.separation) * 3;
        if side > u64::from(u32::MAX) {
            return Err(invalid_parameter(
                "separation",
                &self.separation,
                &"tile side does not fit in 32 bits",
            ));
        }
        if u64::from(self.border_width) * 2 >= side {
            return Err(invalid_parameter(
                "border_width",
                &self.border_width,
                &format!("must be less than half the tile side ({side})"),
            ));
        }
        Ok(())
    }

    /// Path of the spoke leaving the north port, for an exit `relative_exit`
    /// quarter turns clockwise from it
    ///
    /// Coordinates are in the canonical frame. The path paints a
    /// `width × width` square at `start + i·direction` for `i` in `0..=steps`.
    pub fn spoke_path(&self, relative_exit: usize) -> SpokePath {
        let lw = i64::from(self.line_width);
        let sep = i64::from(self.separation);
        let stub = i64::from(self.stub_length);

        let (direction, steps) = match relative_exit % 4 {
            // Back to the incoming lane of the same side
            0 => ((1, 0), sep + lw),
            1 => ((1, 1), 2 * sep + lw - stub),
            // Straight across to the opposite side
            2 => ((0, 1), 3 * sep - 2 * stub + lw),
            _ => ((-1, 1), sep - stub),
        };
        let start = (sep, stub);

        if direction.0 == 0 || direction.1 == 0 {
            return SpokePath {
                start,
                direction,
                steps,
                width: lw,
            };
        }

        // Narrow diagonal strokes so they look as thick as straight ones
        let width = i64::from(self.diagonal_width());
        let inset = lw - width;
        let start = if direction.0 < 0 {
            (start.0 + inset, start.1 - inset)
        } else {
            (start.0, start.1 - inset)
        };
        SpokePath {
            start,
            direction,
            steps: steps + 2 * inset,
            width,
        }
    }
}

/// Square-brush stroke in the canonical frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpokePath {
    /// Top-left corner of the first square
    pub start: (i64, i64),
    /// Step between consecutive squares
    pub direction: (i64, i64),
    /// Number of steps after the first square
    pub steps: i64,
    /// Side of the square brush
    pub width: i64,
}

impl SpokePath {
    /// Top-left corner of the last square
    pub const fn end(&self) -> (i64, i64) {
        (
            self.start.0 + self.steps * self.direction.0,
            self.start.1 + self.steps * self.direction.1,
        )
    }

    /// Whether the path is a diagonal stroke
    pub const fn is_diagonal(&self) -> bool {
        self.direction.0 != 0 && self.direction.1 != 0
    }
}

/// Maps canonical north-side coordinates onto one side of the tile
struct SideFrame {
    last: i64,
    turns: usize,
}

impl SideFrame {
    const fn new(side: u32, port: Port) -> Self {
        Self {
            last: side as i64 - 1,
            turns: port.index(),
        }
    }

    // One clockwise quarter turn is (u, v) -> (last - v, u)
    const fn map(&self, u: i64, v: i64) -> (i64, i64) {
        let (mut x, mut y) = (u, v);
        let mut turn = 0;
        while turn < self.turns {
            let previous_x = x;
            x = self.last - y;
            y = previous_x;
            turn += 1;
        }
        (x, y)
    }
}

// Write one pixel through the side frame, ignoring points outside the tile
fn put(piece: &mut RgbImage, frame: &SideFrame, u: i64, v: i64, color: Rgb<u8>) {
    let (x, y) = frame.map(u, v);
    if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y))
        && let Some(pixel) = piece.get_pixel_mut_checked(x, y)
    {
        *pixel = color;
    }
}

fn fill_rect(
    piece: &mut RgbImage,
    frame: &SideFrame,
    origin: (i64, i64),
    size: (i64, i64),
    color: Rgb<u8>,
) {
    for v in origin.1..origin.1 + size.1 {
        for u in origin.0..origin.0 + size.0 {
            put(piece, frame, u, v, color);
        }
    }
}

/// Draws tiles for a validated geometry
#[derive(Clone, Copy, Debug)]
pub struct TileRenderer {
    geometry: TileGeometry,
}

impl TileRenderer {
    /// Create a renderer after validating the geometry
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if the geometry is inconsistent
    pub fn new(geometry: TileGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(Self { geometry })
    }

    /// Geometry in use
    pub const fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    /// Tile side length in pixels
    pub const fn side(&self) -> u32 {
        self.geometry.side()
    }

    /// Draw one tile into a fresh `side × side` image
    ///
    /// Passes run in order: bordered background, outgoing tabs on all sides,
    /// incoming tabs with their notches, then one spoke per port.
    pub fn rasterize(&self, routing: &Routing, colors: &PortColors) -> RgbImage {
        let side = self.side();
        let lw = i64::from(self.geometry.line_width);
        let sep = i64::from(self.geometry.separation);
        let stub = i64::from(self.geometry.stub_length);

        let background = BorderedFill {
            region_width: side,
            region_height: side,
            width: self.geometry.border_width,
            edge: BORDER_COLOR,
            fill: FILL_COLOR,
        };
        let mut piece = RgbImage::from_fn(side, side, |x, y| background.paint(x, y));

        for port in Port::ALL {
            let frame = SideFrame::new(side, port);
            fill_rect(&mut piece, &frame, (sep, 0), (lw, stub), colors[port]);
        }

        let incoming = i64::from(side) - sep - lw;
        for port in Port::ALL {
            let frame = SideFrame::new(side, port);
            let color = colors[routing.entry(port)];
            // Triangular notches widen the incoming tab towards the edge
            for i in 1..lw {
                for j in 0..i {
                    put(&mut piece, &frame, incoming - 1 - j, i, color);
                    put(&mut piece, &frame, incoming + lw + j, i, color);
                }
            }
            fill_rect(&mut piece, &frame, (incoming, 0), (lw, stub), color);
        }

        for port in Port::ALL {
            let frame = SideFrame::new(side, port);
            let path = self.geometry.spoke_path(routing.relative_exit(port));
            let color = colors[port];
            for step in 0..=path.steps {
                let origin = (
                    path.start.0 + step * path.direction.0,
                    path.start.1 + step * path.direction.1,
                );
                fill_rect(&mut piece, &frame, origin, (path.width, path.width), color);
            }
        }

        piece
    }

    /// Draw one tile into a canvas region of exactly `side × side` pixels
    ///
    /// # Errors
    ///
    /// Returns a precondition error, before drawing anything, if the region has
    /// the wrong size
    pub fn render(
        &self,
        region: &mut CanvasView<'_>,
        routing: &Routing,
        colors: &PortColors,
    ) -> Result<()> {
        let side = self.side();
        if region.width() != side || region.height() != side {
            return Err(precondition(
                "render tile",
                &format!(
                    "region is {}x{}, expected {side}x{side}",
                    region.width(),
                    region.height()
                ),
            ));
        }

        let piece = self.rasterize(routing, colors);
        region.paint(&piece);
        Ok(())
    }
}
