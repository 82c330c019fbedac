//! Domain to pixel mapping.

use serde::{Deserialize, Serialize};

use crate::Real;
use crate::plot::{Point, Rect};

/// Thickness of the two axes.
pub const AXIS_THICKNESS: Real = 3.0;
/// Thickness of the unit grid lines.
pub const GRID_THICKNESS: Real = 1.0;
/// Unit lines closer together than this many pixels are not drawn.
pub const MIN_GRID_SPACING: Real = 4.0;

/// Linearly maps `value` from `[domain_lo, domain_hi]` onto
/// `[pixel_lo, pixel_hi]`.
///
/// Either range may be reversed; passing `pixel_lo > pixel_hi` flips the
/// axis.
///
/// ```
/// use exp_plot::viewport::map_coord;
///
/// assert_eq!(map_coord(0.0, -10.0, 10.0, 0.0, 800.0), 400.0);
/// assert_eq!(map_coord(10.0, -10.0, 10.0, 600.0, 0.0), 0.0);
/// ```
pub fn map_coord(
    value: Real,
    domain_lo: Real,
    domain_hi: Real,
    pixel_lo: Real,
    pixel_hi: Real,
) -> Real {
    (value - domain_lo) / (domain_hi - domain_lo) * (pixel_hi - pixel_lo) + pixel_lo
}

/// A closed interval of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub lo: Real,
    pub hi: Real,
}

impl Span {
    pub const fn new(lo: Real, hi: Real) -> Self {
        Self { lo, hi }
    }

    pub fn extent(&self) -> Real {
        self.hi - self.lo
    }

    fn shift(&mut self, by: Real) {
        self.lo += by;
        self.hi += by;
    }
}

/// A line in pixel coordinates, as drawn for the axes and unit grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
    pub thickness: Real,
}

/// The visible part of the domain and the pixel size it is drawn at.
///
/// Pixel `y` grows downward while domain `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub horizontal: Span,
    pub vertical: Span,
    pub width: Real,
    pub height: Real,
}

impl Viewport {
    /// `[-10, 10]` horizontally, with the vertical range fitted to the
    /// aspect ratio of `width × height`.
    pub fn new(width: Real, height: Real) -> Self {
        let mut viewport = Self {
            horizontal: Span::new(-10.0, 10.0),
            vertical: Span::new(-10.0, 10.0),
            width,
            height,
        };
        viewport.resize(width, height);
        viewport
    }

    /// The visible domain, for handing to the plotter.
    pub fn domain(&self) -> Rect {
        Rect::from_ranges(
            self.horizontal.lo,
            self.horizontal.hi,
            self.vertical.lo,
            self.vertical.hi,
        )
    }

    pub fn to_pixel(&self, point: Point) -> Point {
        Point::new(
            map_coord(point.x, self.horizontal.lo, self.horizontal.hi, 0.0, self.width),
            map_coord(point.y, self.vertical.lo, self.vertical.hi, self.height, 0.0),
        )
    }

    /// Sets the pixel size and rescales the vertical range about zero so that
    /// one domain unit covers the same number of pixels on both axes.
    ///
    /// Non-positive sizes are stored but leave the ranges untouched.
    pub fn resize(&mut self, width: Real, height: Real) {
        self.width = width;
        self.height = height;
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let wanted = self.horizontal.extent() * (height / width);
        let factor = wanted / self.vertical.extent();
        self.vertical.lo *= factor;
        self.vertical.hi *= factor;
    }

    /// Drags the view by a pixel delta; the content follows the pointer.
    ///
    /// Does nothing while either pixel size is non-positive.
    pub fn pan(&mut self, dx_px: Real, dy_px: Real) {
        if self.width <= 0.0 || self.height <= 0.0 {
            return;
        }

        let move_x = map_coord(dx_px, 0.0, self.width, 0.0, self.horizontal.extent());
        let move_y = map_coord(dy_px, 0.0, self.height, 0.0, -self.vertical.extent());
        self.horizontal.shift(-move_x);
        self.vertical.shift(-move_y);
    }

    /// The two axes and one line per domain unit, in pixel coordinates.
    pub fn grid_lines(&self) -> Vec<GridLine> {
        let mut lines = Vec::new();
        if self.width <= 0.0 || self.height <= 0.0 {
            return lines;
        }

        let origin = self.to_pixel(Point::new(0.0, 0.0));
        lines.push(GridLine {
            from: Point::new(0.0, origin.y),
            to: Point::new(self.width, origin.y),
            thickness: AXIS_THICKNESS,
        });
        lines.push(GridLine {
            from: Point::new(origin.x, 0.0),
            to: Point::new(origin.x, self.height),
            thickness: AXIS_THICKNESS,
        });

        let step_x = self.width / self.horizontal.extent();
        if step_x >= MIN_GRID_SPACING {
            let mut px = origin.x - step_x * (origin.x / step_x).floor();
            while px < self.width {
                lines.push(GridLine {
                    from: Point::new(px, 0.0),
                    to: Point::new(px, self.height),
                    thickness: GRID_THICKNESS,
                });
                px += step_x;
            }
        }

        let step_y = self.height / self.vertical.extent();
        if step_y >= MIN_GRID_SPACING {
            let mut py = origin.y - step_y * (origin.y / step_y).floor();
            while py < self.height {
                lines.push(GridLine {
                    from: Point::new(0.0, py),
                    to: Point::new(self.width, py),
                    thickness: GRID_THICKNESS,
                });
                py += step_y;
            }
        }

        lines
    }
}
