//! Adaptive implicit-curve plotter.
//!
//! The domain is split quadtree-style in two phases. Above
//! [`DepthPair::start_depth`] every cell splits unconditionally; this coarse
//! pass is where the work fans out across the rayon pool. From `start_depth`
//! on, each cell's four corners are sign-tested against `lhs - rhs` and only
//! cells with a sign change keep refining. At [`DepthPair::plot_depth`] a
//! cell becomes a leaf and emits segments between edge midpoints from the
//! marching-squares table.
//!
//! Children are concatenated in fixed quadrant order, so the output does not
//! depend on scheduling: a parallel plot and a sequential plot of the same
//! input return the same segment sequence.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::Real;
use crate::context::EvalContext;
use crate::types::Equation;

/// Deepest level `plot_depth` may be configured to.
pub const MAX_DEPTH: u32 = 20;
/// Deepest level `start_depth` may be configured to. Every cell above it is
/// visited regardless of the curve, so this bounds the unconditional work at
/// `4^(MAX_START_DEPTH - 1)` cells.
pub const MAX_START_DEPTH: u32 = 10;

/// A point in domain coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    pub const fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }
}

/// A line segment in domain coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// Axis-aligned rectangle `[x, x + width] × [y, y + height]`, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: Real,
    pub y: Real,
    pub width: Real,
    pub height: Real,
}

impl Rect {
    pub const fn new(x: Real, y: Real, width: Real, height: Real) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning `[x_lo, x_hi] × [y_lo, y_hi]`.
    pub fn from_ranges(x_lo: Real, x_hi: Real, y_lo: Real, y_hi: Real) -> Self {
        Self::new(x_lo, y_lo, x_hi - x_lo, y_hi - y_lo)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y + self.height)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y)
    }

    /// The four equal quadrants: bottom-left, bottom-right, top-left, top-right.
    pub fn quadrants(&self) -> [Rect; 4] {
        let w = self.width * 0.5;
        let h = self.height * 0.5;
        [
            Rect::new(self.x, self.y, w, h),
            Rect::new(self.x + w, self.y, w, h),
            Rect::new(self.x, self.y + h, w, h),
            Rect::new(self.x + w, self.y + h, w, h),
        ]
    }
}

/// Coarse and fine subdivision depths. The root cell is depth 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthPair {
    /// Cells shallower than this split without sign testing.
    pub start_depth: u32,
    /// Cells at this depth or deeper emit segments instead of splitting.
    pub plot_depth: u32,
}

impl DepthPair {
    /// Full quality.
    pub const DEFAULT: DepthPair = DepthPair::new(6, 11);
    /// Reduced pair used while the view is being dragged.
    pub const INTERACTIVE: DepthPair = DepthPair::new(4, 9);

    pub const fn new(start_depth: u32, plot_depth: u32) -> Self {
        Self {
            start_depth,
            plot_depth,
        }
    }

    /// `start_depth` capped at [`MAX_START_DEPTH`] and `plot_depth` at
    /// [`MAX_DEPTH`].
    pub fn clamped(self) -> Self {
        Self::new(self.start_depth.min(MAX_START_DEPTH), self.plot_depth.min(MAX_DEPTH))
    }
}

impl Default for DepthPair {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Plotter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub depths: DepthPair,
    /// Fan the coarse pass out over the rayon pool.
    pub parallel: bool,
    /// Also return every sign-tested cell, for a quadtree debug overlay.
    pub record_cells: bool,
}

impl PlotConfig {
    pub fn interactive() -> Self {
        Self {
            depths: DepthPair::INTERACTIVE,
            ..Self::default()
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            depths: DepthPair::DEFAULT,
            parallel: true,
            record_cells: false,
        }
    }
}

/// Shared flag for abandoning an in-flight plot.
///
/// Clones share the flag. The plotter checks it on entry to every cell.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Geometry produced by a completed plot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotOutput {
    pub segments: Vec<Segment>,
    /// Sign-tested cells; empty unless [`PlotConfig::record_cells`] is set.
    pub cells: Vec<Rect>,
}

impl PlotOutput {
    fn append(&mut self, mut other: PlotOutput) {
        self.segments.append(&mut other.segments);
        self.cells.append(&mut other.cells);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlotOutcome {
    Complete(PlotOutput),
    Cancelled,
}

impl PlotOutcome {
    /// Segments of a completed plot; a cancelled plot has none.
    pub fn into_segments(self) -> Vec<Segment> {
        match self {
            PlotOutcome::Complete(output) => output.segments,
            PlotOutcome::Cancelled => Vec::new(),
        }
    }
}

/// Marching-squares case code for `cell`.
///
/// Bit 3 is the top-left corner, bit 2 top-right, bit 1 bottom-left and bit 0
/// bottom-right. A bit is set when `lhs - rhs > 0` there; zero counts as not
/// positive. Returns `None` when any corner value is NaN or infinite, which
/// the plotter treats like a uniform cell.
pub fn case_code(equation: &Equation, cell: &Rect) -> Option<u8> {
    let corners = [
        cell.top_left(),
        cell.top_right(),
        cell.bottom_left(),
        cell.bottom_right(),
    ];
    corners.iter().try_fold(0u8, |code, corner| {
        let value = equation.implicit(&EvalContext::at(corner.x, corner.y));
        value
            .is_finite()
            .then(|| (code << 1) | u8::from(value > 0.0))
    })
}

/// True when the corners of a cell with this code do not all share a sign.
pub const fn has_crossing(code: u8) -> bool {
    code != 0 && code != 15
}

/// Segments for a leaf cell, joining midpoints of the edges the curve
/// crosses.
///
/// The diagonal cases 6 and 9 are ambiguous and emit two segments without
/// sampling the center.
pub fn case_segments(code: u8, cell: &Rect) -> heapless::Vec<Segment, 2> {
    let half_w = cell.width * 0.5;
    let half_h = cell.height * 0.5;
    let top = Point::new(cell.x + half_w, cell.y + cell.height);
    let right = Point::new(cell.x + cell.width, cell.y + half_h);
    let bottom = Point::new(cell.x + half_w, cell.y);
    let left = Point::new(cell.x, cell.y + half_h);

    let pairs: &[(Point, Point)] = match code & 0b1111 {
        1 | 14 => &[(right, bottom)],
        2 | 13 => &[(bottom, left)],
        3 | 12 => &[(right, left)],
        4 | 11 => &[(top, right)],
        5 | 10 => &[(top, bottom)],
        6 => &[(top, left), (right, bottom)],
        7 | 8 => &[(top, left)],
        9 => &[(top, right), (bottom, left)],
        _ => &[],
    };

    pairs
        .iter()
        .map(|&(from, to)| Segment::new(from, to))
        .collect()
}

/// Marker for a plot abandoned through its [`CancelToken`].
struct Cancelled;

struct Plotter<'a> {
    equation: &'a Equation,
    depths: DepthPair,
    parallel: bool,
    record_cells: bool,
    cancel: &'a CancelToken,
}

impl Plotter<'_> {
    fn descend(&self, cell: Rect, depth: u32) -> Result<PlotOutput, Cancelled> {
        if self.cancel.is_cancelled() {
            return Err(Cancelled);
        }

        if depth < self.depths.start_depth {
            return self.fan_out(cell, depth, self.parallel);
        }

        let mut output = PlotOutput::default();
        if self.record_cells {
            output.cells.push(cell);
        }

        let code = match case_code(self.equation, &cell) {
            Some(code) if has_crossing(code) => code,
            _ => return Ok(output),
        };

        if depth < self.depths.plot_depth {
            output.append(self.fan_out(cell, depth, false)?);
        } else {
            output.segments.extend(case_segments(code, &cell));
        }
        Ok(output)
    }

    fn fan_out(&self, cell: Rect, depth: u32, parallel: bool) -> Result<PlotOutput, Cancelled> {
        let [a, b, c, d] = cell.quadrants();
        let next = depth + 1;
        let ((ra, rb), (rc, rd)) = if parallel {
            rayon::join(
                || rayon::join(|| self.descend(a, next), || self.descend(b, next)),
                || rayon::join(|| self.descend(c, next), || self.descend(d, next)),
            )
        } else {
            (
                (self.descend(a, next), self.descend(b, next)),
                (self.descend(c, next), self.descend(d, next)),
            )
        };

        let mut output = ra?;
        output.append(rb?);
        output.append(rc?);
        output.append(rd?);
        Ok(output)
    }
}

/// Plots `equation` over `domain` with the given depths and default
/// settings otherwise.
///
/// # Examples
///
/// ```
/// use exp_plot::engine::parse;
/// use exp_plot::plot::{Rect, plot};
///
/// let circle = parse("x^2 + y^2 = 25").unwrap();
/// let segments = plot(&circle, Rect::from_ranges(-10.0, 10.0, -10.0, 10.0), 4, 8);
/// assert!(!segments.is_empty());
/// for s in &segments {
///     let r = (s.from.x.powi(2) + s.from.y.powi(2)).sqrt();
///     assert!((r - 5.0).abs() < 0.3);
/// }
/// ```
pub fn plot(equation: &Equation, domain: Rect, start_depth: u32, plot_depth: u32) -> Vec<Segment> {
    let config = PlotConfig {
        depths: DepthPair::new(start_depth, plot_depth),
        ..PlotConfig::default()
    };
    plot_with(equation, domain, &config, &CancelToken::new()).into_segments()
}

/// Plots `equation` over `domain`.
///
/// Returns [`PlotOutcome::Cancelled`] if `cancel` fires before the plot
/// finishes; partial geometry is discarded.
#[tracing::instrument(level = "debug", skip_all, fields(equation = %equation, domain = ?domain))]
pub fn plot_with(
    equation: &Equation,
    domain: Rect,
    config: &PlotConfig,
    cancel: &CancelToken,
) -> PlotOutcome {
    let plotter = Plotter {
        equation,
        depths: config.depths.clamped(),
        parallel: config.parallel,
        record_cells: config.record_cells,
        cancel,
    };

    match plotter.descend(domain, 1) {
        Ok(output) => {
            tracing::debug!(
                segments = output.segments.len(),
                cells = output.cells.len(),
                "plot complete"
            );
            PlotOutcome::Complete(output)
        }
        Err(Cancelled) => {
            tracing::trace!("plot cancelled");
            PlotOutcome::Cancelled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parse;

    const UNIT: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

    fn domain() -> Rect {
        Rect::from_ranges(-10.0, 10.0, -10.0, 10.0)
    }

    #[test]
    fn test_case_table_segment_counts() {
        for code in [0u8, 15] {
            assert!(case_segments(code, &UNIT).is_empty(), "code {code}");
            assert!(!has_crossing(code));
        }
        for code in [1u8, 2, 4, 8, 14, 13, 11, 7, 3, 12, 5, 10] {
            assert_eq!(case_segments(code, &UNIT).len(), 1, "code {code}");
        }
        for code in [6u8, 9] {
            assert_eq!(case_segments(code, &UNIT).len(), 2, "code {code}");
        }
    }

    #[test]
    fn test_case_segments_join_crossed_edges() {
        // only bottom-right positive: curve cuts the right and bottom edges
        let segs = case_segments(0b0001, &UNIT);
        assert_eq!(
            segs[0],
            Segment::new(Point::new(1.0, 0.5), Point::new(0.5, 0.0))
        );
        // top row positive: horizontal segment through the middle
        let segs = case_segments(0b1100, &UNIT);
        assert_eq!(
            segs[0],
            Segment::new(Point::new(1.0, 0.5), Point::new(0.0, 0.5))
        );
        // complementary codes draw the same line
        assert_eq!(case_segments(4, &UNIT), case_segments(11, &UNIT));
    }

    #[test]
    fn test_case_code_corner_order() {
        let eq = parse("(x - 1/2)(y - 1/2) = 0").unwrap();
        // corners: (0,1) -, (1,1) +, (0,0) +, (1,0) -
        assert_eq!(case_code(&eq, &UNIT), Some(0b0110));

        let eq = parse("x = 2").unwrap();
        assert_eq!(case_code(&eq, &UNIT), Some(0));
        let eq = parse("x = 0 - 2").unwrap();
        assert_eq!(case_code(&eq, &UNIT), Some(15));
    }

    #[test]
    fn test_zero_counts_as_not_positive() {
        let eq = parse("x = 0").unwrap();
        // left corners are exactly zero, right corners positive
        assert_eq!(case_code(&eq, &UNIT), Some(0b0101));
    }

    #[test]
    fn test_non_finite_corners_drop_the_cell() {
        let eq = parse("1/x = y").unwrap();
        assert_eq!(case_code(&eq, &UNIT), None);
        let eq = parse("x/x = y").unwrap();
        assert_eq!(case_code(&eq, &Rect::new(-1.0, -1.0, 1.0, 1.0)), None);
    }

    #[test]
    fn test_uniform_equation_plots_nothing() {
        let eq = parse("x^2 + 1 = 0").unwrap();
        assert!(plot(&eq, domain(), 3, 6).is_empty());
    }

    #[test]
    fn test_line_segments_lie_on_the_line() {
        let eq = parse("y = 2x + 1").unwrap();
        let segments = plot(&eq, domain(), 3, 7);
        assert!(!segments.is_empty());
        let cell = 20.0 / 64.0;
        for s in &segments {
            for p in [s.from, s.to] {
                // each endpoint is within one leaf cell of the true line
                assert!((p.y - (2.0 * p.x + 1.0)).abs() <= 3.0 * cell, "{p:?}");
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let eq = parse("x^2 = y^2").unwrap();
        let parallel = PlotConfig {
            depths: DepthPair::new(4, 8),
            parallel: true,
            record_cells: true,
        };
        let sequential = PlotConfig {
            parallel: false,
            ..parallel
        };
        let a = plot_with(&eq, domain(), &parallel, &CancelToken::new());
        let b = plot_with(&eq, domain(), &sequential, &CancelToken::new());
        assert_eq!(a, b);
    }

    #[test]
    fn test_record_cells() {
        let eq = parse("y = 5").unwrap();
        let config = PlotConfig {
            depths: DepthPair::new(2, 2),
            parallel: false,
            record_cells: true,
        };
        let PlotOutcome::Complete(output) =
            plot_with(&eq, domain(), &config, &CancelToken::new())
        else {
            panic!("plot was not cancelled");
        };
        // the root splits once, then the four quadrants are tested as leaves
        assert_eq!(output.cells, domain().quadrants().to_vec());
        // only the two top quadrants straddle y = 5
        assert_eq!(output.segments.len(), 2);
        assert!(output.segments.iter().all(|s| s.from.y == 5.0 && s.to.y == 5.0));
    }

    #[test]
    fn test_cancelled_plot() {
        let eq = parse("x^2 = y").unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = plot_with(&eq, domain(), &PlotConfig::default(), &cancel);
        assert_eq!(outcome, PlotOutcome::Cancelled);
        assert!(outcome.into_segments().is_empty());
    }

    #[test]
    fn test_depth_clamp_and_config_defaults() {
        assert_eq!(DepthPair::new(40, 50).clamped(), DepthPair::new(10, 20));
        assert_eq!(DepthPair::new(20, 20).clamped(), DepthPair::new(MAX_START_DEPTH, MAX_DEPTH));
        assert_eq!(DepthPair::DEFAULT.clamped(), DepthPair::DEFAULT);
        let config: PlotConfig = serde_json::from_str(r#"{"parallel": false}"#).unwrap();
        assert_eq!(config.depths, DepthPair::DEFAULT);
        assert!(!config.parallel);
        assert_eq!(PlotConfig::interactive().depths, DepthPair::new(4, 9));
    }
}
