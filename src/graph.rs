//! Equation slots and drawing onto a caller-provided surface.

use crate::Real;
use crate::engine::{ParseOptions, parse_with};
use crate::error::Result;
use crate::plot::{CancelToken, PlotConfig, PlotOutcome, PlotOutput, Point, plot_with};
use crate::types::Equation;
use crate::viewport::Viewport;

/// Thickness of plotted curves.
pub const CURVE_THICKNESS: Real = 3.0;

/// Drawing primitives, in pixel coordinates, supplied by the host.
pub trait Surface {
    fn draw_line(&mut self, from: Point, to: Point, thickness: Real);
    /// Outlines the rectangle with top-left corner `origin`.
    fn draw_rect(&mut self, origin: Point, size: Point);
}

#[derive(Debug, Clone, Default)]
struct Slot {
    text: String,
    equation: Option<Equation>,
}

/// An ordered list of equation inputs, each holding its last good parse.
#[derive(Debug, Clone, Default)]
pub struct GraphSet {
    slots: Vec<Slot>,
    options: ParseOptions,
}

impl GraphSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            slots: Vec::new(),
            options,
        }
    }

    /// Appends an empty slot and returns its index.
    pub fn add_slot(&mut self) -> usize {
        self.slots.push(Slot::default());
        self.slots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The equation currently drawn for `slot`.
    pub fn equation(&self, slot: usize) -> Option<&Equation> {
        self.slots.get(slot).and_then(|s| s.equation.as_ref())
    }

    /// The text last accepted for `slot`.
    pub fn text(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).map(|s| s.text.as_str())
    }

    /// Re-parses `slot` from `text`, creating slots up to it if needed.
    ///
    /// Blank text clears the slot. On a parse error the slot keeps its
    /// previous equation, the error is logged at `warn` and returned.
    pub fn update(&mut self, slot: usize, text: &str) -> Result<()> {
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, Slot::default);
        }

        if text.trim().is_empty() {
            self.slots[slot] = Slot::default();
            return Ok(());
        }

        match parse_with(text, &self.options) {
            Ok(equation) => {
                self.slots[slot] = Slot {
                    text: text.to_owned(),
                    equation: Some(equation),
                };
                Ok(())
            }
            Err(error) => {
                tracing::warn!(slot, %error, "failed to parse equation, keeping previous graph");
                Err(error)
            }
        }
    }

    /// Draws the grid and every slot's curve.
    pub fn render<S: Surface>(&self, viewport: &Viewport, config: &PlotConfig, surface: &mut S) {
        self.render_with(viewport, config, surface, &CancelToken::new());
    }

    /// Like [`render`](Self::render), but abandons the frame when `cancel`
    /// fires. Nothing is drawn for a cancelled frame; returns whether the
    /// frame was drawn.
    pub fn render_with<S: Surface>(
        &self,
        viewport: &Viewport,
        config: &PlotConfig,
        surface: &mut S,
        cancel: &CancelToken,
    ) -> bool {
        let domain = viewport.domain();
        let mut outputs: Vec<PlotOutput> = Vec::with_capacity(self.slots.len());
        for equation in self.slots.iter().filter_map(|s| s.equation.as_ref()) {
            match plot_with(equation, domain, config, cancel) {
                PlotOutcome::Complete(output) => outputs.push(output),
                PlotOutcome::Cancelled => return false,
            }
        }

        for line in viewport.grid_lines() {
            surface.draw_line(line.from, line.to, line.thickness);
        }

        for output in &outputs {
            for cell in &output.cells {
                let origin = viewport.to_pixel(cell.top_left());
                let corner = viewport.to_pixel(cell.bottom_right());
                surface.draw_rect(origin, Point::new(corner.x - origin.x, corner.y - origin.y));
            }
            for segment in &output.segments {
                surface.draw_line(
                    viewport.to_pixel(segment.from),
                    viewport.to_pixel(segment.to),
                    CURVE_THICKNESS,
                );
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, SplitError};
    use crate::plot::DepthPair;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(Point, Point, Real)>,
        rects: Vec<(Point, Point)>,
    }

    impl Surface for Recorder {
        fn draw_line(&mut self, from: Point, to: Point, thickness: Real) {
            self.lines.push((from, to, thickness));
        }

        fn draw_rect(&mut self, origin: Point, size: Point) {
            self.rects.push((origin, size));
        }
    }

    fn config() -> PlotConfig {
        PlotConfig {
            depths: DepthPair::new(3, 6),
            ..PlotConfig::default()
        }
    }

    #[test]
    fn test_update_and_keep_previous_on_failure() {
        let mut graphs = GraphSet::new();
        let slot = graphs.add_slot();
        graphs.update(slot, "x^2").unwrap();
        let before = graphs.equation(slot).cloned();
        assert!(before.is_some());

        let err = graphs.update(slot, "x^2 = ").unwrap_err();
        assert!(matches!(err, ParseError::Validation { .. }));
        assert_eq!(graphs.equation(slot).cloned(), before);
        assert_eq!(graphs.text(slot), Some("x^2"));

        assert_eq!(
            graphs.update(slot, "x*y"),
            Err(ParseError::Split(SplitError::NotGraphable))
        );
        assert_eq!(graphs.equation(slot).cloned(), before);
    }

    #[test]
    fn test_blank_text_clears_slot() {
        let mut graphs = GraphSet::new();
        graphs.update(0, "y = x").unwrap();
        graphs.update(0, "  ").unwrap();
        assert!(graphs.equation(0).is_none());
        assert_eq!(graphs.text(0), Some(""));
    }

    #[test]
    fn test_update_creates_missing_slots() {
        let mut graphs = GraphSet::new();
        graphs.update(2, "x = 1").unwrap();
        assert_eq!(graphs.len(), 3);
        assert!(graphs.equation(0).is_none());
        assert!(graphs.equation(2).is_some());
    }

    #[test]
    fn test_render_draws_grid_then_curves() {
        let mut graphs = GraphSet::new();
        graphs.update(0, "y = 2").unwrap();
        graphs.update(1, "bad #").unwrap_err();

        let viewport = Viewport::new(200.0, 200.0);
        let mut surface = Recorder::default();
        graphs.render(&viewport, &config(), &mut surface);

        let grid = viewport.grid_lines().len();
        assert!(surface.lines.len() > grid);
        assert!(surface.rects.is_empty());
        for (i, line) in viewport.grid_lines().iter().enumerate() {
            assert_eq!(surface.lines[i], (line.from, line.to, line.thickness));
        }

        // y = 2 maps to pixel row 80; leaf cells are 6.25 px tall
        for (from, to, thickness) in &surface.lines[grid..] {
            assert_eq!(*thickness, CURVE_THICKNESS);
            assert_eq!(from.y, to.y);
            assert!((from.y - 80.0).abs() < 6.25, "{from:?}");
        }
    }

    #[test]
    fn test_render_quadtree_overlay() {
        let mut graphs = GraphSet::new();
        graphs.update(0, "y = x").unwrap();
        let viewport = Viewport::new(200.0, 200.0);
        let config = PlotConfig {
            record_cells: true,
            ..config()
        };
        let mut surface = Recorder::default();
        graphs.render(&viewport, &config, &mut surface);

        assert!(!surface.rects.is_empty());
        for (_, size) in &surface.rects {
            assert!(size.x > 0.0 && size.y > 0.0);
        }
    }

    #[test]
    fn test_cancelled_render_draws_nothing() {
        let mut graphs = GraphSet::new();
        graphs.update(0, "x^2 + y^2 = 4").unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();

        let mut surface = Recorder::default();
        let drawn = graphs.render_with(
            &Viewport::new(200.0, 200.0),
            &config(),
            &mut surface,
            &cancel,
        );
        assert!(!drawn);
        assert!(surface.lines.is_empty());
    }
}
