//! Plots a few equations onto a text grid.
//!
//! `cargo run --example parabola -- "x^2 + y^2 = 36"`

use exp_plot::Real;
use exp_plot::graph::{GraphSet, Surface};
use exp_plot::plot::{PlotConfig, Point};
use exp_plot::viewport::Viewport;

const COLS: usize = 80;
const ROWS: usize = 40;

/// A character canvas; every line is rasterised as dots along its length.
struct TextSurface {
    cells: Vec<Vec<char>>,
}

impl TextSurface {
    fn new() -> Self {
        Self {
            cells: vec![vec![' '; COLS]; ROWS],
        }
    }

    fn plot(&mut self, p: Point, mark: char) {
        if p.x < 0.0 || p.y < 0.0 {
            return;
        }
        let (col, row) = (p.x as usize, p.y as usize);
        if row < ROWS && col < COLS {
            self.cells[row][col] = mark;
        }
    }

    fn render(&self) -> String {
        self.cells
            .iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Surface for TextSurface {
    fn draw_line(&mut self, from: Point, to: Point, thickness: Real) {
        // axes only; unit grid lines would fill the canvas
        if thickness < 2.0 {
            return;
        }
        let mark = if from.x == to.x { '|' } else if from.y == to.y { '-' } else { '*' };
        let steps = ((to.x - from.x).abs().max((to.y - from.y).abs()) as usize).max(1);
        for i in 0..=steps {
            let t = i as Real / steps as Real;
            let p = Point::new(from.x + t * (to.x - from.x), from.y + t * (to.y - from.y));
            self.plot(p, mark);
        }
    }

    fn draw_rect(&mut self, _origin: Point, _size: Point) {}
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.is_empty() {
        inputs = vec!["x^2 / 4".into(), "y = 2x - 3".into(), "x^2 + y^2 = 36".into()];
    }

    let mut graphs = GraphSet::new();
    for (slot, text) in inputs.iter().enumerate() {
        if let Err(e) = graphs.update(slot, text) {
            eprintln!("{text}: {e}");
        }
    }

    // Fit the ranges as if rows were square, then draw onto half as many
    // rows since character cells are about twice as tall as wide
    let mut viewport = Viewport::new(COLS as Real, ROWS as Real * 2.0);
    viewport.height = ROWS as Real;

    let mut surface = TextSurface::new();
    graphs.render(&viewport, &PlotConfig::interactive(), &mut surface);

    println!("{}", surface.render());
}
