use exp_plot::Real;
use exp_plot::plot::{Rect, Segment};
use exp_plot::types::{Token, TokenValue};

/// The default view, `[-10, 10] × [-10, 10]`.
#[allow(dead_code)]
pub fn default_domain() -> Rect {
    Rect::from_ranges(-10.0, 10.0, -10.0, 10.0)
}

/// Token payloads without positions.
#[allow(dead_code)]
pub fn values(tokens: &[Token]) -> Vec<TokenValue> {
    tokens.iter().map(|t| t.value).collect()
}

/// `y` values where segments strictly spanning column `x` cross it.
#[allow(dead_code)]
pub fn crossings_at(segments: &[Segment], x: Real) -> Vec<Real> {
    segments
        .iter()
        .filter(|s| s.from.x.min(s.to.x) < x && x < s.from.x.max(s.to.x))
        .map(|s| {
            let t = (x - s.from.x) / (s.to.x - s.from.x);
            s.from.y + t * (s.to.y - s.from.y)
        })
        .collect()
}

/// Installs a fmt subscriber writing through the test harness. Safe to call
/// from every test.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
