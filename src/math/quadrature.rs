//! Composite Gauss-Legendre quadrature.
//!
//! Spiral curves have closed-form headings but no closed-form points; the
//! point at arc length `s` is `∫ (cos θ, sin θ)` which is integrated here.

use super::Vector2;

/// Nodes of the 5-point Gauss-Legendre rule on `[-1, 1]`.
const NODES: [f64; 5] = [
    -0.906_179_845_938_664,
    -0.538_469_310_105_683_1,
    0.0,
    0.538_469_310_105_683_1,
    0.906_179_845_938_664,
];

/// Weights matching [`NODES`].
const WEIGHTS: [f64; 5] = [
    0.236_926_885_056_189_1,
    0.478_628_670_499_366_5,
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_5,
    0.236_926_885_056_189_1,
];

/// Arc length covered by one panel before another one is added.
const PANEL_LENGTH: f64 = 2.0;

/// Upper bound on the number of panels for a single integral.
const MAX_PANELS: u32 = 4096;

/// Returns the number of panels used to integrate over a span of the given
/// length.
#[must_use]
pub fn panel_count(span: f64) -> u32 {
    let wanted = (span.abs() / PANEL_LENGTH).ceil();
    if wanted >= f64::from(MAX_PANELS) {
        MAX_PANELS
    } else if wanted.is_nan() || wanted < 4.0 {
        4
    } else {
        // In range (4..MAX_PANELS) and integral, so the cast is exact.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let panels = wanted as u32;
        panels
    }
}

/// Integrates `f` over `[a, b]` with `panels` equal sub-intervals.
///
/// `b < a` is allowed and yields the negated integral.
#[must_use]
pub fn integrate<F>(f: F, a: f64, b: f64, panels: u32) -> f64
where
    F: Fn(f64) -> f64,
{
    let panels = panels.max(1);
    let width = (b - a) / f64::from(panels);
    let half = width * 0.5;
    (0..panels)
        .map(|i| {
            let mid = a + width * (f64::from(i) + 0.5);
            NODES
                .iter()
                .zip(WEIGHTS.iter())
                .map(|(x, w)| w * f(mid + half * x))
                .sum::<f64>()
                * half
        })
        .sum()
}

/// Integrates the unit tangent of a curve with heading `heading(s)` over
/// `[a, b]`, returning the chord vector from `s = a` to `s = b`.
#[must_use]
pub fn integrate_heading<F>(heading: F, a: f64, b: f64, panels: u32) -> Vector2
where
    F: Fn(f64) -> f64,
{
    let panels = panels.max(1);
    let width = (b - a) / f64::from(panels);
    let half = width * 0.5;
    let mut chord = Vector2::zeros();
    for i in 0..panels {
        let mid = a + width * (f64::from(i) + 0.5);
        for (x, w) in NODES.iter().zip(WEIGHTS.iter()) {
            let theta = heading(mid + half * x);
            chord.x += w * half * theta.cos();
            chord.y += w * half * theta.sin();
        }
    }
    chord
}
