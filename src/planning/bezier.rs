//! Cubic Bezier evaluation
//!
//! A cubic curve is defined by its two endpoints and two interior control
//! points. Sampling it at evenly spaced parameter values gives the polyline
//! the sequencer replays.

use crate::geometry::Position;

/// Cubic Bezier curve through four control points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Position,
    pub p1: Position,
    pub p2: Position,
    pub p3: Position,
}

impl CubicBezier {
    pub fn new(p0: Position, p1: Position, p2: Position, p3: Position) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the curve at parameter `t` in `[0, 1]`
    ///
    /// B(t) = (1-t)^3 P0 + 3(1-t)^2 t P1 + 3(1-t) t^2 P2 + t^3 P3
    pub fn point_at(&self, t: f64) -> Position {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;

        Position::new(
            a * self.p0.x + b * self.p1.x + c * self.p2.x + d * self.p3.x,
            a * self.p0.y + b * self.p1.y + c * self.p2.y + d * self.p3.y,
        )
    }

    /// Evaluate at `steps + 1` uniformly spaced parameter values
    ///
    /// Spacing is uniform in `t`, not in arc length.
    pub fn lut(&self, steps: usize) -> Vec<Position> {
        if steps == 0 {
            return vec![self.p0];
        }
        (0..=steps)
            .map(|i| self.point_at(i as f64 / steps as f64))
            .collect()
    }
}
