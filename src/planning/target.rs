//! Target point sampling inside element bounds

use crate::config::check_inset;
use crate::error::{MotionError, MotionResult};
use crate::geometry::{BoundingBox, Position};
use rand::Rng;

/// Draw a point inside `bounds`, inset to `[min_frac, max_frac]` on each axis
///
/// The two axes use independent draws. Empty or non-finite boxes fail with
/// `InvalidGeometry` before any motion is attempted.
pub fn sample_point<R: Rng + ?Sized>(
    bounds: &BoundingBox,
    min_frac: f64,
    max_frac: f64,
    rng: &mut R,
) -> MotionResult<Position> {
    check_inset((min_frac, max_frac))?;

    let finite = [bounds.x, bounds.y, bounds.width, bounds.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Err(MotionError::InvalidGeometry(format!(
            "element box {}x{} at ({}, {}) has no usable area",
            bounds.width, bounds.height, bounds.x, bounds.y
        )));
    }

    let u = rng.gen_range(min_frac..=max_frac);
    let v = rng.gen_range(min_frac..=max_frac);

    Ok(Position::new(
        bounds.x + bounds.width * u,
        bounds.y + bounds.height * v,
    ))
}
