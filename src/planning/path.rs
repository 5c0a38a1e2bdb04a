//! Path planning
//!
//! Builds a cubic Bezier between two points with randomized interior control
//! points, optionally biased to overshoot, and samples it into the ordered
//! positions a move replays.

use crate::config::{check_fraction, MotionConfig, PerturbationMode, StepSizing};
use crate::error::{MotionError, MotionResult};
use crate::geometry::Position;
use crate::planning::bezier::CubicBezier;
use rand::Rng;

/// Ordered positions of a move, start and end included
pub type PathPlan = Vec<Position>;

/// Fractions along start->end where the interior control points sit
pub const NEAR_CONTROL_FRACTION: f64 = 0.3;
pub const FAR_CONTROL_FRACTION: f64 = 0.7;

/// Lower bound on density-sized step counts
pub const MIN_DENSITY_STEPS: u32 = 5;

/// Control point displacement model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Perturbation {
    /// Each axis offset by `(U - 0.5) * distance * randomness`
    Proportional { randomness: f64 },
    /// Each axis offset by `U * intensity - intensity / 2`
    Fixed { intensity_px: f64 },
}

impl Perturbation {
    fn offset<R: Rng + ?Sized>(&self, distance: f64, rng: &mut R) -> f64 {
        match *self {
            Perturbation::Proportional { randomness } => {
                (rng.gen::<f64>() - 0.5) * distance * randomness
            }
            Perturbation::Fixed { intensity_px } => {
                rng.gen::<f64>() * intensity_px - intensity_px / 2.0
            }
        }
    }

    fn validate(&self) -> MotionResult<()> {
        match *self {
            Perturbation::Proportional { randomness } => check_fraction("randomness", randomness),
            Perturbation::Fixed { intensity_px } if !intensity_px.is_finite() || intensity_px < 0.0 => {
                Err(MotionError::config(format!(
                    "curveIntensity must be a finite value >= 0, got {}",
                    intensity_px
                )))
            }
            Perturbation::Fixed { .. } => Ok(()),
        }
    }
}

/// Shape parameters for one planned curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    pub perturbation: Perturbation,
    /// Overshoot ratio of the start->end vector, `None` to disable
    pub overshoot: Option<f64>,
}

impl CurveParams {
    pub fn from_config(config: &MotionConfig) -> Self {
        let perturbation = match config.perturbation {
            PerturbationMode::Proportional => Perturbation::Proportional {
                randomness: config.randomness,
            },
            PerturbationMode::Fixed => Perturbation::Fixed {
                intensity_px: config.curve_intensity,
            },
        };
        Self {
            perturbation,
            overshoot: config.overshoot.then_some(config.overshoot_ratio),
        }
    }

    fn validate(&self) -> MotionResult<()> {
        self.perturbation.validate()?;
        if let Some(ratio) = self.overshoot {
            check_fraction("overshootRatio", ratio)?;
        }
        Ok(())
    }
}

/// Pick a step count for a move of `distance` pixels
///
/// Density sizing is capped at `step_limit`.
pub fn resolve_step_count<R: Rng + ?Sized>(
    config: &MotionConfig,
    distance: f64,
    rng: &mut R,
) -> u32 {
    match config.step_sizing {
        StepSizing::Random if config.min_steps >= config.max_steps => config.min_steps,
        StepSizing::Random => rng.gen_range(config.min_steps..config.max_steps),
        StepSizing::Density => {
            let steps = (distance / config.step_density).floor() as u32;
            steps.max(MIN_DENSITY_STEPS).min(config.step_limit)
        }
    }
}

/// Build the randomized curve between `start` and `end`
pub fn control_curve<R: Rng + ?Sized>(
    start: Position,
    end: Position,
    params: &CurveParams,
    rng: &mut R,
) -> CubicBezier {
    let distance = start.distance_to(&end);

    let mut near = start.lerp(&end, NEAR_CONTROL_FRACTION).offset(
        params.perturbation.offset(distance, rng),
        params.perturbation.offset(distance, rng),
    );
    let mut far = start.lerp(&end, FAR_CONTROL_FRACTION).offset(
        params.perturbation.offset(distance, rng),
        params.perturbation.offset(distance, rng),
    );

    if let Some(ratio) = params.overshoot {
        let sign_x = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let sign_y = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let bias_x = (end.x - start.x) * ratio * sign_x;
        let bias_y = (end.y - start.y) * ratio * sign_y;
        near = near.offset(bias_x, bias_y);
        far = far.offset(bias_x, bias_y);
    }

    CubicBezier::new(start, near, far, end)
}

/// Plan `step_count + 1` positions from `start` to `end`
///
/// The first and last positions are exactly `start` and `end`. When both
/// are equal no curve is built and every position is `start`.
pub fn plan_path<R: Rng + ?Sized>(
    start: Position,
    end: Position,
    step_count: u32,
    params: &CurveParams,
    rng: &mut R,
) -> MotionResult<PathPlan> {
    if step_count == 0 {
        return Err(MotionError::config("step count must be > 0"));
    }
    if !start.is_finite() || !end.is_finite() {
        return Err(MotionError::InvalidGeometry(format!(
            "non-finite endpoints {:?} -> {:?}",
            start, end
        )));
    }
    params.validate()?;

    let steps = step_count as usize;
    if start == end {
        return Ok(vec![start; steps + 1]);
    }

    let mut path = control_curve(start, end, params, rng).lut(steps);
    path[0] = start;
    path[steps] = end;
    Ok(path)
}
