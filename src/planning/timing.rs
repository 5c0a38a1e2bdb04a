//! Step timing
//!
//! Maps a planned path to one delay per transition. All strategies slow the
//! pointer near the endpoints or add bounded jitter, and every delay is
//! clamped to a strictly positive floor so the actuator is never driven
//! faster than the configured cadence.

use crate::config::{MotionConfig, TimingStrategy};
use crate::planning::path::PathPlan;
use crate::units;
use rand::Rng;
use std::f64::consts::PI;
use std::time::Duration;

/// One delay per transition between consecutive path positions
pub type TimingPlan = Vec<Duration>;

/// Floor used when the caller hands in a non-positive one
pub const FALLBACK_FLOOR_MS: f64 = 10.0;

/// Per-step jitter bounds of the jittered strategy, as factors of the mean
pub const JITTER_LOW: f64 = 0.7;
pub const JITTER_HIGH: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingParams {
    pub strategy: TimingStrategy,
    /// 0 = slowest, 1 = fastest (progress strategy)
    pub speed: f64,
    /// Pixels per second (time-budgeted and jittered strategies)
    pub base_speed: f64,
    pub acceleration: f64,
    pub noise_ms: f64,
    pub floor_ms: f64,
    /// Fixed total motion time, replacing the distance-derived budget
    pub budget_ms: Option<f64>,
}

impl TimingParams {
    pub fn from_config(config: &MotionConfig) -> Self {
        Self {
            strategy: config.timing,
            speed: config.speed,
            base_speed: config.base_speed,
            acceleration: config.acceleration,
            noise_ms: config.timing_noise_ms,
            floor_ms: config.min_step_delay_ms,
            budget_ms: None,
        }
    }

    /// Spend exactly `budget` on the move, on the time-budgeted curve
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.strategy = TimingStrategy::TimeBudgeted;
        self.budget_ms = Some(budget.as_secs_f64() * 1000.0);
        self
    }

    fn floor(&self) -> f64 {
        if self.floor_ms.is_finite() && self.floor_ms > 0.0 {
            self.floor_ms
        } else {
            FALLBACK_FLOOR_MS
        }
    }
}

/// Cubic ease-in-out on `[0, 1]`
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Progress-based delay for transition `index` of `total`, in milliseconds
pub fn progress_delay_ms(index: usize, total: usize, speed: f64, floor_ms: f64) -> f64 {
    let progress = index as f64 / total.max(1) as f64;
    let base_delay = 10.0 + (1.0 - speed) * 50.0;
    (base_delay * (1.0 - (progress * PI).sin()) * 0.5).max(floor_ms)
}

/// Plan one delay per transition of `path`
pub fn plan_delays<R: Rng + ?Sized>(
    path: &PathPlan,
    params: &TimingParams,
    rng: &mut R,
) -> TimingPlan {
    let transitions = path.len().saturating_sub(1);
    if transitions == 0 {
        return Vec::new();
    }

    let floor = params.floor();
    let distance = path[0].distance_to(&path[transitions]);

    let delays_ms: Vec<f64> = match params.strategy {
        TimingStrategy::Progress => (0..transitions)
            .map(|i| progress_delay_ms(i, transitions, params.speed, floor))
            .collect(),
        TimingStrategy::TimeBudgeted => {
            time_budgeted_ms(transitions, distance, params, rng)
        }
        TimingStrategy::Jittered => {
            let mean = units::ms_per_step(params.base_speed, distance / transitions as f64);
            (0..transitions)
                .map(|_| mean * rng.gen_range(JITTER_LOW..JITTER_HIGH))
                .collect()
        }
    };

    delays_ms
        .into_iter()
        .map(|ms| {
            let ms = if ms.is_finite() { ms.max(floor) } else { floor };
            Duration::from_micros((ms * 1000.0).round() as u64)
        })
        .collect()
}

fn time_budgeted_ms<R: Rng + ?Sized>(
    transitions: usize,
    distance: f64,
    params: &TimingParams,
    rng: &mut R,
) -> Vec<f64> {
    let total_ms = match params.budget_ms {
        Some(budget) => budget,
        None => {
            let base_ms = if params.base_speed > 0.0 {
                distance / params.base_speed * 1000.0
            } else {
                0.0
            };
            base_ms * (1.0 + params.acceleration * rng.gen::<f64>())
        }
    };

    let targets: Vec<f64> = (0..=transitions)
        .map(|i| ease_in_out_cubic(i as f64 / transitions as f64) * total_ms)
        .collect();

    targets
        .windows(2)
        .map(|pair| {
            let noise = if params.noise_ms > 0.0 {
                rng.gen_range(-params.noise_ms..=params.noise_ms)
            } else {
                0.0
            };
            (pair[1] - pair[0] + noise).max(0.0)
        })
        .collect()
}

/// Sum of all delays in a plan
pub fn total_duration(plan: &TimingPlan) -> Duration {
    plan.iter().sum()
}
