//! Property-based invariant tests for path and timing planning.
//!
//! 1. Paths have `steps + 1` positions pinned to both endpoints
//! 2. Degenerate moves repeat the start position
//! 3. Every delay respects the floor, one per transition
//! 4. Sampled targets stay inside the element box
//! 5. Density sizing stays between its minimum and the step limit
//! 6. Same seed, same plan

use human_cursor::config::{MotionConfig, StepSizing, TimingStrategy};
use human_cursor::geometry::{BoundingBox, Position};
use human_cursor::planning::path::{
    plan_path, resolve_step_count, CurveParams, Perturbation, MIN_DENSITY_STEPS,
};
use human_cursor::planning::target::sample_point;
use human_cursor::planning::timing::{plan_delays, TimingParams};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// ── Strategies ──────────────────────────────────────────────────────────

fn position_strategy() -> impl Strategy<Value = Position> {
    (-5000.0f64..5000.0, -5000.0f64..5000.0).prop_map(|(x, y)| Position::new(x, y))
}

fn curve_strategy() -> impl Strategy<Value = CurveParams> {
    let perturbation = prop_oneof![
        (0.0f64..=1.0).prop_map(|randomness| Perturbation::Proportional { randomness }),
        (0.0f64..400.0).prop_map(|intensity_px| Perturbation::Fixed { intensity_px }),
    ];
    (perturbation, proptest::option::of(0.0f64..=1.0)).prop_map(|(perturbation, overshoot)| {
        CurveParams {
            perturbation,
            overshoot,
        }
    })
}

fn timing_strategy() -> impl Strategy<Value = TimingParams> {
    let strategy = prop_oneof![
        Just(TimingStrategy::Progress),
        Just(TimingStrategy::TimeBudgeted),
        Just(TimingStrategy::Jittered),
    ];
    (
        strategy,
        0.0f64..=1.0,
        1.0f64..2000.0,
        0.0f64..=1.0,
        0.0f64..20.0,
        0.5f64..30.0,
        proptest::option::of(1.0f64..5000.0),
    )
        .prop_map(
            |(strategy, speed, base_speed, acceleration, noise_ms, floor_ms, budget_ms)| {
                TimingParams {
                    strategy,
                    speed,
                    base_speed,
                    acceleration,
                    noise_ms,
                    floor_ms,
                    budget_ms,
                }
            },
        )
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn path_is_pinned_to_endpoints(
        start in position_strategy(),
        end in position_strategy(),
        steps in 1u32..300,
        params in curve_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let path = plan_path(start, end, steps, &params, &mut rng).unwrap();

        prop_assert_eq!(path.len(), steps as usize + 1);
        prop_assert_eq!(path[0], start);
        prop_assert_eq!(*path.last().unwrap(), end);
        prop_assert!(path.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn degenerate_path_repeats_start(
        point in position_strategy(),
        steps in 1u32..100,
        params in curve_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let path = plan_path(point, point, steps, &params, &mut rng).unwrap();

        prop_assert_eq!(path.len(), steps as usize + 1);
        prop_assert!(path.iter().all(|p| *p == point));
    }

    #[test]
    fn delays_respect_floor(
        start in position_strategy(),
        end in position_strategy(),
        steps in 1u32..200,
        params in timing_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let curve = CurveParams {
            perturbation: Perturbation::Proportional { randomness: 0.3 },
            overshoot: None,
        };
        let path = plan_path(start, end, steps, &curve, &mut rng).unwrap();
        let delays = plan_delays(&path, &params, &mut rng);

        prop_assert_eq!(delays.len(), path.len() - 1);

        let floor = Duration::from_micros((params.floor_ms * 1000.0).round() as u64);
        let mut elapsed = Duration::ZERO;
        for delay in &delays {
            prop_assert!(*delay >= floor, "{:?} below floor {:?}", delay, floor);
            prop_assert!(*delay > Duration::ZERO);
            let next = elapsed + *delay;
            prop_assert!(next >= elapsed);
            elapsed = next;
        }
    }

    #[test]
    fn sampled_target_inside_box(
        x in -2000.0f64..2000.0,
        y in -2000.0f64..2000.0,
        width in 0.5f64..1000.0,
        height in 0.5f64..1000.0,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let bounds = BoundingBox::new(x, y, width, height);
        let point = sample_point(&bounds, 0.2, 0.8, &mut rng).unwrap();

        let eps = 1e-9 * (1.0 + x.abs().max(y.abs()));
        prop_assert!(point.x >= bounds.x - eps && point.x <= bounds.x + bounds.width + eps);
        prop_assert!(point.y >= bounds.y - eps && point.y <= bounds.y + bounds.height + eps);
    }

    #[test]
    fn density_sizing_has_floor(distance in 0.0f64..20000.0, density in 1.0f64..100.0) {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = MotionConfig {
            step_sizing: StepSizing::Density,
            step_density: density,
            ..Default::default()
        };
        let steps = resolve_step_count(&config, distance, &mut rng);

        prop_assert!(steps >= MIN_DENSITY_STEPS);
        prop_assert!(steps <= config.step_limit);
        prop_assert_eq!(
            steps,
            ((distance / density).floor() as u32)
                .max(MIN_DENSITY_STEPS)
                .min(config.step_limit)
        );
    }

    #[test]
    fn same_seed_same_plan(
        start in position_strategy(),
        end in position_strategy(),
        steps in 1u32..100,
        params in curve_strategy(),
        timing in timing_strategy(),
        seed in any::<u64>(),
    ) {
        let plan = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let path = plan_path(start, end, steps, &params, &mut rng).unwrap();
            let delays = plan_delays(&path, &timing, &mut rng);
            (path, delays)
        };

        prop_assert_eq!(plan(seed), plan(seed));
    }
}
