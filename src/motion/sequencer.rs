//! Motion sequencing
//!
//! Plans a path and its timing, then replays it through the actuator one
//! step at a time. The sequencer owns the session's pointer position and is
//! the only thing that updates it.

use crate::actuator::channel::{ActuatorOp, ElementBoundsProvider, PointerActuator};
use crate::actuator::types::MouseButton;
use crate::config::{
    check_fraction, check_inset, check_non_negative, check_positive, MotionConfig,
    PerturbationMode, StepSizing, TimingStrategy,
};
use crate::error::{MotionError, MotionResult};
use crate::geometry::Position;
use crate::motion::cancel::CancelToken;
use crate::planning::path::{plan_path, resolve_step_count, CurveParams};
use crate::planning::target::sample_point;
use crate::planning::timing::{plan_delays, total_duration, TimingParams};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Where the sequencer is in its current move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    Idle,
    Planning,
    Stepping { step: usize, of: usize },
    Settled,
}

/// Session-scoped pointer state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    pub current_position: Position,
}

/// Per-call overrides of the session configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveOptions {
    pub steps: Option<u32>,
    pub step_sizing: Option<StepSizing>,
    /// Pixels per step for density sizing
    pub step_density: Option<f64>,
    pub speed: Option<f64>,
    /// Pixels per second
    pub base_speed: Option<f64>,
    pub acceleration: Option<f64>,
    pub randomness: Option<f64>,
    pub perturbation: Option<PerturbationMode>,
    pub curve_intensity: Option<f64>,
    pub overshoot: Option<bool>,
    pub timing: Option<TimingStrategy>,
    /// Total motion time; forces the time-budgeted strategy
    pub duration: Option<Duration>,
    /// Inset fractions used when the target is an element
    pub inset: Option<(f64, f64)>,
}

impl MoveOptions {
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn with_step_sizing(mut self, sizing: StepSizing) -> Self {
        self.step_sizing = Some(sizing);
        self
    }

    pub fn with_step_density(mut self, px_per_step: f64) -> Self {
        self.step_density = Some(px_per_step);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_base_speed(mut self, px_per_sec: f64) -> Self {
        self.base_speed = Some(px_per_sec);
        self
    }

    pub fn with_acceleration(mut self, acceleration: f64) -> Self {
        self.acceleration = Some(acceleration);
        self
    }

    pub fn with_randomness(mut self, randomness: f64) -> Self {
        self.randomness = Some(randomness);
        self
    }

    pub fn with_perturbation(mut self, mode: PerturbationMode) -> Self {
        self.perturbation = Some(mode);
        self
    }

    pub fn with_curve_intensity(mut self, intensity_px: f64) -> Self {
        self.curve_intensity = Some(intensity_px);
        self
    }

    pub fn with_overshoot(mut self, overshoot: bool) -> Self {
        self.overshoot = Some(overshoot);
        self
    }

    pub fn with_timing(mut self, timing: TimingStrategy) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_inset(mut self, min: f64, max: f64) -> Self {
        self.inset = Some((min, max));
        self
    }

    /// Session config with these overrides applied
    fn apply(&self, config: &MotionConfig) -> MotionResult<MotionConfig> {
        let mut effective = config.clone();

        if let Some(steps) = self.steps {
            if steps == 0 || steps > config.step_limit {
                return Err(MotionError::config(format!(
                    "steps must be in 1..={}, got {}",
                    config.step_limit, steps
                )));
            }
        }
        if let Some(sizing) = self.step_sizing {
            effective.step_sizing = sizing;
        }
        if let Some(density) = self.step_density {
            check_positive("stepDensity", density)?;
            effective.step_density = density;
        }
        if let Some(speed) = self.speed {
            check_fraction("speed", speed)?;
            effective.speed = speed;
        }
        if let Some(base_speed) = self.base_speed {
            check_positive("baseSpeed", base_speed)?;
            effective.base_speed = base_speed;
        }
        if let Some(acceleration) = self.acceleration {
            check_non_negative("acceleration", acceleration)?;
            effective.acceleration = acceleration;
        }
        if let Some(randomness) = self.randomness {
            check_fraction("randomness", randomness)?;
            effective.randomness = randomness;
        }
        if let Some(mode) = self.perturbation {
            effective.perturbation = mode;
        }
        if let Some(intensity) = self.curve_intensity {
            check_non_negative("curveIntensity", intensity)?;
            effective.curve_intensity = intensity;
        }
        if let Some(overshoot) = self.overshoot {
            effective.overshoot = overshoot;
        }
        if let Some(timing) = self.timing {
            effective.timing = timing;
        }
        if let Some(duration) = self.duration {
            if duration.is_zero() {
                return Err(MotionError::config("duration must be > 0"));
            }
        }
        if let Some(inset) = self.inset {
            check_inset(inset)?;
            effective.target_inset = inset;
        }

        Ok(effective)
    }

    fn timing_params(&self, config: &MotionConfig) -> TimingParams {
        let params = TimingParams::from_config(config);
        match self.duration {
            Some(duration) => params.with_budget(duration),
            None => params,
        }
    }
}

/// Replays planned motion through a single actuator
///
/// Every operation takes `&mut self`, so one sequencer never has two moves
/// in flight. Share it behind [`crate::HumanPointer`] when several tasks
/// need the same pointer.
pub struct MotionSequencer<A> {
    actuator: A,
    config: MotionConfig,
    state: MotionState,
    phase: MotionPhase,
    rng: ChaCha8Rng,
    cancel: CancelToken,
}

impl<A: PointerActuator> MotionSequencer<A> {
    /// Validate `config` and start idle at the origin
    pub fn new(actuator: A, config: MotionConfig) -> MotionResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            actuator,
            config,
            state: MotionState::default(),
            phase: MotionPhase::Idle,
            rng,
            cancel: CancelToken::new(),
        })
    }

    pub fn position(&self) -> Position {
        self.state.current_position
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn into_actuator(self) -> A {
        self.actuator
    }

    /// Bring the actuator to a known origin
    ///
    /// Failures are retried `init_retries` times with `init_backoff_ms`
    /// between attempts. The position is only updated on success.
    pub async fn initialize_position(&mut self, origin: Position) -> MotionResult<()> {
        let attempts = self.config.init_retries.saturating_add(1);
        let backoff = self.config.init_backoff();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.actuator.move_to(origin.x, origin.y).await {
                Ok(()) => {
                    self.state.current_position = origin;
                    self.phase = MotionPhase::Idle;
                    tracing::info!(
                        "Pointer initialized at ({:.1}, {:.1}) after {} attempt(s)",
                        origin.x,
                        origin.y,
                        attempt
                    );
                    return Ok(());
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        "Pointer initialization attempt {}/{} failed: {}",
                        attempt,
                        attempts,
                        e
                    );
                    self.cancel.sleep(backoff).await?;
                }
                Err(e) => {
                    return Err(MotionError::ActuatorInit {
                        attempts: attempt,
                        source: e,
                    });
                }
            }
        }
    }

    /// Move along a planned human-like path to `target`
    ///
    /// On success the position is exactly `target`. On failure it is the
    /// last step the actuator accepted.
    pub async fn move_to(&mut self, target: Position, options: &MoveOptions) -> MotionResult<()> {
        let result = self.run_move(target, options).await;
        if result.is_err() {
            self.phase = MotionPhase::Idle;
        }
        result
    }

    /// Move relative to the current position
    pub async fn move_by(&mut self, dx: f64, dy: f64, options: &MoveOptions) -> MotionResult<()> {
        let target = self.state.current_position.offset(dx, dy);
        self.move_to(target, options).await
    }

    /// Move to a random point inside an element's bounds
    pub async fn move_to_element<P>(
        &mut self,
        provider: &P,
        element: &P::Element,
        options: &MoveOptions,
    ) -> MotionResult<()>
    where
        P: ElementBoundsProvider,
    {
        let target = self.element_target(provider, element, options).await?;
        self.move_to(target, options).await
    }

    async fn run_move(&mut self, target: Position, options: &MoveOptions) -> MotionResult<()> {
        if !target.is_finite() {
            return Err(MotionError::InvalidGeometry(format!(
                "non-finite target {:?}",
                target
            )));
        }
        let config = options.apply(&self.config)?;
        self.cancel.check()?;

        self.phase = MotionPhase::Planning;
        let start = self.state.current_position;
        let distance = start.distance_to(&target);
        let steps = match options.steps {
            Some(steps) => steps,
            None => resolve_step_count(&config, distance, &mut self.rng),
        };

        let path = plan_path(
            start,
            target,
            steps,
            &CurveParams::from_config(&config),
            &mut self.rng,
        )?;
        let delays = plan_delays(&path, &options.timing_params(&config), &mut self.rng);

        tracing::debug!(
            "Planned move ({:.1}, {:.1}) -> ({:.1}, {:.1}): {} steps over {:?}",
            start.x,
            start.y,
            target.x,
            target.y,
            steps,
            total_duration(&delays)
        );

        let of = delays.len();
        for (step, (point, delay)) in path.iter().skip(1).zip(delays.iter()).enumerate() {
            self.phase = MotionPhase::Stepping { step, of };
            self.actuator
                .move_to(point.x, point.y)
                .await
                .map_err(|e| MotionError::actuator(ActuatorOp::Move, e))?;
            self.state.current_position = *point;
            self.cancel.sleep(*delay).await?;
        }

        self.phase = MotionPhase::Settled;
        self.actuator
            .move_to(target.x, target.y)
            .await
            .map_err(|e| MotionError::actuator(ActuatorOp::Move, e))?;
        self.state.current_position = target;

        Ok(())
    }

    pub(crate) async fn element_target<P>(
        &mut self,
        provider: &P,
        element: &P::Element,
        options: &MoveOptions,
    ) -> MotionResult<Position>
    where
        P: ElementBoundsProvider,
    {
        let (min, max) = options.inset.unwrap_or(self.config.target_inset);
        let bounds = provider
            .bounding_box(element)
            .await
            .ok_or(MotionError::BoundsUnavailable)?;
        sample_point(&bounds, min, max, &mut self.rng)
    }

    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub(crate) async fn pause(&mut self, duration: Duration) -> MotionResult<()> {
        self.cancel.sleep(duration).await
    }

    pub(crate) async fn press(&mut self, button: MouseButton) -> MotionResult<()> {
        self.actuator
            .down(button)
            .await
            .map_err(|e| MotionError::actuator(ActuatorOp::Down, e))
    }

    pub(crate) async fn release(&mut self, button: MouseButton) -> MotionResult<()> {
        self.actuator
            .up(button)
            .await
            .map_err(|e| MotionError::actuator(ActuatorOp::Up, e))
    }

    /// Nudge the pointer by up to `jitter_px` on each axis
    pub(crate) async fn drift(&mut self, jitter_px: f64) -> MotionResult<()> {
        let dx = self.rng.gen_range(-jitter_px..=jitter_px);
        let dy = self.rng.gen_range(-jitter_px..=jitter_px);
        let target = self.state.current_position.offset(dx, dy);

        self.jump_to(target).await?;
        tracing::debug!("Post-click drift by ({:.2}, {:.2})", dx, dy);
        Ok(())
    }

    /// Single unplanned move, committed once the actuator accepts it
    pub(crate) async fn jump_to(&mut self, target: Position) -> MotionResult<()> {
        self.actuator
            .move_to(target.x, target.y)
            .await
            .map_err(|e| MotionError::actuator(ActuatorOp::Move, e))?;
        self.state.current_position = target;
        Ok(())
    }
}
