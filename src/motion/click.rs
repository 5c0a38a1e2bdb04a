//! Click synthesis
//!
//! Moves to the target, pauses, then presses and releases with a randomized
//! hold. Double clicks repeat the press at the same spot without planning a
//! new path. With click variance the presses land slightly off target and
//! the pointer returns to the target after the last release. A small drift
//! move after that keeps the pointer from resting on the exact click point.

use crate::actuator::channel::{ElementBoundsProvider, PointerActuator};
use crate::actuator::types::MouseButton;
use crate::config::{check_non_negative, MotionConfig, MsRange};
use crate::error::MotionResult;
use crate::geometry::Position;
use crate::motion::sequencer::{MotionSequencer, MoveOptions};
use rand::Rng;

/// Per-click overrides of the session configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickOptions {
    pub button: MouseButton,
    pub double_click: bool,
    pub hold_range: Option<MsRange>,
    pub pre_click_delay_range: Option<MsRange>,
    pub double_click_gap_range: Option<MsRange>,
    pub post_click_jitter_px: Option<f64>,
    pub click_variance_px: Option<f64>,
    /// Options for the approach move, including the element inset
    pub motion: MoveOptions,
}

impl ClickOptions {
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn double(mut self) -> Self {
        self.double_click = true;
        self
    }

    pub fn with_hold_range(mut self, range: MsRange) -> Self {
        self.hold_range = Some(range);
        self
    }

    pub fn with_click_variance(mut self, variance_px: f64) -> Self {
        self.click_variance_px = Some(variance_px);
        self
    }

    pub fn with_motion(mut self, motion: MoveOptions) -> Self {
        self.motion = motion;
        self
    }

    /// Inset fractions for `click_element`
    pub fn with_inset(mut self, min: f64, max: f64) -> Self {
        self.motion = self.motion.with_inset(min, max);
        self
    }
}

/// Timing of one click, resolved against the session config
#[derive(Debug, Clone, Copy)]
struct ClickTiming {
    pre_click: MsRange,
    hold: MsRange,
    gap: MsRange,
    jitter_px: f64,
    variance_px: f64,
}

impl ClickTiming {
    fn resolve(config: &MotionConfig, options: &ClickOptions) -> MotionResult<Self> {
        let timing = Self {
            pre_click: options
                .pre_click_delay_range
                .unwrap_or(config.pre_click_delay_range),
            hold: options.hold_range.unwrap_or(config.click_hold_range),
            gap: options
                .double_click_gap_range
                .unwrap_or(config.double_click_gap_range),
            jitter_px: options
                .post_click_jitter_px
                .unwrap_or(config.post_click_jitter_px),
            variance_px: options
                .click_variance_px
                .unwrap_or(config.click_variance_px),
        };

        timing.pre_click.validate("preClickDelayRange")?;
        timing.hold.validate("clickHoldRange")?;
        timing.gap.validate("doubleClickGapRange")?;
        check_non_negative("postClickJitterPx", timing.jitter_px)?;
        check_non_negative("clickVariancePx", timing.variance_px)?;

        Ok(timing)
    }
}

/// Press/hold/release protocol on top of a [`MotionSequencer`]
pub struct ClickSynthesizer<A> {
    sequencer: MotionSequencer<A>,
}

impl<A: PointerActuator> ClickSynthesizer<A> {
    pub fn new(actuator: A, config: MotionConfig) -> MotionResult<Self> {
        Ok(Self::from_sequencer(MotionSequencer::new(actuator, config)?))
    }

    pub fn from_sequencer(sequencer: MotionSequencer<A>) -> Self {
        Self { sequencer }
    }

    pub fn sequencer(&self) -> &MotionSequencer<A> {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut MotionSequencer<A> {
        &mut self.sequencer
    }

    pub fn into_sequencer(self) -> MotionSequencer<A> {
        self.sequencer
    }

    pub fn position(&self) -> Position {
        self.sequencer.position()
    }

    /// Move to `target` and click it
    pub async fn click(&mut self, target: Position, options: &ClickOptions) -> MotionResult<()> {
        let timing = ClickTiming::resolve(self.sequencer.config(), options)?;

        self.sequencer.move_to(target, &options.motion).await?;

        let pre_click = timing.pre_click.sample(self.sequencer.rng_mut());
        self.sequencer.pause(pre_click).await?;

        if timing.variance_px > 0.0 {
            let v = timing.variance_px;
            let rng = self.sequencer.rng_mut();
            let dx = rng.gen::<f64>() * v - v / 2.0;
            let dy = rng.gen::<f64>() * v - v / 2.0;
            self.sequencer.jump_to(target.offset(dx, dy)).await?;
        }

        self.press_and_release(options.button, timing.hold).await?;

        if options.double_click {
            let gap = timing.gap.sample(self.sequencer.rng_mut());
            self.sequencer.pause(gap).await?;
            self.press_and_release(options.button, timing.hold).await?;
        }

        if timing.variance_px > 0.0 {
            self.sequencer.jump_to(target).await?;
        }

        if timing.jitter_px > 0.0 {
            self.sequencer.drift(timing.jitter_px).await?;
        }

        tracing::debug!(
            "{} {}click at ({:.1}, {:.1})",
            options.button,
            if options.double_click { "double " } else { "" },
            target.x,
            target.y
        );
        Ok(())
    }

    /// Click a random point inside an element's bounds
    pub async fn click_element<P>(
        &mut self,
        provider: &P,
        element: &P::Element,
        options: &ClickOptions,
    ) -> MotionResult<()>
    where
        P: ElementBoundsProvider,
    {
        let target = self
            .sequencer
            .element_target(provider, element, &options.motion)
            .await?;
        self.click(target, options).await
    }

    async fn press_and_release(&mut self, button: MouseButton, hold: MsRange) -> MotionResult<()> {
        self.sequencer.press(button).await?;
        let hold = hold.sample(self.sequencer.rng_mut());
        self.sequencer.pause(hold).await?;
        self.sequencer.release(button).await
    }
}
