//! Motion configuration
//!
//! All tunables for path shape, timing and the click protocol. Every field
//! has a default, so a JSON document only needs to name what it changes:
//!
//! ```json
//! { "timing": "timeBudgeted", "baseSpeed": 300, "clickHoldRange": [40, 90] }
//! ```

use crate::error::{MotionError, MotionResult};
use crate::planning::path::MIN_DENSITY_STEPS;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Inclusive millisecond range, serialized as `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u64; 2]", into = "[u64; 2]")]
pub struct MsRange {
    pub min: u64,
    pub max: u64,
}

impl MsRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Degenerate range that always yields `ms`
    pub const fn fixed(ms: u64) -> Self {
        Self { min: ms, max: ms }
    }

    /// Uniform draw from the range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(self.min..=self.max))
    }

    pub fn contains(&self, duration: Duration) -> bool {
        let ms = duration.as_millis();
        ms >= self.min as u128 && ms <= self.max as u128
    }

    pub(crate) fn validate(&self, name: &str) -> MotionResult<()> {
        if self.min > self.max {
            return Err(MotionError::config(format!(
                "{} min ({}) must be <= max ({})",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

impl From<[u64; 2]> for MsRange {
    fn from([min, max]: [u64; 2]) -> Self {
        MsRange::new(min, max)
    }
}

impl From<MsRange> for [u64; 2] {
    fn from(range: MsRange) -> Self {
        [range.min, range.max]
    }
}

/// How a move picks its step count when the caller does not supply one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepSizing {
    /// Uniform in `[min_steps, max_steps)`
    #[default]
    Random,
    /// `max(5, distance / step_density)`
    Density,
}

/// How interior control points are pushed off the straight line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PerturbationMode {
    /// Scaled by `distance * randomness`
    #[default]
    Proportional,
    /// Scaled by `curve_intensity` pixels regardless of distance
    Fixed,
}

/// Delay strategy between consecutive path samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimingStrategy {
    /// Sine-shaped slow-fast-slow cadence driven by `speed`
    #[default]
    Progress,
    /// Cubic ease-in-out over a total budget derived from `base_speed`
    TimeBudgeted,
    /// Constant mean step time from `base_speed`, +/-30% per step
    Jittered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotionConfig {
    pub step_sizing: StepSizing,
    pub min_steps: u32,
    pub max_steps: u32,
    /// Upper bound on the step count of any single move
    pub step_limit: u32,
    /// Pixels per step for density sizing
    pub step_density: f64,
    /// Pixels per second
    pub base_speed: f64,
    /// Random stretch of the time budget, `T * (1 + acceleration * U)`
    pub acceleration: f64,
    pub speed: f64,
    pub randomness: f64,
    pub perturbation: PerturbationMode,
    /// Pixels, for fixed perturbation
    pub curve_intensity: f64,
    pub overshoot: bool,
    pub overshoot_ratio: f64,
    pub timing: TimingStrategy,
    /// Floor applied to every step delay
    pub min_step_delay_ms: f64,
    pub timing_noise_ms: f64,
    pub click_hold_range: MsRange,
    pub pre_click_delay_range: MsRange,
    pub post_click_jitter_px: f64,
    /// Press point offset, `U(-v/2, v/2)` per axis, 0 disables
    pub click_variance_px: f64,
    pub double_click_gap_range: MsRange,
    /// Fractions of the element box a target point is drawn from
    pub target_inset: (f64, f64),
    pub init_retries: u32,
    pub init_backoff_ms: u64,
    /// Fixed seed for reproducible motion; entropy when unset
    pub seed: Option<u64>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step_sizing: StepSizing::Random,
            min_steps: 15,
            max_steps: 50,
            step_limit: 10_000,
            step_density: 25.0,
            base_speed: 150.0,
            acceleration: 0.3,
            speed: 0.5,
            randomness: 0.3,
            perturbation: PerturbationMode::Proportional,
            curve_intensity: 30.0,
            overshoot: false,
            overshoot_ratio: 0.1,
            timing: TimingStrategy::Progress,
            min_step_delay_ms: 10.0,
            timing_noise_ms: 5.0,
            click_hold_range: MsRange::new(20, 150),
            pre_click_delay_range: MsRange::new(0, 150),
            post_click_jitter_px: 2.0,
            click_variance_px: 0.0,
            double_click_gap_range: MsRange::new(100, 300),
            target_inset: (0.2, 0.8),
            init_retries: 3,
            init_backoff_ms: 500,
            seed: None,
        }
    }
}

impl MotionConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> MotionResult<Self> {
        let config: MotionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> MotionResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> MotionResult<()> {
        if self.min_steps == 0 {
            return Err(MotionError::config("minSteps must be > 0"));
        }
        if self.min_steps > self.max_steps {
            return Err(MotionError::config(format!(
                "minSteps ({}) must be <= maxSteps ({})",
                self.min_steps, self.max_steps
            )));
        }
        if self.step_limit < self.max_steps || self.step_limit < MIN_DENSITY_STEPS {
            return Err(MotionError::config(format!(
                "stepLimit ({}) must be >= maxSteps ({}) and >= {}",
                self.step_limit, self.max_steps, MIN_DENSITY_STEPS
            )));
        }

        check_positive("stepDensity", self.step_density)?;
        check_positive("baseSpeed", self.base_speed)?;
        check_positive("minStepDelayMs", self.min_step_delay_ms)?;
        check_non_negative("acceleration", self.acceleration)?;
        check_non_negative("curveIntensity", self.curve_intensity)?;
        check_non_negative("timingNoiseMs", self.timing_noise_ms)?;
        check_non_negative("postClickJitterPx", self.post_click_jitter_px)?;
        check_non_negative("clickVariancePx", self.click_variance_px)?;
        check_fraction("speed", self.speed)?;
        check_fraction("randomness", self.randomness)?;
        check_fraction("overshootRatio", self.overshoot_ratio)?;
        check_inset(self.target_inset)?;

        self.click_hold_range.validate("clickHoldRange")?;
        self.pre_click_delay_range.validate("preClickDelayRange")?;
        self.double_click_gap_range.validate("doubleClickGapRange")?;

        Ok(())
    }

    pub fn init_backoff(&self) -> Duration {
        Duration::from_millis(self.init_backoff_ms)
    }
}

pub(crate) fn check_fraction(name: &str, value: f64) -> MotionResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MotionError::config(format!(
            "{} must be between 0.0 and 1.0, got {}",
            name, value
        )));
    }
    Ok(())
}

pub(crate) fn check_inset((min, max): (f64, f64)) -> MotionResult<()> {
    if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min > max {
        return Err(MotionError::config(format!(
            "targetInset must satisfy 0 <= min <= max <= 1, got [{}, {}]",
            min, max
        )));
    }
    Ok(())
}

pub(crate) fn check_positive(name: &str, value: f64) -> MotionResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MotionError::config(format!(
            "{} must be a finite value > 0, got {}",
            name, value
        )));
    }
    Ok(())
}

pub(crate) fn check_non_negative(name: &str, value: f64) -> MotionResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(MotionError::config(format!(
            "{} must be a finite value >= 0, got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_is_valid() {
        assert!(MotionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_min_steps_above_max_rejected() {
        let config = MotionConfig {
            min_steps: 60,
            max_steps: 40,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MotionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_steps_rejected() {
        let config = MotionConfig {
            min_steps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let bad = [
            MotionConfig {
                speed: -0.1,
                ..Default::default()
            },
            MotionConfig {
                randomness: 1.5,
                ..Default::default()
            },
            MotionConfig {
                min_step_delay_ms: 0.0,
                ..Default::default()
            },
            MotionConfig {
                base_speed: f64::NAN,
                ..Default::default()
            },
            MotionConfig {
                click_hold_range: MsRange::new(150, 20),
                ..Default::default()
            },
            MotionConfig {
                target_inset: (0.9, 0.1),
                ..Default::default()
            },
            MotionConfig {
                step_limit: 20,
                ..Default::default()
            },
            MotionConfig {
                click_variance_px: -1.0,
                ..Default::default()
            },
        ];

        for config in bad {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MotionConfig::from_json_str(
            r#"{ "timing": "timeBudgeted", "baseSpeed": 300, "clickHoldRange": [40, 90] }"#,
        )
        .unwrap();

        assert_eq!(config.timing, TimingStrategy::TimeBudgeted);
        assert_eq!(config.base_speed, 300.0);
        assert_eq!(config.click_hold_range, MsRange::new(40, 90));
        assert_eq!(config.min_steps, 15);
        assert_eq!(config.target_inset, (0.2, 0.8));
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        let result = MotionConfig::from_json_str(r#"{ "minSteps": 80, "maxSteps": 10 }"#);
        assert!(matches!(result, Err(MotionError::InvalidConfiguration(_))));

        let result = MotionConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(MotionError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motion.json");
        let config = MotionConfig {
            step_sizing: StepSizing::Density,
            seed: Some(7),
            ..Default::default()
        };
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = MotionConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ms_range_sample_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let range = MsRange::new(20, 150);
        for _ in 0..200 {
            assert!(range.contains(range.sample(&mut rng)));
        }
        assert_eq!(
            MsRange::fixed(50).sample(&mut rng),
            Duration::from_millis(50)
        );
    }
}
