//! Speed unit conversions
//!
//! Speeds are canonically pixels per second and step density is pixels per
//! step. Some callers think in milliseconds per step instead; these helpers
//! convert between the two for a given step length.

/// Milliseconds spent on one step of `step_px` pixels at `px_per_sec`
pub fn ms_per_step(px_per_sec: f64, step_px: f64) -> f64 {
    if px_per_sec <= 0.0 {
        return 0.0;
    }
    step_px / px_per_sec * 1000.0
}

/// Pixels per second when each step of `step_px` pixels takes `ms_per_step`
pub fn px_per_sec(ms_per_step: f64, step_px: f64) -> f64 {
    if ms_per_step <= 0.0 {
        return 0.0;
    }
    step_px / ms_per_step * 1000.0
}
