//! Pure motion planning
//!
//! Path shape, step timing and target sampling. Nothing in here suspends or
//! touches an actuator; every random draw comes from the caller's generator.

pub mod bezier;
pub mod path;
pub mod target;
pub mod timing;

pub use bezier::CubicBezier;
pub use path::{plan_path, resolve_step_count, CurveParams, PathPlan, Perturbation};
pub use target::sample_point;
pub use timing::{ease_in_out_cubic, plan_delays, TimingParams, TimingPlan};
