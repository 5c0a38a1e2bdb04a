//! Human Cursor - human-plausible pointer motion for automation.
//!
//! This is the main library crate. It plans curved pointer paths with
//! non-uniform timing, replays them through an external actuator and
//! synthesizes press/hold/release click sequences.

pub mod actuator;
pub mod config;
pub mod error;
pub mod geometry;
pub mod motion;
pub mod planning;
pub mod pointer;
pub mod units;

pub use actuator::{
    ActuatorError, ElementBoundsProvider, MouseButton, PointerActuator, RecordingActuator,
};
pub use config::{MotionConfig, MsRange, PerturbationMode, StepSizing, TimingStrategy};
pub use error::{MotionError, MotionResult};
pub use geometry::{BoundingBox, Position};
pub use motion::{
    CancelToken, ClickOptions, ClickSynthesizer, MotionPhase, MotionSequencer, MoveOptions,
};
pub use pointer::HumanPointer;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Human Cursor v{}", env!("CARGO_PKG_VERSION"));
}
