//! Error taxonomy for motion planning and replay
//!
//! Every fallible operation in the crate returns [`MotionResult`]. Actuator
//! failures carry the actuator-side [`ActuatorError`] as their source.

use crate::actuator::channel::{ActuatorError, ActuatorOp};
use thiserror::Error;

/// Errors that can occur while planning or replaying pointer motion
#[derive(Error, Debug)]
pub enum MotionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Element bounds unavailable")]
    BoundsUnavailable,

    #[error("Actuator {op} failed: {source}")]
    Actuator {
        op: ActuatorOp,
        #[source]
        source: ActuatorError,
    },

    #[error("Actuator initialization failed after {attempts} attempts: {source}")]
    ActuatorInit {
        attempts: u32,
        #[source]
        source: ActuatorError,
    },

    #[error("Cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl MotionError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        MotionError::InvalidConfiguration(msg.into())
    }

    pub(crate) fn actuator(op: ActuatorOp, source: ActuatorError) -> Self {
        MotionError::Actuator { op, source }
    }
}

/// Result type for motion operations
pub type MotionResult<T> = Result<T, MotionError>;
