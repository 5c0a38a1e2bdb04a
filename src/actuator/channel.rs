//! Pointer actuator and element geometry traits
//!
//! Defines the interface to the external driver that actually moves a
//! pointer, and to whatever reports element bounds.

use crate::actuator::types::MouseButton;
use crate::geometry::BoundingBox;
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by an actuator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActuatorError {
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Disconnected: {0}")]
    Disconnected(String),
}

/// Result type for actuator calls
pub type ActuatorResult<T> = Result<T, ActuatorError>;

/// Actuator operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorOp {
    Move,
    Down,
    Up,
}

impl std::fmt::Display for ActuatorOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActuatorOp::Move => write!(f, "move"),
            ActuatorOp::Down => write!(f, "down"),
            ActuatorOp::Up => write!(f, "up"),
        }
    }
}

/// Trait for pointer actuators
///
/// Implementations must apply calls in the order they are issued. A failed
/// call is reported back to the caller and never retried by the actuator.
#[async_trait]
pub trait PointerActuator: Send {
    /// Move the pointer to absolute device coordinates
    async fn move_to(&mut self, x: f64, y: f64) -> ActuatorResult<()>;

    /// Press a button at the current pointer location
    async fn down(&mut self, button: MouseButton) -> ActuatorResult<()>;

    /// Release a button at the current pointer location
    async fn up(&mut self, button: MouseButton) -> ActuatorResult<()>;
}

/// Source of element geometry
///
/// Returns `None` when the element has no layout box (detached, hidden, ...).
#[async_trait]
pub trait ElementBoundsProvider: Send + Sync {
    type Element: ?Sized + Sync;

    async fn bounding_box(&self, element: &Self::Element) -> Option<BoundingBox>;
}

#[async_trait]
impl<A: PointerActuator + ?Sized> PointerActuator for Box<A> {
    async fn move_to(&mut self, x: f64, y: f64) -> ActuatorResult<()> {
        (**self).move_to(x, y).await
    }

    async fn down(&mut self, button: MouseButton) -> ActuatorResult<()> {
        (**self).down(button).await
    }

    async fn up(&mut self, button: MouseButton) -> ActuatorResult<()> {
        (**self).up(button).await
    }
}
