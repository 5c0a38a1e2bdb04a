//! Pointer actuation seams
//!
//! The core drives an external [`PointerActuator`] and asks an
//! [`ElementBoundsProvider`] for element geometry. [`RecordingActuator`]
//! is an in-memory actuator for dry runs, demos and tests.

pub mod channel;
pub mod recording;
pub mod types;

pub use channel::{ActuatorError, ActuatorOp, ActuatorResult, ElementBoundsProvider, PointerActuator};
pub use recording::RecordingActuator;
pub use types::{MouseButton, PointerEvent, PointerEventKind};
