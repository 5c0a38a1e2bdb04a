//! Asynchronous motion replay
//!
//! [`MotionSequencer`] replays planned paths through an actuator and owns
//! the pointer position; [`ClickSynthesizer`] layers the click protocol on
//! top. Both suspend only at timing waits, each guarded by a [`CancelToken`].

pub mod cancel;
pub mod click;
pub mod sequencer;

pub use cancel::CancelToken;
pub use click::{ClickOptions, ClickSynthesizer};
pub use sequencer::{MotionPhase, MotionSequencer, MotionState, MoveOptions};
