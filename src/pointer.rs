//! Shared pointer handle
//!
//! The outward-facing surface for automation code. Every operation locks the
//! underlying [`ClickSynthesizer`] for its whole duration, so concurrent
//! callers are queued instead of interleaving actuator commands.

use crate::actuator::channel::{ElementBoundsProvider, PointerActuator};
use crate::config::MotionConfig;
use crate::error::MotionResult;
use crate::geometry::Position;
use crate::motion::cancel::CancelToken;
use crate::motion::click::{ClickOptions, ClickSynthesizer};
use crate::motion::sequencer::MoveOptions;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cloneable, single-flight handle to one actuator session
pub struct HumanPointer<A> {
    inner: Arc<Mutex<ClickSynthesizer<A>>>,
    cancel: CancelToken,
}

impl<A> Clone for HumanPointer<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<A: PointerActuator> HumanPointer<A> {
    pub fn new(actuator: A, config: MotionConfig) -> MotionResult<Self> {
        let synthesizer = ClickSynthesizer::new(actuator, config)?;
        let cancel = synthesizer.sequencer().cancel_token();
        Ok(Self {
            inner: Arc::new(Mutex::new(synthesizer)),
            cancel,
        })
    }

    /// Cancel whatever operation currently holds the pointer
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Current position, once any in-flight operation has finished
    pub async fn position(&self) -> Position {
        self.inner.lock().await.position()
    }

    pub async fn initialize(&self, origin: Position) -> MotionResult<()> {
        let mut synthesizer = self.inner.lock().await;
        synthesizer.sequencer_mut().initialize_position(origin).await
    }

    pub async fn move_to(&self, x: f64, y: f64, options: &MoveOptions) -> MotionResult<()> {
        let mut synthesizer = self.inner.lock().await;
        synthesizer
            .sequencer_mut()
            .move_to(Position::new(x, y), options)
            .await
    }

    pub async fn move_by(&self, dx: f64, dy: f64, options: &MoveOptions) -> MotionResult<()> {
        let mut synthesizer = self.inner.lock().await;
        synthesizer.sequencer_mut().move_by(dx, dy, options).await
    }

    pub async fn move_to_element<P>(
        &self,
        provider: &P,
        element: &P::Element,
        options: &MoveOptions,
    ) -> MotionResult<()>
    where
        P: ElementBoundsProvider,
    {
        let mut synthesizer = self.inner.lock().await;
        synthesizer
            .sequencer_mut()
            .move_to_element(provider, element, options)
            .await
    }

    pub async fn click(&self, x: f64, y: f64, options: &ClickOptions) -> MotionResult<()> {
        let mut synthesizer = self.inner.lock().await;
        synthesizer.click(Position::new(x, y), options).await
    }

    pub async fn click_element<P>(
        &self,
        provider: &P,
        element: &P::Element,
        options: &ClickOptions,
    ) -> MotionResult<()>
    where
        P: ElementBoundsProvider,
    {
        let mut synthesizer = self.inner.lock().await;
        synthesizer.click_element(provider, element, options).await
    }
}
