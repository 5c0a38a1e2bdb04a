//! Cooperative cancellation for in-flight motion

use crate::error::{MotionError, MotionResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Shared cancellation flag checked at every suspension point
///
/// Cancelling wakes a pending [`CancelToken::sleep`] immediately. The token
/// stays cancelled, failing every later suspension, until [`reset`] is
/// called.
///
/// [`reset`]: CancelToken::reset
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn reset(&self) {
        self.inner.cancelled.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> MotionResult<()> {
        if self.is_cancelled() {
            return Err(MotionError::Cancelled);
        }
        Ok(())
    }

    /// Sleep for `duration` unless cancelled first
    pub async fn sleep(&self, duration: Duration) -> MotionResult<()> {
        // Registered before the flag check so a concurrent cancel cannot slip between them
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);

        self.check()?;

        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = &mut notified => Err(MotionError::Cancelled),
        }
    }
}
