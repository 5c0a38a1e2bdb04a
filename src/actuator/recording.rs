use crate::actuator::channel::{ActuatorError, ActuatorResult, PointerActuator};
use crate::actuator::types::{MouseButton, PointerEvent, PointerEventKind};
use crate::error::MotionResult;
use async_trait::async_trait;
use parking_lot::Mutex as ParkingMutex;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct FailurePlan {
    reject_moves_after: Option<usize>,
    reject_buttons: bool,
}

/// In-memory actuator that timestamps every accepted call
///
/// Clones share the same capture, so a test or a dry run can hand one clone
/// to a sequencer and inspect the events through another.
#[derive(Clone)]
pub struct RecordingActuator {
    events: Arc<ParkingMutex<Vec<PointerEvent>>>,
    failures: Arc<ParkingMutex<FailurePlan>>,
    position: Arc<ParkingMutex<(f64, f64)>>,
    move_attempts: Arc<AtomicUsize>,
    start_time: Instant,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self {
            events: Arc::new(ParkingMutex::new(Vec::new())),
            failures: Arc::new(ParkingMutex::new(FailurePlan::default())),
            position: Arc::new(ParkingMutex::new((0.0, 0.0))),
            move_attempts: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
        }
    }

    /// Reject every subsequent move
    pub fn reject_moves(&self) {
        self.reject_moves_after(0);
    }

    /// Accept `accepted` more moves in total, then reject the rest
    pub fn reject_moves_after(&self, accepted: usize) {
        self.failures.lock().reject_moves_after = Some(accepted);
    }

    pub fn reject_buttons(&self) {
        self.failures.lock().reject_buttons = true;
    }

    pub fn accept_all(&self) {
        *self.failures.lock() = FailurePlan::default();
    }

    pub fn events(&self) -> Vec<PointerEvent> {
        self.events.lock().clone()
    }

    pub fn moves(&self) -> Vec<PointerEvent> {
        self.events_of(PointerEventKind::Move)
    }

    pub fn events_of(&self, kind: PointerEventKind) -> Vec<PointerEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Number of move calls received, including rejected ones
    pub fn move_attempts(&self) -> usize {
        self.move_attempts.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.events.lock().clear();
        self.move_attempts.store(0, Ordering::SeqCst);
    }

    /// Write the capture as pretty JSON
    pub fn save_json(&self, path: &Path) -> MotionResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&*self.events.lock())?;
        std::fs::write(path, data)?;
        Ok(())
    }

    fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }

    fn push(&self, kind: PointerEventKind, button: Option<MouseButton>) {
        let (x, y) = *self.position.lock();
        let event = PointerEvent {
            kind,
            x,
            y,
            button,
            process_time_ms: self.elapsed_ms(),
        };
        tracing::trace!("pointer {:?} at ({:.1}, {:.1})", kind, x, y);
        self.events.lock().push(event);
    }

    fn accepted_moves(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == PointerEventKind::Move)
            .count()
    }
}

impl Default for RecordingActuator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PointerActuator for RecordingActuator {
    async fn move_to(&mut self, x: f64, y: f64) -> ActuatorResult<()> {
        self.move_attempts.fetch_add(1, Ordering::SeqCst);

        let limit = self.failures.lock().reject_moves_after;
        if let Some(limit) = limit {
            if self.accepted_moves() >= limit {
                return Err(ActuatorError::Rejected(format!(
                    "move to ({:.1}, {:.1}) rejected",
                    x, y
                )));
            }
        }

        *self.position.lock() = (x, y);
        self.push(PointerEventKind::Move, None);
        Ok(())
    }

    async fn down(&mut self, button: MouseButton) -> ActuatorResult<()> {
        if self.failures.lock().reject_buttons {
            return Err(ActuatorError::Rejected(format!("{} down rejected", button)));
        }
        self.push(PointerEventKind::Down, Some(button));
        Ok(())
    }

    async fn up(&mut self, button: MouseButton) -> ActuatorResult<()> {
        if self.failures.lock().reject_buttons {
            return Err(ActuatorError::Rejected(format!("{} up rejected", button)));
        }
        self.push(PointerEventKind::Up, Some(button));
        Ok(())
    }
}
