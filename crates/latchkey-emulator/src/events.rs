//! State-change observation.
//!
//! The controller announces every externally-visible transition through a
//! single [`ObserverSink`] seam. Front ends (the CLI's event log, a test
//! recorder) implement the trait; the controller never knows who is
//! listening.

use latchkey_core::{DoorState, LockState};
use std::sync::{Arc, Mutex};

/// An externally-visible state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// The relay moved to a new lock state.
    LockStateChanged(LockState),

    /// The simulated door sensor flipped.
    DoorStateChanged(DoorState),

    /// The RTE priority override engaged (`true`) or released (`false`).
    OverrideChanged(bool),
}

/// Receives state transitions as they happen.
///
/// Called synchronously from inside the controller, so implementations
/// must be quick and must never call back into the controller.
pub trait ObserverSink: Send {
    fn on_event(&mut self, event: StateEvent);
}

/// Discards every event. The default sink.
#[derive(Debug, Default)]
pub struct NullSink;

impl ObserverSink for NullSink {
    fn on_event(&mut self, _event: StateEvent) {}
}

/// Collects events into a shared list for later inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<StateEvent>>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<StateEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl ObserverSink for RecordingSink {
    fn on_event(&mut self, event: StateEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_clones_share_storage() {
        let sink = RecordingSink::new();
        let mut writer = sink.clone();
        writer.on_event(StateEvent::LockStateChanged(LockState::TempUnlocked));
        writer.on_event(StateEvent::OverrideChanged(true));

        assert_eq!(
            sink.events(),
            vec![
                StateEvent::LockStateChanged(LockState::TempUnlocked),
                StateEvent::OverrideChanged(true),
            ]
        );
    }
}
