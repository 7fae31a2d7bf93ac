//! Behavioral model of the door-access relay controller.
//!
//! This crate owns everything with real state, ordering, and timing
//! contracts: the lock state machine ([`LockController`]), the RTE
//! priority-override interrupt ([`RteOverride`]), the single-actor facade
//! that routes every command and manual control through one boundary
//! ([`RelayController`]), and the cooperative tick loop that hosts it
//! ([`Emulator`]).
//!
//! # Single-Actor Model
//!
//! One logical actor owns all mutable state. The [`Emulator`] loop is
//! that actor: each 10ms tick it drains inbound command lines, drains
//! queued manual controls (RTE button, door toggle, config edits), then
//! checks override expiry *before* unlock-timer expiry, then the 1Hz
//! status heartbeat. External actors never touch controller state
//! directly — they post [`ControlMsg`]s through an [`EmulatorHandle`].

pub mod clock;
pub mod controller;
pub mod events;
pub mod lock;
pub mod rte;
pub mod runtime;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use controller::RelayController;
pub use events::{NullSink, ObserverSink, RecordingSink, StateEvent};
pub use lock::LockController;
pub use rte::RteOverride;
pub use runtime::{ControlMsg, Emulator, EmulatorHandle};
