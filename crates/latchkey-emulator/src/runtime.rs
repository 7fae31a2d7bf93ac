//! Cooperative tick loop hosting the controller.
//!
//! [`Emulator::run`] owns the controller, the transport, and the clock.
//! Each 10ms tick it samples the clock once, drains inbound panel lines,
//! drains queued manual controls, then advances the controller's timers.
//! Everything outside the loop talks to it through an [`EmulatorHandle`].

use crate::clock::{Clock, MonotonicClock};
use crate::controller::RelayController;
use latchkey_core::constants::TICK_INTERVAL_MS;
use latchkey_core::{Config, Error, Result};
use latchkey_protocol::Report;
use latchkey_transport::Transport;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// A manual control posted to the tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMsg {
    /// Fire the auxiliary exit-request input.
    TriggerRte,
    /// Operator timed unlock.
    ManualUnlock(Duration),
    /// Flip the simulated door sensor.
    ToggleDoor,
    /// Flip the relay between locked and permanently unlocked.
    ToggleLock,
    /// Replace the live configuration.
    UpdateConfig(Config),
    /// Return all state except configuration to initial values.
    Reset,
    /// Stop the tick loop.
    Shutdown,
}

/// Cloneable sender half for posting manual controls.
#[derive(Debug, Clone)]
pub struct EmulatorHandle {
    tx: UnboundedSender<ControlMsg>,
}

impl EmulatorHandle {
    fn post(&self, msg: ControlMsg) -> Result<()> {
        self.tx.send(msg).map_err(|_| Error::NotRunning)
    }

    /// Fire the auxiliary exit-request input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRunning`] if the tick loop has stopped.
    pub fn trigger_rte(&self) -> Result<()> {
        self.post(ControlMsg::TriggerRte)
    }

    /// Request an operator timed unlock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRunning`] if the tick loop has stopped.
    pub fn manual_unlock(&self, duration: Duration) -> Result<()> {
        self.post(ControlMsg::ManualUnlock(duration))
    }

    /// Flip the simulated door sensor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRunning`] if the tick loop has stopped.
    pub fn toggle_door(&self) -> Result<()> {
        self.post(ControlMsg::ToggleDoor)
    }

    /// Flip the relay between locked and permanently unlocked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRunning`] if the tick loop has stopped.
    pub fn toggle_lock(&self) -> Result<()> {
        self.post(ControlMsg::ToggleLock)
    }

    /// Replace the live configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRunning`] if the tick loop has stopped.
    pub fn update_config(&self, config: Config) -> Result<()> {
        self.post(ControlMsg::UpdateConfig(config))
    }

    /// Reset emulator state, keeping the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRunning`] if the tick loop has stopped.
    pub fn reset(&self) -> Result<()> {
        self.post(ControlMsg::Reset)
    }

    /// Ask the tick loop to stop after the current tick.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRunning`] if the tick loop has already stopped.
    pub fn shutdown(&self) -> Result<()> {
        self.post(ControlMsg::Shutdown)
    }
}

/// The tick loop: sole owner of the controller and its transport.
pub struct Emulator {
    controller: RelayController,
    transport: Box<dyn Transport>,
    clock: Box<dyn Clock>,
    control_rx: UnboundedReceiver<ControlMsg>,
}

impl Emulator {
    /// Build an emulator driven by real time.
    #[must_use]
    pub fn new(
        controller: RelayController,
        transport: Box<dyn Transport>,
    ) -> (Self, EmulatorHandle) {
        Self::with_clock(controller, transport, Box::new(MonotonicClock::new()))
    }

    /// Build an emulator driven by the given clock. Tests pair this with
    /// [`ManualClock`](crate::ManualClock) to step time by hand.
    #[must_use]
    pub fn with_clock(
        controller: RelayController,
        transport: Box<dyn Transport>,
        clock: Box<dyn Clock>,
    ) -> (Self, EmulatorHandle) {
        let (tx, control_rx) = unbounded_channel();
        (
            Self {
                controller,
                transport,
                clock,
                control_rx,
            },
            EmulatorHandle { tx },
        )
    }

    /// Run the tick loop until [`EmulatorHandle::shutdown`] is posted or
    /// every handle is dropped.
    ///
    /// # Errors
    ///
    /// Currently always returns `Ok`; the signature leaves room for
    /// transports whose failures should stop the loop.
    pub async fn run(mut self) -> Result<()> {
        let mut ticker = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("emulator loop started");

        loop {
            ticker.tick().await;
            let now_ms = self.clock.now_ms();

            self.drain_lines(now_ms);
            if !self.drain_controls(now_ms) {
                info!("emulator loop stopped");
                return Ok(());
            }

            let reports = self.controller.tick(now_ms);
            self.write_reports(&reports);
        }
    }

    fn drain_lines(&mut self, now_ms: u64) {
        loop {
            match self.transport.try_read_line() {
                Ok(Some(line)) => {
                    let reports = self.controller.handle_line(&line, now_ms);
                    self.write_reports(&reports);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "transport read failed");
                    break;
                }
            }
        }
    }

    /// Returns `false` when a shutdown was requested or all handles are
    /// gone.
    fn drain_controls(&mut self, now_ms: u64) -> bool {
        loop {
            let msg = match self.control_rx.try_recv() {
                Ok(msg) => msg,
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            };
            match msg {
                ControlMsg::TriggerRte => {
                    let reports = self.controller.trigger_rte(now_ms);
                    self.write_reports(&reports);
                }
                ControlMsg::ManualUnlock(duration) => {
                    let reports = self.controller.manual_unlock(duration, now_ms);
                    self.write_reports(&reports);
                }
                ControlMsg::ToggleDoor => self.controller.toggle_door_state(),
                ControlMsg::ToggleLock => self.controller.toggle_lock_state(),
                ControlMsg::UpdateConfig(config) => self.controller.set_config(config),
                ControlMsg::Reset => self.controller.reset(),
                ControlMsg::Shutdown => return false,
            }
        }
    }

    fn write_reports(&mut self, reports: &[Report]) {
        for report in reports {
            // A failed write never rolls state back; the panel missing a
            // report is its problem, same as real hardware.
            if let Err(e) = self.transport.write_line(&report.to_string()) {
                warn!(error = %e, "transport write failed");
            }
        }
    }
}
