//! The relay controller actor.
//!
//! [`RelayController`] is the single owner of all emulator state: the
//! lock state machine, the RTE override window, the RTE counter, the
//! simulated door sensor, and the status heartbeat. Every input — panel
//! command lines, manual controls, the periodic tick — flows through one
//! of its methods, each of which takes an explicit `now_ms` and returns
//! the outbound [`Report`]s the caller should put on the wire.
//!
//! The controller never writes to a transport and never reads a clock;
//! that separation is what makes the whole state machine testable without
//! time passing.

use crate::events::{NullSink, ObserverSink, StateEvent};
use crate::lock::LockController;
use crate::rte::RteOverride;
use latchkey_core::constants::{MAX_UNLOCK_SECONDS, MIN_UNLOCK_SECONDS};
use latchkey_core::{Config, DoorState, LockState};
use latchkey_protocol::{Command, Report, StatusRecord, StatusReporter, parse_line};
use std::time::Duration;
use tracing::{debug, info};

/// Single-owner state machine for the emulated relay controller.
pub struct RelayController {
    config: Config,
    lock: LockController,
    rte: RteOverride,
    reporter: StatusReporter,
    rte_count: u32,
    door_state: DoorState,
    observer: Box<dyn ObserverSink>,
}

impl RelayController {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_observer(config, Box::new(NullSink))
    }

    /// Build a controller that announces state transitions to `observer`.
    #[must_use]
    pub fn with_observer(config: Config, observer: Box<dyn ObserverSink>) -> Self {
        Self {
            config,
            lock: LockController::new(),
            rte: RteOverride::new(),
            reporter: StatusReporter::new(),
            rte_count: 0,
            door_state: DoorState::Closed,
            observer,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn lock_state(&self) -> LockState {
        self.lock.state()
    }

    #[inline]
    #[must_use]
    pub fn door_state(&self) -> DoorState {
        self.door_state
    }

    #[inline]
    #[must_use]
    pub fn rte_count(&self) -> u32 {
        self.rte_count
    }

    #[inline]
    #[must_use]
    pub fn override_active(&self) -> bool {
        self.rte.is_active()
    }

    /// Replace the live configuration.
    ///
    /// Takes effect for the very next command; nothing already in flight
    /// is re-evaluated. Switching billing partner restarts heartbeat
    /// pacing so a newly reporting partner hears status immediately.
    pub fn set_config(&mut self, config: Config) {
        if config.billing_partner != self.config.billing_partner {
            self.reporter.reset();
        }
        info!(
            partner = %config.billing_partner,
            aux = %config.aux_type,
            "configuration updated"
        );
        self.config = config;
    }

    /// Process one inbound command line from the panel.
    ///
    /// Unrecognized lines are silently dropped. While the RTE override is
    /// active, a status query is the only command honored; every other
    /// recognized command is refused (and told so, if the partner hears
    /// reports at all).
    pub fn handle_line(&mut self, line: &str, now_ms: u64) -> Vec<Report> {
        let Some(command) = parse_line(line, self.config.billing_partner) else {
            debug!(line, "unrecognized command line dropped");
            return Vec::new();
        };

        if self.rte.is_active() && command != Command::QueryStatus {
            debug!(?command, "command refused during RTE override");
            if self.config.billing_partner.reports_enabled() {
                return vec![Report::Rejected];
            }
            return Vec::new();
        }

        self.apply(command, now_ms)
    }

    fn apply(&mut self, command: Command, now_ms: u64) -> Vec<Report> {
        match command {
            Command::TimedUnlock { duration } => {
                if self.lock.timed_unlock(now_ms, duration.as_millis() as u64) {
                    info!(seconds = duration.as_secs(), "timed unlock");
                    self.observer
                        .on_event(StateEvent::LockStateChanged(LockState::TempUnlocked));
                }
            }
            Command::PermanentUnlock => {
                if self.lock.permanent_unlock() {
                    info!("permanent unlock");
                    self.observer
                        .on_event(StateEvent::LockStateChanged(LockState::PermanentUnlocked));
                }
            }
            Command::Lock => {
                if self.lock.lock() {
                    info!("locked");
                    self.observer
                        .on_event(StateEvent::LockStateChanged(LockState::Locked));
                }
            }
            Command::AcknowledgeRte => {
                if self.config.rte_count_enabled {
                    info!(previous = self.rte_count, "RTE count acknowledged");
                    self.rte_count = 0;
                }
            }
            Command::QueryStatus => {}
        }

        // Every accepted command is answered with a fresh status record,
        // even when it changed nothing, so the panel sees its ack.
        if self.config.billing_partner.reports_enabled() {
            vec![Report::Status(self.status_record(now_ms))]
        } else {
            Vec::new()
        }
    }

    /// Fire the auxiliary exit-request input.
    ///
    /// Engages the RTE override when the aux input is RTE/REX and the
    /// relay is locked; anything else is a no-op. A successful activation
    /// bumps the RTE counter when counting is enabled.
    pub fn trigger_rte(&mut self, now_ms: u64) -> Vec<Report> {
        if !self
            .rte
            .try_activate(self.config.aux_type, self.lock.state(), now_ms)
        {
            debug!(
                aux = %self.config.aux_type,
                state = %self.lock.state(),
                "exit request ignored"
            );
            return Vec::new();
        }

        self.lock.force_temp_unlock(now_ms, self.rte.duration_ms());
        if self.config.rte_count_enabled {
            self.rte_count += 1;
        }
        info!(count = self.rte_count, "RTE override engaged");
        self.observer.on_event(StateEvent::OverrideChanged(true));
        self.observer
            .on_event(StateEvent::LockStateChanged(LockState::TempUnlocked));

        // Status first, then the notification, matching the order panels
        // already expect.
        if self.config.billing_partner.reports_enabled() {
            vec![
                Report::Status(self.status_record(now_ms)),
                Report::OverrideActivated {
                    seconds: self.rte.duration_ms() / 1000,
                },
            ]
        } else {
            Vec::new()
        }
    }

    /// Operator-initiated timed unlock, duration clamped like a wire
    /// command's. Blocked while the override is active.
    pub fn manual_unlock(&mut self, duration: Duration, now_ms: u64) -> Vec<Report> {
        if self.rte.is_active() {
            debug!("manual unlock blocked during RTE override");
            return Vec::new();
        }
        let seconds = duration
            .as_secs()
            .clamp(MIN_UNLOCK_SECONDS, MAX_UNLOCK_SECONDS);
        self.apply(
            Command::TimedUnlock {
                duration: Duration::from_secs(seconds),
            },
            now_ms,
        )
    }

    /// Flip the simulated door sensor. Only meaningful for DPS/BOND aux
    /// inputs; otherwise there is no door sensor to flip.
    pub fn toggle_door_state(&mut self) {
        if !self.config.aux_type.reports_door_state() {
            debug!(aux = %self.config.aux_type, "no door sensor on this aux input");
            return;
        }
        self.door_state = self.door_state.toggled();
        info!(door = %self.door_state, "door sensor toggled");
        self.observer
            .on_event(StateEvent::DoorStateChanged(self.door_state));
    }

    /// Operator shortcut that flips the relay between locked and
    /// permanently unlocked. Blocked while the override is active.
    pub fn toggle_lock_state(&mut self) {
        if self.rte.is_active() {
            debug!("manual lock toggle blocked during RTE override");
            return;
        }
        let changed = if self.lock.state().is_locked() {
            self.lock.permanent_unlock()
        } else {
            self.lock.lock()
        };
        if changed {
            info!(state = %self.lock.state(), "lock state toggled");
            self.observer
                .on_event(StateEvent::LockStateChanged(self.lock.state()));
        }
    }

    /// Advance timers by one tick.
    ///
    /// Order matters: override expiry is checked before the unlock timer
    /// (the override window owns the relay while active), then the 1Hz
    /// heartbeat.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Report> {
        let mut reports = Vec::new();

        if self.rte.is_active() {
            if self.rte.expired(now_ms) {
                self.rte.deactivate();
                let relocked = self.lock.lock();
                info!("RTE override released");
                self.observer.on_event(StateEvent::OverrideChanged(false));
                if relocked {
                    self.observer
                        .on_event(StateEvent::LockStateChanged(LockState::Locked));
                }
                if self.config.billing_partner.reports_enabled() {
                    reports.push(Report::Status(self.status_record(now_ms)));
                    reports.push(Report::OverrideDeactivated);
                }
            }
        } else if self.lock.tick(now_ms) {
            info!("unlock timer expired, relocked");
            self.observer
                .on_event(StateEvent::LockStateChanged(LockState::Locked));
            // The relock is a transition like any other; the panel hears
            // about it now, not at the next heartbeat.
            if self.config.billing_partner.reports_enabled() {
                reports.push(Report::Status(self.status_record(now_ms)));
            }
        }

        if self.config.billing_partner.reports_enabled() && self.reporter.heartbeat_due(now_ms) {
            reports.push(Report::Status(self.status_record(now_ms)));
        }

        reports
    }

    /// Return everything except the configuration to its initial state.
    pub fn reset(&mut self) {
        let was_unlocked = !self.lock.state().is_locked();
        let was_active = self.rte.is_active();
        self.lock.reset();
        self.rte.reset();
        self.rte_count = 0;
        self.door_state = DoorState::Closed;
        self.reporter.reset();
        info!("controller reset");
        if was_active {
            self.observer.on_event(StateEvent::OverrideChanged(false));
        }
        if was_unlocked {
            self.observer
                .on_event(StateEvent::LockStateChanged(LockState::Locked));
        }
    }

    /// Snapshot the current status record.
    ///
    /// While the override is active its window is the authoritative
    /// countdown; otherwise the unlock timer is. Remaining time is floored
    /// to whole seconds.
    #[must_use]
    pub fn status_record(&self, now_ms: u64) -> StatusRecord {
        let remaining_ms = if self.rte.is_active() {
            self.rte.remaining_ms(now_ms)
        } else {
            self.lock.remaining_ms(now_ms)
        };
        StatusRecord {
            lock_state: self.lock.state(),
            rte_count: self.rte_count,
            door_state: self
                .config
                .aux_type
                .reports_door_state()
                .then_some(self.door_state),
            remaining_secs: remaining_ms / 1000,
            override_active: self.rte.is_active(),
        }
    }
}
