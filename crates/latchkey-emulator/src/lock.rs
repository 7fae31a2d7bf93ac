//! Lock state machine.
//!
//! Three states, four transitions:
//!
//! ```text
//! Locked --timed unlock--> TempUnlocked --timer expiry--> Locked
//! Locked --permanent unlock--> PermanentUnlocked
//! TempUnlocked | PermanentUnlocked --lock--> Locked
//! ```
//!
//! Unlock commands are only honored from `Locked`; a lock command is
//! honored from any state (locking an already-locked relay is an
//! idempotent no-op). Relocking by any path, timer expiry or explicit
//! lock, restores the default unlock duration.

use latchkey_core::LockState;
use latchkey_core::constants::DEFAULT_UNLOCK_MS;

/// The relay lock state and its relock timer.
#[derive(Debug)]
pub struct LockController {
    state: LockState,
    /// Tick timestamp when the current temporary unlock began.
    unlock_started_ms: u64,
    unlock_duration_ms: u64,
}

impl Default for LockController {
    fn default() -> Self {
        Self::new()
    }
}

impl LockController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LockState::Locked,
            unlock_started_ms: 0,
            unlock_duration_ms: DEFAULT_UNLOCK_MS,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> LockState {
        self.state
    }

    /// Begin a temporary unlock for `duration_ms`.
    ///
    /// Returns `true` if the transition happened; only honored from
    /// `Locked`.
    pub fn timed_unlock(&mut self, now_ms: u64, duration_ms: u64) -> bool {
        if self.state != LockState::Locked {
            return false;
        }
        self.state = LockState::TempUnlocked;
        self.unlock_started_ms = now_ms;
        self.unlock_duration_ms = duration_ms;
        true
    }

    /// Unlock until an explicit lock command. Only honored from `Locked`.
    pub fn permanent_unlock(&mut self) -> bool {
        if self.state != LockState::Locked {
            return false;
        }
        self.state = LockState::PermanentUnlocked;
        true
    }

    /// Relock immediately and restore the default unlock duration.
    ///
    /// Returns `true` if the state actually changed.
    pub fn lock(&mut self) -> bool {
        self.unlock_duration_ms = DEFAULT_UNLOCK_MS;
        if self.state == LockState::Locked {
            return false;
        }
        self.state = LockState::Locked;
        true
    }

    /// Force the relay into `TempUnlocked` with the given window,
    /// regardless of current state. Used by the RTE override, which
    /// preempts a permanent unlock just as it preempts everything else.
    pub fn force_temp_unlock(&mut self, now_ms: u64, duration_ms: u64) {
        self.state = LockState::TempUnlocked;
        self.unlock_started_ms = now_ms;
        self.unlock_duration_ms = duration_ms;
    }

    /// Advance the relock timer. Returns `true` if the timer expired and
    /// the relay relocked on this tick.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.state != LockState::TempUnlocked {
            return false;
        }
        if now_ms.saturating_sub(self.unlock_started_ms) >= self.unlock_duration_ms {
            self.state = LockState::Locked;
            self.unlock_duration_ms = DEFAULT_UNLOCK_MS;
            return true;
        }
        false
    }

    /// Milliseconds left on the relock timer; zero unless `TempUnlocked`.
    #[must_use]
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        if self.state != LockState::TempUnlocked {
            return 0;
        }
        self.unlock_duration_ms
            .saturating_sub(now_ms.saturating_sub(self.unlock_started_ms))
    }

    /// Return to the initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
