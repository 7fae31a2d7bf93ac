//! RTE priority-override window.
//!
//! When an exit-request input (RTE/REX) fires while the relay is locked,
//! the override engages for a fixed window and takes precedence over
//! every host command except a status query. The window is not
//! configurable and cannot be extended by re-triggering.

use latchkey_core::AuxType;
use latchkey_core::LockState;
use latchkey_core::constants::RTE_OVERRIDE_MS;

/// Tracks the fixed-duration RTE override window.
#[derive(Debug)]
pub struct RteOverride {
    active: bool,
    started_ms: u64,
    duration_ms: u64,
}

impl Default for RteOverride {
    fn default() -> Self {
        Self::new()
    }
}

impl RteOverride {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: false,
            started_ms: 0,
            duration_ms: RTE_OVERRIDE_MS,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Fixed window length in milliseconds.
    #[inline]
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Attempt to engage the override.
    ///
    /// Engages only when the aux input is an exit request, the relay is
    /// locked, and no window is already running. Returns `true` on
    /// activation.
    pub fn try_activate(&mut self, aux: AuxType, lock_state: LockState, now_ms: u64) -> bool {
        if !aux.is_exit_request() || !lock_state.is_locked() || self.active {
            return false;
        }
        self.active = true;
        self.started_ms = now_ms;
        true
    }

    /// Whether the window has elapsed at `now_ms`.
    #[must_use]
    pub fn expired(&self, now_ms: u64) -> bool {
        self.active && now_ms.saturating_sub(self.started_ms) >= self.duration_ms
    }

    /// Release the override.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Milliseconds left in the window; zero when inactive.
    #[must_use]
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        if !self.active {
            return 0;
        }
        self.duration_ms
            .saturating_sub(now_ms.saturating_sub(self.started_ms))
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
