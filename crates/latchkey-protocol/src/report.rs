//! Outbound report formatting and heartbeat pacing.
//!
//! Every outbound message is a single newline-terminated ASCII line:
//!
//! ```text
//! STATUS,<lock_state 0|1|2>,<rte_count>,<OPEN|CLOSED|NA>,<remaining_s>,<NORMAL|RTE_ACTIVE>
//! REJECTED,RTE_OVERRIDE_ACTIVE
//! RTE_OVERRIDE,ACTIVATED,<seconds>
//! RTE_OVERRIDE,DEACTIVATED
//! ```
//!
//! Formatting lives here; *whether* a report is emitted is the
//! controller's decision (reports are gated to the DFACS dialect).

use latchkey_core::constants::STATUS_INTERVAL_MS;
use latchkey_core::{DoorState, LockState};
use std::fmt;

/// One status record, ready to render.
///
/// `remaining_secs` is taken from whichever timer is authoritative at the
/// moment of the snapshot: the override window while the override is
/// active, the unlock timer while temporarily unlocked, otherwise zero.
/// Always non-negative, floored to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRecord {
    pub lock_state: LockState,
    pub rte_count: u32,
    /// Door position when the aux input is DPS/BOND, `None` (rendered
    /// as the literal `NA`) otherwise.
    pub door_state: Option<DoorState>,
    pub remaining_secs: u64,
    pub override_active: bool,
}

impl fmt::Display for StatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STATUS,{},{},", self.lock_state.as_u8(), self.rte_count)?;
        match self.door_state {
            Some(door) => write!(f, "{door}")?,
            None => write!(f, "NA")?,
        }
        let mode = if self.override_active {
            "RTE_ACTIVE"
        } else {
            "NORMAL"
        };
        write!(f, ",{},{}", self.remaining_secs, mode)
    }
}

/// An outbound protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    /// Periodic or on-transition status record.
    Status(StatusRecord),

    /// A command arrived while the RTE override was active.
    Rejected,

    /// The RTE override engaged for the given number of seconds.
    OverrideActivated { seconds: u64 },

    /// The RTE override window elapsed and the relay relocked.
    OverrideDeactivated,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Status(record) => write!(f, "{record}"),
            Report::Rejected => write!(f, "REJECTED,RTE_OVERRIDE_ACTIVE"),
            Report::OverrideActivated { seconds } => {
                write!(f, "RTE_OVERRIDE,ACTIVATED,{seconds}")
            }
            Report::OverrideDeactivated => write!(f, "RTE_OVERRIDE,DEACTIVATED"),
        }
    }
}

/// Paces the 1Hz status heartbeat.
///
/// The first heartbeat after construction (or [`reset`](Self::reset)) is
/// due immediately; subsequent ones every [`STATUS_INTERVAL_MS`].
#[derive(Debug, Default)]
pub struct StatusReporter {
    last_heartbeat_ms: Option<u64>,
}

impl StatusReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a heartbeat is due at `now_ms`, and if so record the
    /// emission time.
    pub fn heartbeat_due(&mut self, now_ms: u64) -> bool {
        let due = self
            .last_heartbeat_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= STATUS_INTERVAL_MS);
        if due {
            self.last_heartbeat_ms = Some(now_ms);
        }
        due
    }

    /// Forget pacing history; the next heartbeat becomes due immediately.
    pub fn reset(&mut self) {
        self.last_heartbeat_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn status_record_renders_all_fields() {
        let record = StatusRecord {
            lock_state: LockState::TempUnlocked,
            rte_count: 3,
            door_state: Some(DoorState::Open),
            remaining_secs: 4,
            override_active: true,
        };
        assert_eq!(record.to_string(), "STATUS,1,3,OPEN,4,RTE_ACTIVE");
    }

    #[test]
    fn status_record_renders_na_without_door_sensor() {
        let record = StatusRecord {
            lock_state: LockState::Locked,
            rte_count: 0,
            door_state: None,
            remaining_secs: 0,
            override_active: false,
        };
        assert_eq!(record.to_string(), "STATUS,0,0,NA,0,NORMAL");
    }

    #[rstest]
    #[case(Report::Rejected, "REJECTED,RTE_OVERRIDE_ACTIVE")]
    #[case(Report::OverrideActivated { seconds: 5 }, "RTE_OVERRIDE,ACTIVATED,5")]
    #[case(Report::OverrideDeactivated, "RTE_OVERRIDE,DEACTIVATED")]
    fn report_wire_format(#[case] report: Report, #[case] expected: &str) {
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn first_heartbeat_is_due_immediately() {
        let mut reporter = StatusReporter::new();
        assert!(reporter.heartbeat_due(0));
        assert!(!reporter.heartbeat_due(10));
    }

    #[test]
    fn heartbeat_paces_at_one_hertz() {
        let mut reporter = StatusReporter::new();
        assert!(reporter.heartbeat_due(0));
        assert!(!reporter.heartbeat_due(999));
        assert!(reporter.heartbeat_due(1000));
        assert!(!reporter.heartbeat_due(1500));
        assert!(reporter.heartbeat_due(2100));
    }

    #[test]
    fn reset_makes_heartbeat_due_again() {
        let mut reporter = StatusReporter::new();
        assert!(reporter.heartbeat_due(0));
        reporter.reset();
        assert!(reporter.heartbeat_due(1));
    }
}
