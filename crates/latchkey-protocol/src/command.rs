//! Inbound command recognition.
//!
//! Each billing partner speaks a different subset of the command
//! vocabulary, described here as a declarative table of recognized tokens
//! rather than per-partner branching. Lookup is case-insensitive; the
//! literal digit command `0` is unaffected by case folding.
//!
//! # Line Grammar
//!
//! ```text
//! <command>[ <duration_seconds>]\n
//! ```
//!
//! The whole line is matched against the partner's table first, so phrase
//! commands containing spaces (`open sesame!`) are recognized intact. Only
//! when that fails is a trailing token split off and interpreted as a
//! duration in seconds, clamped to [1, 3600]; a non-integer token is
//! silently discarded and the default duration applies.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use latchkey_core::BillingPartner;
//! use latchkey_protocol::{Command, parse_line};
//!
//! let cmd = parse_line("0 10", BillingPartner::Peak);
//! assert_eq!(cmd, Some(Command::TimedUnlock { duration: Duration::from_secs(10) }));
//!
//! // The phrase is a PEAK/DFACS command, not an ABC one.
//! assert!(parse_line("Open Sesame!", BillingPartner::Peak).is_some());
//! assert!(parse_line("Open Sesame!", BillingPartner::Abc).is_none());
//!
//! // Unrecognized text is a no-op, never an error.
//! assert_eq!(parse_line("hello world", BillingPartner::Dfacs), None);
//! ```

use latchkey_core::BillingPartner;
use latchkey_core::constants::{DEFAULT_UNLOCK_SECONDS, MAX_UNLOCK_SECONDS, MIN_UNLOCK_SECONDS};
use std::time::Duration;

/// A normalized inbound command.
///
/// Produced by [`parse_line`]; the controller applies it, the parser never
/// touches state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Unlock for a bounded window, then relock automatically.
    TimedUnlock {
        /// Requested unlock window, already clamped and defaulted.
        duration: Duration,
    },

    /// Unlock until an explicit lock command.
    PermanentUnlock,

    /// Relock immediately. Idempotent.
    Lock,

    /// Reset the RTE counter (DFACS only).
    AcknowledgeRte,

    /// Request an immediate status record (DFACS only).
    QueryStatus,
}

/// Command identity in the dialect tables, before a duration is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    TimedUnlock,
    PermanentUnlock,
    Lock,
    AcknowledgeRte,
    QueryStatus,
}

impl Verb {
    fn into_command(self, seconds: u64) -> Command {
        match self {
            Verb::TimedUnlock => Command::TimedUnlock {
                duration: Duration::from_secs(seconds),
            },
            Verb::PermanentUnlock => Command::PermanentUnlock,
            Verb::Lock => Command::Lock,
            Verb::AcknowledgeRte => Command::AcknowledgeRte,
            Verb::QueryStatus => Command::QueryStatus,
        }
    }
}

// Table entries are lowercase; input is case-folded before lookup.
const ABC_TABLE: &[(&str, Verb)] = &[
    ("0", Verb::TimedUnlock),
    ("a", Verb::PermanentUnlock),
    ("z", Verb::Lock),
];

const PEAK_TABLE: &[(&str, Verb)] = &[
    ("0", Verb::TimedUnlock),
    ("open sesame!", Verb::TimedUnlock),
    ("a", Verb::PermanentUnlock),
    ("z", Verb::Lock),
];

const DFACS_TABLE: &[(&str, Verb)] = &[
    ("0", Verb::TimedUnlock),
    ("open sesame!", Verb::TimedUnlock),
    ("a", Verb::PermanentUnlock),
    ("z", Verb::Lock),
    ("ack", Verb::AcknowledgeRte),
    ("status", Verb::QueryStatus),
];

fn command_table(partner: BillingPartner) -> &'static [(&'static str, Verb)] {
    match partner {
        BillingPartner::Abc => ABC_TABLE,
        BillingPartner::Peak => PEAK_TABLE,
        BillingPartner::Dfacs => DFACS_TABLE,
    }
}

fn lookup(table: &[(&str, Verb)], token: &str) -> Option<Verb> {
    table
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, verb)| *verb)
}

/// Parse one inbound line against the partner's command table.
///
/// Returns `None` for unrecognized input — the parser degrades to
/// "ignore", it never reports an error. Leading/trailing whitespace is
/// stripped before matching.
///
/// Duration handling: `0 10` unlocks for 10 seconds; out-of-range values
/// are clamped to [1, 3600]; `0 soon` falls back to the 5-second default.
#[must_use]
pub fn parse_line(line: &str, partner: BillingPartner) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let normalized = line.to_ascii_lowercase();
    let table = command_table(partner);

    // Whole-line match first so phrase commands keep their spaces.
    if let Some(verb) = lookup(table, &normalized) {
        return Some(verb.into_command(DEFAULT_UNLOCK_SECONDS));
    }

    // Otherwise the trailing token is a candidate duration.
    let (prefix, token) = normalized.rsplit_once(' ')?;
    let verb = lookup(table, prefix)?;
    let seconds = token
        .parse::<i64>()
        .ok()
        .map_or(DEFAULT_UNLOCK_SECONDS, |s| {
            s.clamp(MIN_UNLOCK_SECONDS as i64, MAX_UNLOCK_SECONDS as i64) as u64
        });

    Some(verb.into_command(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn secs(s: u64) -> Option<Command> {
        Some(Command::TimedUnlock {
            duration: Duration::from_secs(s),
        })
    }

    #[rstest]
    #[case(BillingPartner::Abc)]
    #[case(BillingPartner::Peak)]
    #[case(BillingPartner::Dfacs)]
    fn zero_unlocks_in_every_dialect(#[case] partner: BillingPartner) {
        assert_eq!(parse_line("0", partner), secs(5));
    }

    #[rstest]
    #[case("a", Command::PermanentUnlock)]
    #[case("A", Command::PermanentUnlock)]
    #[case("z", Command::Lock)]
    #[case("Z", Command::Lock)]
    fn letter_commands_are_case_insensitive(#[case] line: &str, #[case] expected: Command) {
        for partner in [BillingPartner::Abc, BillingPartner::Peak, BillingPartner::Dfacs] {
            assert_eq!(parse_line(line, partner), Some(expected));
        }
    }

    #[test]
    fn open_sesame_not_recognized_in_abc() {
        assert_eq!(parse_line("open sesame!", BillingPartner::Abc), None);
        assert_eq!(parse_line("Open Sesame!", BillingPartner::Peak), secs(5));
        assert_eq!(parse_line("OPEN SESAME!", BillingPartner::Dfacs), secs(5));
    }

    #[test]
    fn ack_and_status_are_dfacs_only() {
        assert_eq!(
            parse_line("ack", BillingPartner::Dfacs),
            Some(Command::AcknowledgeRte)
        );
        assert_eq!(
            parse_line("STATUS", BillingPartner::Dfacs),
            Some(Command::QueryStatus)
        );
        assert_eq!(parse_line("ack", BillingPartner::Peak), None);
        assert_eq!(parse_line("status", BillingPartner::Abc), None);
    }

    #[rstest]
    #[case("0 10", 10)]
    #[case("0 1", 1)]
    #[case("0 3600", 3600)]
    #[case("0 0", 1)] // clamped up
    #[case("0 -5", 1)] // clamped up
    #[case("0 9999", 3600)] // clamped down
    fn duration_token_is_clamped(#[case] line: &str, #[case] expected: u64) {
        assert_eq!(parse_line(line, BillingPartner::Peak), secs(expected));
    }

    #[test]
    fn non_numeric_duration_falls_back_to_default() {
        assert_eq!(parse_line("0 soon", BillingPartner::Dfacs), secs(5));
        assert_eq!(parse_line("0 1.5", BillingPartner::Dfacs), secs(5));
    }

    #[test]
    fn whitespace_is_stripped() {
        assert_eq!(parse_line("  z \r", BillingPartner::Abc), Some(Command::Lock));
        assert_eq!(parse_line("\t0 10\n", BillingPartner::Abc), secs(10));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("unlock please")]
    #[case("00")]
    #[case("zz 5")]
    fn unrecognized_input_is_ignored(#[case] line: &str) {
        assert_eq!(parse_line(line, BillingPartner::Dfacs), None);
    }

    #[test]
    fn duration_on_non_unlock_command_is_discarded() {
        assert_eq!(parse_line("z 10", BillingPartner::Abc), Some(Command::Lock));
    }
}
