use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relay lock state.
///
/// Exactly one holder (the controller) owns a value of this type; it is
/// mutated only by the lock state machine and the RTE override manager,
/// never directly from the command parser.
///
/// # Wire Mapping
///
/// Status records carry the numeric form: `Locked` = 0, `TempUnlocked` = 1,
/// `PermanentUnlocked` = 2. Use [`as_u8`](LockState::as_u8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Relay energized, door locked. Initial state.
    Locked,

    /// Temporarily unlocked; an unlock timer (or the RTE override window)
    /// drives the eventual automatic relock.
    TempUnlocked,

    /// Permanently unlocked until an explicit lock command.
    PermanentUnlocked,
}

impl LockState {
    /// Numeric wire encoding used in status records.
    #[inline]
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            LockState::Locked => 0,
            LockState::TempUnlocked => 1,
            LockState::PermanentUnlocked => 2,
        }
    }

    /// Returns `true` if the relay is locked.
    #[inline]
    #[must_use]
    pub fn is_locked(self) -> bool {
        matches!(self, LockState::Locked)
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LockState::Locked => "LOCKED",
            LockState::TempUnlocked => "TEMP_UNLOCKED",
            LockState::PermanentUnlocked => "PERMANENT_UNLOCKED",
        };
        write!(f, "{s}")
    }
}

/// Door position, as reported by a DPS/BOND auxiliary input.
///
/// An independent axis from [`LockState`]: the door sensor is toggled
/// externally and is reported in status records, but never gates a lock
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    Open,
    Closed,
}

impl DoorState {
    /// The opposite door position.
    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            DoorState::Open => DoorState::Closed,
            DoorState::Closed => DoorState::Open,
        }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoorState::Open => write!(f, "OPEN"),
            DoorState::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Billing-partner command dialect spoken by the host panel.
///
/// Each partner profile recognizes a different command vocabulary and has
/// different reporting rules; see the protocol crate's dialect tables.
/// Only DFACS panels receive status, rejection, and override notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillingPartner {
    Abc,
    Peak,
    Dfacs,
}

impl BillingPartner {
    /// Returns `true` if this partner receives outbound reports
    /// (status records, rejections, override notifications).
    #[inline]
    #[must_use]
    pub fn reports_enabled(self) -> bool {
        matches!(self, BillingPartner::Dfacs)
    }
}

impl fmt::Display for BillingPartner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BillingPartner::Abc => "ABC",
            BillingPartner::Peak => "PEAK",
            BillingPartner::Dfacs => "DFACS",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for BillingPartner {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ABC" => Ok(BillingPartner::Abc),
            "PEAK" => Ok(BillingPartner::Peak),
            "DFACS" => Ok(BillingPartner::Dfacs),
            other => Err(Error::Config(format!("Unknown billing partner: {other}"))),
        }
    }
}

/// Auxiliary input type wired to the relay controller.
///
/// RTE/REX inputs trigger the priority override; DPS/BOND inputs report
/// door position and never unlock anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuxType {
    /// Request-To-Exit sensor.
    Rte,
    /// Request-Exit sensor (electrically distinct, behaviorally identical).
    Rex,
    /// Door Position Sensor.
    Dps,
    /// Door bond sensor.
    Bond,
}

impl AuxType {
    /// Returns `true` for inputs that trigger the RTE priority override.
    #[inline]
    #[must_use]
    pub fn is_exit_request(self) -> bool {
        matches!(self, AuxType::Rte | AuxType::Rex)
    }

    /// Returns `true` for inputs that report door position in status records.
    #[inline]
    #[must_use]
    pub fn reports_door_state(self) -> bool {
        matches!(self, AuxType::Dps | AuxType::Bond)
    }
}

impl fmt::Display for AuxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuxType::Rte => "RTE",
            AuxType::Rex => "REX",
            AuxType::Dps => "DPS",
            AuxType::Bond => "BOND",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AuxType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RTE" => Ok(AuxType::Rte),
            "REX" => Ok(AuxType::Rex),
            "DPS" => Ok(AuxType::Dps),
            "BOND" => Ok(AuxType::Bond),
            other => Err(Error::Config(format!("Unknown aux input type: {other}"))),
        }
    }
}

/// Operating configuration of the emulated relay controller.
///
/// Live-editable: the operator may change any field between commands, so
/// the controller evaluates every command against the config snapshot at
/// the time of evaluation, never a snapshot captured at construction.
///
/// # Examples
///
/// ```
/// use latchkey_core::{AuxType, BillingPartner, Config};
///
/// let config = Config::default();
/// assert_eq!(config.billing_partner, BillingPartner::Dfacs);
/// assert_eq!(config.aux_type, AuxType::Rte);
/// assert!(config.rte_count_enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Command dialect spoken by the host panel.
    pub billing_partner: BillingPartner,

    /// Auxiliary input wired to the controller.
    pub aux_type: AuxType,

    /// Whether the auxiliary contact is normally open.
    pub aux_normally_open: bool,

    /// Whether successful RTE override activations increment the counter.
    pub rte_count_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            billing_partner: BillingPartner::Dfacs,
            aux_type: AuxType::Rte,
            aux_normally_open: true,
            rte_count_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LockState::Locked, 0)]
    #[case(LockState::TempUnlocked, 1)]
    #[case(LockState::PermanentUnlocked, 2)]
    fn lock_state_wire_mapping(#[case] state: LockState, #[case] expected: u8) {
        assert_eq!(state.as_u8(), expected);
    }

    #[test]
    fn lock_state_display() {
        assert_eq!(LockState::Locked.to_string(), "LOCKED");
        assert_eq!(LockState::TempUnlocked.to_string(), "TEMP_UNLOCKED");
        assert_eq!(LockState::PermanentUnlocked.to_string(), "PERMANENT_UNLOCKED");
    }

    #[test]
    fn door_state_toggles_both_ways() {
        assert_eq!(DoorState::Closed.toggled(), DoorState::Open);
        assert_eq!(DoorState::Open.toggled(), DoorState::Closed);
    }

    #[rstest]
    #[case("abc", BillingPartner::Abc)]
    #[case("PEAK", BillingPartner::Peak)]
    #[case(" dfacs ", BillingPartner::Dfacs)]
    fn billing_partner_from_str(#[case] input: &str, #[case] expected: BillingPartner) {
        let partner: BillingPartner = input.parse().unwrap();
        assert_eq!(partner, expected);
    }

    #[test]
    fn billing_partner_from_str_rejects_unknown() {
        let result: Result<BillingPartner> = "ACME".parse();
        assert!(result.is_err());
    }

    #[test]
    fn only_dfacs_reports() {
        assert!(BillingPartner::Dfacs.reports_enabled());
        assert!(!BillingPartner::Abc.reports_enabled());
        assert!(!BillingPartner::Peak.reports_enabled());
    }

    #[rstest]
    #[case(AuxType::Rte, true, false)]
    #[case(AuxType::Rex, true, false)]
    #[case(AuxType::Dps, false, true)]
    #[case(AuxType::Bond, false, true)]
    fn aux_type_roles(#[case] aux: AuxType, #[case] exit: bool, #[case] door: bool) {
        assert_eq!(aux.is_exit_request(), exit);
        assert_eq!(aux.reports_door_state(), door);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Config {
            billing_partner: BillingPartner::Peak,
            aux_type: AuxType::Bond,
            aux_normally_open: false,
            rte_count_enabled: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn config_json_uses_uppercase_variants() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("\"DFACS\""));
        assert!(json.contains("\"RTE\""));
    }
}
