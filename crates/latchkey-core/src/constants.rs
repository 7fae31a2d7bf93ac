//! Protocol and timing constants for the relay controller emulator.
//!
//! These values define the behavioral contract of the emulated firmware:
//! how long a timed unlock lasts by default, how wide the duration clamp
//! is, how long an RTE override holds the door, and how the cooperative
//! tick loop paces itself. Changing them changes the emulated device's
//! observable behavior on the wire.

// ============================================================================
// Unlock Timing
// ============================================================================

/// Default timed-unlock duration in seconds.
///
/// Applied when a timed-unlock command carries no duration token, or when
/// the token is not a valid integer.
///
/// # Value: 5 seconds
pub const DEFAULT_UNLOCK_SECONDS: u64 = 5;

/// Default timed-unlock duration in milliseconds.
///
/// Millisecond form of [`DEFAULT_UNLOCK_SECONDS`], used by the unlock
/// timer itself.
pub const DEFAULT_UNLOCK_MS: u64 = DEFAULT_UNLOCK_SECONDS * 1000;

/// Minimum accepted unlock duration in seconds.
///
/// Parsed durations below this are clamped up.
///
/// # Value: 1 second
pub const MIN_UNLOCK_SECONDS: u64 = 1;

/// Maximum accepted unlock duration in seconds.
///
/// Parsed durations above this are clamped down. One hour matches the
/// relay hardware being emulated.
///
/// # Value: 3600 seconds
pub const MAX_UNLOCK_SECONDS: u64 = 3600;

// ============================================================================
// RTE Override
// ============================================================================

/// Fixed RTE priority-override window in milliseconds.
///
/// An activated override holds the door temporarily unlocked for exactly
/// this long and blocks every command except a status query. The window
/// is not configurable on the real hardware.
///
/// # Value: 5000ms (5 seconds)
pub const RTE_OVERRIDE_MS: u64 = 5000;

// ============================================================================
// Loop Pacing
// ============================================================================

/// Cooperative tick period for the emulator loop in milliseconds.
///
/// Each tick drains pending command lines, then checks override expiry,
/// then unlock-timer expiry, then the status heartbeat, in that order.
///
/// # Value: 10ms
pub const TICK_INTERVAL_MS: u64 = 10;

/// Periodic status heartbeat interval in milliseconds.
///
/// In DFACS mode a status record is emitted at this cadence regardless of
/// state transitions.
///
/// # Value: 1000ms (1Hz)
pub const STATUS_INTERVAL_MS: u64 = 1000;

// ============================================================================
// Transport Defaults
// ============================================================================

/// Default serial baud rate used by the access-control panels.
///
/// # Value: 9600
pub const DEFAULT_BAUD_RATE: u32 = 9600;
