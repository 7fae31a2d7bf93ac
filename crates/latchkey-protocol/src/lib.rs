//! Wire dialect for the Latchkey relay controller.
//!
//! Inbound: newline-terminated ASCII command lines, recognized against a
//! declarative per-billing-partner command table ([`parse_line`]). Parsing
//! never fails; unrecognized text degrades to "ignore" and malformed
//! duration tokens degrade to the default duration.
//!
//! Outbound: single-line comma-separated records ([`Report`]) — status
//! heartbeats, command rejections during an RTE override, and override
//! activation/deactivation notifications. [`StatusReporter`] paces the 1Hz
//! status heartbeat.

pub mod command;
pub mod report;

pub use command::{Command, parse_line};
pub use report::{Report, StatusRecord, StatusReporter};
