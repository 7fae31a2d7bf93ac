//! Byte-stream transports for the Latchkey emulator.
//!
//! The emulator core talks to the access-control panel through the
//! [`Transport`] trait: non-blocking line reads, blocking-ish line writes,
//! lifecycle owned by whoever constructed the transport. Three
//! implementations are provided:
//!
//! - [`ChannelTransport`] — an in-memory pair backed by tokio channels,
//!   used by tests and as the emulator-facing end of the TCP bridge.
//! - [`SerialTransport`] — a real serial port (the relay hardware's native
//!   link), polled the same way the firmware polls its UART.
//! - [`tcp`] — a bridge task that frames a TCP socket into lines and feeds
//!   a [`ChannelTransport`], for running the emulator without hardware.

pub mod memory;
pub mod serial;
pub mod tcp;

pub use memory::{ChannelTransport, PanelHandle, channel_pair};
pub use serial::{SerialTransport, available_ports};
pub use tcp::accept_panel;

use latchkey_core::Result;

/// A newline-delimited byte-stream link to the access-control panel.
///
/// Reads must never block: the emulator's cooperative tick loop calls
/// [`try_read_line`](Transport::try_read_line) every tick and moves on
/// when no full line is buffered.
pub trait Transport: Send {
    /// Return the next complete inbound line, if one is available.
    ///
    /// Line terminators are stripped. Returns `Ok(None)` when no full
    /// line is buffered *or* when the peer has gone away — a disconnect
    /// halts command intake but is not an error for the core.
    ///
    /// # Errors
    ///
    /// Returns an error for I/O failures on the underlying link.
    fn try_read_line(&mut self) -> Result<Option<String>>;

    /// Write one outbound line, appending the newline terminator.
    ///
    /// # Errors
    ///
    /// Returns an error if the link is closed or the write fails. The
    /// caller logs and carries on; a failed status send never rolls back
    /// the state transition that produced it.
    fn write_line(&mut self, line: &str) -> Result<()>;
}
