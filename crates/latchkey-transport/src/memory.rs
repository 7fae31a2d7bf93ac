//! In-memory channel-backed transport.
//!
//! [`channel_pair`] returns the two ends of a simulated link: a
//! [`ChannelTransport`] for the emulator and a [`PanelHandle`] standing in
//! for the access-control panel. The same [`ChannelTransport`] is reused
//! by the TCP bridge, which replaces the panel end with a socket task.

use crate::Transport;
use latchkey_core::{Error, Result};
use tokio::sync::mpsc::{
    UnboundedReceiver, UnboundedSender, error::TryRecvError, unbounded_channel,
};

/// Emulator-facing end of an in-memory link.
pub struct ChannelTransport {
    inbound: UnboundedReceiver<String>,
    outbound: UnboundedSender<String>,
}

impl ChannelTransport {
    pub(crate) fn from_parts(
        inbound: UnboundedReceiver<String>,
        outbound: UnboundedSender<String>,
    ) -> Self {
        Self { inbound, outbound }
    }
}

impl Transport for ChannelTransport {
    fn try_read_line(&mut self) -> Result<Option<String>> {
        match self.inbound.try_recv() {
            Ok(line) => Ok(Some(line)),
            Err(TryRecvError::Empty) => Ok(None),
            // Peer gone: intake simply stops, timers keep running.
            Err(TryRecvError::Disconnected) => Ok(None),
        }
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.outbound
            .send(line.to_string())
            .map_err(|_| Error::TransportClosed)
    }
}

/// Panel end of an in-memory link, used by tests to drive the emulator.
pub struct PanelHandle {
    to_emulator: UnboundedSender<String>,
    from_emulator: UnboundedReceiver<String>,
}

impl PanelHandle {
    /// Queue one command line for the emulator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransportClosed`] if the emulator end was dropped.
    pub fn send_line(&self, line: &str) -> Result<()> {
        self.to_emulator
            .send(line.to_string())
            .map_err(|_| Error::TransportClosed)
    }

    /// Take the next emulator output line without waiting.
    pub fn try_take_line(&mut self) -> Option<String> {
        self.from_emulator.try_recv().ok()
    }

    /// Wait for the next emulator output line.
    ///
    /// Returns `None` once the emulator end is dropped and drained.
    pub async fn next_line(&mut self) -> Option<String> {
        self.from_emulator.recv().await
    }
}

/// Create a connected in-memory transport pair.
#[must_use]
pub fn channel_pair() -> (ChannelTransport, PanelHandle) {
    let (to_emulator, inbound) = unbounded_channel();
    let (outbound, from_emulator) = unbounded_channel();
    (
        ChannelTransport::from_parts(inbound, outbound),
        PanelHandle {
            to_emulator,
            from_emulator,
        },
    )
}
