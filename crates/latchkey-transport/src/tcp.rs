//! TCP line bridge.
//!
//! Lets a panel (or a test harness, or plain `netcat`) talk to the
//! emulator over TCP instead of a serial port. A spawned task owns the
//! socket, framed into lines by [`LinesCodec`], and shuttles lines to and
//! from a [`ChannelTransport`] that the emulator polls like any other
//! transport.

use crate::memory::ChannelTransport;
use futures::{SinkExt, StreamExt};
use latchkey_core::Result;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::unbounded_channel;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, info, warn};

/// Wait for one panel connection and bridge it into a transport.
///
/// The emulated relay is a device with a single panel link, so one
/// connection at a time is the model; reconnect by calling this again
/// after the previous transport goes quiet.
///
/// # Errors
///
/// Returns an error if accepting on the listener fails.
pub async fn accept_panel(listener: &TcpListener) -> Result<ChannelTransport> {
    let (stream, addr) = listener.accept().await?;
    info!(%addr, "panel connected");
    Ok(bridge_stream(stream))
}

/// Spawn the socket task and return the emulator-facing transport end.
pub fn bridge_stream(stream: TcpStream) -> ChannelTransport {
    if let Err(e) = stream.set_nodelay(true) {
        warn!(error = %e, "failed to set TCP_NODELAY");
    }

    let (inbound_tx, inbound_rx) = unbounded_channel::<String>();
    let (outbound_tx, mut outbound_rx) = unbounded_channel::<String>();

    tokio::spawn(async move {
        let mut framed = Framed::new(stream, LinesCodec::new());
        loop {
            tokio::select! {
                read = framed.next() => match read {
                    Some(Ok(line)) => {
                        if inbound_tx.send(line).is_err() {
                            // Emulator end dropped; nothing left to feed.
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "line decode failed");
                    }
                    None => {
                        info!("panel disconnected");
                        break;
                    }
                },
                write = outbound_rx.recv() => match write {
                    Some(line) => {
                        if let Err(e) = framed.send(line).await {
                            warn!(error = %e, "tcp write failed");
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
        debug!("tcp bridge task finished");
    });

    ChannelTransport::from_parts(inbound_rx, outbound_tx)
}
