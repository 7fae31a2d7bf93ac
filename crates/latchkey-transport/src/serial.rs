//! Serial port transport.
//!
//! The relay hardware's native link is a 9600-baud serial line. This
//! adapter polls the port the way the firmware polls its UART: check how
//! many bytes are waiting, pull them into a line buffer, and surface
//! complete lines one at a time. Nothing here blocks the tick loop.

use crate::Transport;
use latchkey_core::{Error, Result};
use serialport::SerialPort;
use std::io::{Read, Write};
use std::time::Duration;

// Read timeout only applies when we ask for more bytes than are waiting,
// which try_read_line never does; kept short as a safety net.
const READ_TIMEOUT: Duration = Duration::from_millis(10);

/// A serial port carrying newline-terminated command traffic.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    buf: Vec<u8>,
}

impl SerialTransport {
    /// Open a serial port at the given baud rate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serial`] if the port cannot be opened (missing
    /// device, permissions, already in use).
    pub fn open(path: &str, baud: u32) -> Result<Self> {
        let port = serialport::new(path, baud)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| Error::Serial(format!("{path}: {e}")))?;
        tracing::info!(path, baud, "serial port opened");
        Ok(Self {
            port,
            buf: Vec::new(),
        })
    }
}

impl Transport for SerialTransport {
    fn try_read_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
                let raw: Vec<u8> = self.buf.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&raw).trim().to_string();
                return Ok(Some(line));
            }

            let waiting = self
                .port
                .bytes_to_read()
                .map_err(|e| Error::Serial(e.to_string()))? as usize;
            if waiting == 0 {
                return Ok(None);
            }

            let mut chunk = vec![0u8; waiting.min(512)];
            let n = self.port.read(&mut chunk)?;
            if n == 0 {
                return Ok(None);
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\n")?;
        self.port.flush()?;
        Ok(())
    }
}

/// Enumerate serial ports present on the system.
///
/// # Errors
///
/// Returns [`Error::Serial`] if the platform enumeration fails.
pub fn available_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().map_err(|e| Error::Serial(e.to_string()))?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
