//! Persisted operator settings.
//!
//! A small JSON file remembers the serial port and relay configuration
//! between runs. A missing file is not an error; defaults apply until the
//! first save.

use latchkey_core::{Config, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Serial port used on the last run, if any.
    pub port: Option<String>,

    /// Relay controller configuration.
    #[serde(default)]
    pub config: Config,
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] when the file exists but cannot be
    /// read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Settings(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Settings(format!("{}: {e}", path.display())))
    }

    /// Write settings to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Settings`] on serialization or write failure.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Settings(e.to_string()))?;
        std::fs::write(path, raw)
            .map_err(|e| Error::Settings(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}
