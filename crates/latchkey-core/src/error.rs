use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Transport errors
    #[error("Serial port error: {0}")]
    Serial(String),

    #[error("Transport closed")]
    TransportClosed,

    // Runtime errors
    #[error("Emulator is not running")]
    NotRunning,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
