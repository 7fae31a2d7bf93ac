//! Shared types for the Latchkey relay controller emulator.
//!
//! This crate holds the data model every other Latchkey crate agrees on:
//! the lock and door state enums, the billing-partner and auxiliary-input
//! configuration, protocol timing constants, and the common error type.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{AuxType, BillingPartner, Config, DoorState, LockState};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
