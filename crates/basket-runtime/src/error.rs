//! # Runtime Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Runtime Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────────────┐        ┌─────────────────────────────┐    │
//! │  │   PersistenceError      │        │      RuntimeError           │    │
//! │  │                         │        │                             │    │
//! │  │  Encode / Decode        │        │  InvalidConfig              │    │
//! │  │  Store                  │        │  ConfigLoadFailed / Save    │    │
//! │  │                         │        │  Store (opening backend)    │    │
//! │  │                         │        │  InvalidCommand / Cart      │    │
//! │  │  recovered locally,     │        │                             │    │
//! │  │  logged via tracing     │        │  fatal to host startup      │    │
//! │  └─────────────────────────┘        └─────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use basket_core::{CartError, CodecError};
use basket_store::StoreError;
use thiserror::Error;

/// Result type alias for host startup operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// A failed save or restore of the cart snapshot.
///
/// Never escapes [`PersistentCart::persist`](crate::PersistentCart::persist)
/// or [`PersistentCart::open`](crate::PersistentCart::open); both log it
/// and carry on.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The snapshot could not be encoded.
    #[error("Failed to encode cart snapshot: {0}")]
    Encode(#[source] CodecError),

    /// The stored bytes could not be decoded into a valid cart.
    #[error("Failed to decode cart snapshot: {0}")]
    Decode(#[source] CodecError),

    /// The store rejected the operation.
    #[error("Snapshot store error: {0}")]
    Store(#[from] StoreError),
}

/// Host configuration and startup errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration values are invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Snapshot store could not be opened.
    #[error("Snapshot store error: {0}")]
    Store(#[from] StoreError),

    /// A host command line could not be parsed.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// A host command was rejected by the cart.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for RuntimeError {
    fn from(err: toml::de::Error) -> Self {
        RuntimeError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for RuntimeError {
    fn from(err: toml::ser::Error) -> Self {
        RuntimeError::ConfigSaveFailed(err.to_string())
    }
}
