//! Error types for the Gardenia plugin.
//!
//! This module defines the centralized error type [`GardeniaError`] and a type
//! alias [`Result`] used throughout the plugin. All errors are implemented with
//! the `thiserror` crate.
//!
//! Conditions that are expected during normal use, such as unregistering a
//! layer twice or querying a layer that already closed, are not errors and
//! never surface here.

use thiserror::Error;

/// The main error type for Gardenia operations.
///
/// # Examples
///
/// ```
/// use gardenia::GardeniaError;
///
/// fn parse_depth(raw: &str) -> Result<u32, GardeniaError> {
///     raw.parse()
///         .map_err(|_| GardeniaError::Config(format!("invalid base_z_index: {raw}")))
/// }
///
/// assert!(parse_depth("x").is_err());
/// ```
#[derive(Debug, Error)]
pub enum GardeniaError {
    /// A layer scope was used after its provider unmounted, or was never
    /// attached to one.
    ///
    /// This is a programming error in the caller: bindings and injected
    /// layers only make sense below a mounted provider.
    #[error("Layer provider unavailable: scope used outside a mounted provider")]
    ProviderUnavailable,

    /// The REST API answered with a failure status or an unusable body.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code, `0` when the request never reached the server.
        status: u16,
        /// Server or transport message.
        message: String,
    },

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for Gardenia operations.
pub type Result<T> = std::result::Result<T, GardeniaError>;
