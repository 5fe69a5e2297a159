//! Remote collection error types.

use thiserror::Error;

/// A failed call to the recipe hub.
///
/// On a listing call this ends pagination; on a detail call it aborts the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// Could not reach the server or the transfer broke off
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Server answered with a non-success status
    #[error("Server returned status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Response body was not the expected JSON
    #[error("Invalid response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The async runtime backing the client could not start
    #[error("Failed to start HTTP runtime: {0}")]
    Runtime(String),
}
