//! Error types shared across the paydrip crates.

use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, PaydripError>;

/// Errors surfaced by the dispatcher and its collaborators.
#[derive(Debug, Error)]
pub enum PaydripError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("config error: {0}")]
    Config(String),

    /// The record store rejected or failed a request (auth or list query).
    #[error("store error: {0}")]
    Store(String),

    /// A submit attempt failed. `body` carries the endpoint's response
    /// body when one was received, for diagnostics only.
    #[error("dispatch failed: {reason}")]
    Dispatch {
        reason: String,
        body: Option<String>,
    },
}
