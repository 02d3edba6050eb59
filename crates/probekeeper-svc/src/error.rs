//! Error types for probekeeper-svc

use thiserror::Error;

/// Errors from service, firewall and scrape-target operations
#[derive(Error, Debug, Clone)]
pub enum SvcError {
    /// systemd does not know the unit
    #[error("unit not found: {0}")]
    UnitNotFound(String),

    /// Command execution failed
    #[error("command failed: {status} - {message}")]
    CommandFailed {
        /// Exit status
        status: i32,
        /// Error message
        message: String,
    },

    /// Execution error from the command runner
    #[error("execution error: {0}")]
    ExecutionError(String),

    /// I/O error writing host files
    #[error("I/O error: {0}")]
    IoError(String),

    /// Failed to serialize a target document
    #[error("serialization error: {0}")]
    SerializeError(String),
}
