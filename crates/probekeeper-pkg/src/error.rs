//! Error types for probekeeper-pkg

use thiserror::Error;

/// Errors that can occur during snap operations
#[derive(Error, Debug, Clone)]
pub enum SnapError {
    /// Snap not found in the store
    #[error("snap not found: {0}")]
    SnapNotFound(String),

    /// Snap store is unreachable
    #[error("snap store unavailable: {0}")]
    StoreUnavailable(String),

    /// Requested channel does not exist for the snap
    #[error("invalid channel {channel} for snap {snap}")]
    InvalidChannel {
        /// Snap name
        snap: String,
        /// Requested channel
        channel: String,
    },

    /// snapd refused the operation (another change in flight)
    #[error("snapd busy: {0}")]
    SnapdBusy(String),

    /// Insufficient permissions (need root)
    #[error("insufficient permissions: {0}")]
    PermissionDenied(String),

    /// Command execution failed
    #[error("command failed: {status} - {message}")]
    CommandFailed {
        /// Exit status
        status: i32,
        /// Error message
        message: String,
    },

    /// Failed to parse snap CLI output
    #[error("parse error: {0}")]
    ParseError(String),

    /// Execution error from the command runner
    #[error("execution error: {0}")]
    ExecutionError(String),
}

impl SnapError {
    /// Check if error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SnapError::StoreUnavailable(_) | SnapError::SnapdBusy(_)
        )
    }

    /// Check if error indicates need for root
    #[must_use]
    pub fn needs_root(&self) -> bool {
        matches!(self, SnapError::PermissionDenied(_))
    }
}
