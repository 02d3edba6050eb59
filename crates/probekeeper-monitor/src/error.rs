//! Error types for probekeeper-monitor

use thiserror::Error;

/// Errors from health check management
#[derive(Error, Debug, Clone)]
pub enum MonitorError {
    /// I/O error writing check definitions
    #[error("I/O error: {0}")]
    IoError(String),

    /// Reloading the NRPE daemon failed
    #[error("failed to reload NRPE daemon: {0}")]
    ReloadFailed(String),

    /// Check shortname contains characters NRPE cannot accept
    #[error("invalid check shortname: {0}")]
    InvalidShortname(String),
}
