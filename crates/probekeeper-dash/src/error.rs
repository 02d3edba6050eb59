//! Error types for probekeeper-dash

use thiserror::Error;

/// Errors from dashboard extraction and registration
#[derive(Error, Debug, Clone)]
pub enum DashError {
    /// I/O error copying or reading dashboard files
    #[error("I/O error: {0}")]
    IoError(String),

    /// Supplied resource is not a readable zip archive
    #[error("bad archive: {0}")]
    BadArchive(String),

    /// Archive entry would escape the dashboard directory
    #[error("unsafe archive entry: {0}")]
    UnsafeEntry(String),

    /// Dashboard file is not valid JSON
    #[error("invalid dashboard {name}: {message}")]
    InvalidDashboard {
        /// Dashboard name (file stem)
        name: String,
        /// Parse error detail
        message: String,
    },

    /// HTTP transport error talking to the registry
    #[error("registry request failed: {0}")]
    HttpError(String),

    /// Registry rejected the dashboard
    #[error("registry error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
}
