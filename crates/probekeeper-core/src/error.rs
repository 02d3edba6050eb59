//! Core error types for probekeeper-core

use thiserror::Error;

/// Errors that can occur while reconciling the exporter deployment
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// Snap installation failed
    #[error("snap installation failed: {0}")]
    Install(String),

    /// Service manager operation failed
    #[error("service operation failed: {0}")]
    Service(String),

    /// Firewall operation failed
    #[error("firewall operation failed: {0}")]
    Firewall(String),

    /// Health check operation failed
    #[error("health check operation failed: {0}")]
    HealthCheck(String),

    /// Scrape target advertisement failed
    #[error("scrape target operation failed: {0}")]
    ScrapeTarget(String),

    /// Dashboard enumeration or registration failed
    #[error("dashboard operation failed: {0}")]
    Dashboard(String),

    /// Writing the exporter configuration failed
    #[error("failed to write exporter configuration: {0}")]
    ConfigWrite(String),

    /// Persisting agent state failed
    #[error("state persistence failed: {0}")]
    StatePersist(String),

    /// Serialization failed
    #[error("serialization error: {0}")]
    Serialize(String),
}
