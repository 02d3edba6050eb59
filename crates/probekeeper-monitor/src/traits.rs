//! Health check agent trait

use async_trait::async_trait;

use crate::error::MonitorError;

/// A health check definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckDef {
    /// Short identifier, used in file and command names
    pub shortname: String,
    /// Plugin command line to execute
    pub command: String,
    /// Human-readable description
    pub description: String,
}

impl CheckDef {
    /// Create a new check definition
    pub fn new(
        shortname: impl Into<String>,
        command: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            shortname: shortname.into(),
            command: command.into(),
            description: description.into(),
        }
    }
}

#[async_trait]
pub trait HealthCheckAgent: Send + Sync {
    /// Whether the health-check subsystem is installed on this host
    async fn available(&self) -> bool;

    /// Stage a check definition
    async fn add_check(&self, check: &CheckDef) -> Result<(), MonitorError>;

    /// Remove a staged check definition
    async fn remove_check(&self, shortname: &str) -> Result<(), MonitorError>;

    /// Apply staged definitions by reloading the agent daemon
    async fn write(&self) -> Result<(), MonitorError>;
}
