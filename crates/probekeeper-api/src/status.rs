//! Workload status reporting
//!
//! The agent summarizes what it is doing (or why it cannot proceed) as a
//! level plus a short operator-facing message.

use serde::{Deserialize, Serialize};

/// Severity/phase of the reported workload status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    /// Agent is performing setup work (install, reconfigure)
    Maintenance,
    /// Agent is waiting on an external precondition
    Blocked,
    /// Workload is running and configured
    Active,
    /// An action failed and needs operator attention
    Error,
}

impl std::fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusLevel::Maintenance => write!(f, "maintenance"),
            StatusLevel::Blocked => write!(f, "blocked"),
            StatusLevel::Active => write!(f, "active"),
            StatusLevel::Error => write!(f, "error"),
        }
    }
}

/// A workload status with its message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadStatus {
    /// Status level
    pub level: StatusLevel,
    /// Operator-facing message
    pub message: String,
}

impl WorkloadStatus {
    /// Maintenance status
    pub fn maintenance(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Maintenance,
            message: message.into(),
        }
    }

    /// Blocked status
    pub fn blocked(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Blocked,
            message: message.into(),
        }
    }

    /// Active status
    pub fn active(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Active,
            message: message.into(),
        }
    }

    /// Error status
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for WorkloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}
