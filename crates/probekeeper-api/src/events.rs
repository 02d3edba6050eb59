//! Agent event types
//!
//! Broadcast by the reconciler actor as side effects are applied. The daemon
//! subscribes to log them; no subscribers is fine.

use serde::{Deserialize, Serialize};

use crate::status::WorkloadStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentEvent {
    StatusChanged {
        status: WorkloadStatus,
    },
    FlagChanged {
        flag: String,
        set: bool,
    },
    ExporterInstalled {
        snap: String,
        channel: String,
    },
    ConfigRendered {
        path: String,
    },
    ServiceStarted {
        unit: String,
    },
    ServiceRestarted {
        unit: String,
    },
    CheckRegistered {
        shortname: String,
    },
    CheckRemoved {
        shortname: String,
    },
    ScrapeTargetPublished {
        target: String,
    },
    DashboardPublished {
        name: String,
    },
}
