//! Message types for the agent actor
//!
//! Message handlers are implemented in `actor::agent`.

use chrono::{DateTime, Utc};
use kameo_macros::Reply;

use probekeeper_api::status::WorkloadStatus;

use crate::config::ConfigSnapshot;
use crate::plan::Action;
use crate::state::{Flags, Relation, Relations};

/// Hook events delivered by the external trigger mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    /// First run, installation requested
    Install,
    /// Configuration snapshot may have changed
    ConfigChanged,
    /// Agent code or bundled resources were upgraded
    Upgrade,
    /// Periodic status tick
    UpdateStatus,
    /// A relation to another system was established
    RelationJoined(Relation),
    /// Relation data changed
    RelationChanged(Relation),
    /// A relation went away
    RelationDeparted(Relation),
}

impl std::fmt::Display for HookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookEvent::Install => write!(f, "install"),
            HookEvent::ConfigChanged => write!(f, "config-changed"),
            HookEvent::Upgrade => write!(f, "upgrade"),
            HookEvent::UpdateStatus => write!(f, "update-status"),
            HookEvent::RelationJoined(rel) => write!(f, "{rel}-relation-joined"),
            HookEvent::RelationChanged(rel) => write!(f, "{rel}-relation-changed"),
            HookEvent::RelationDeparted(rel) => write!(f, "{rel}-relation-departed"),
        }
    }
}

impl std::str::FromStr for HookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "install" => return Ok(HookEvent::Install),
            "config-changed" => return Ok(HookEvent::ConfigChanged),
            "upgrade" => return Ok(HookEvent::Upgrade),
            "update-status" => return Ok(HookEvent::UpdateStatus),
            _ => {}
        }

        for (suffix, build) in [
            (
                "-relation-joined",
                HookEvent::RelationJoined as fn(Relation) -> HookEvent,
            ),
            ("-relation-changed", HookEvent::RelationChanged),
            ("-relation-departed", HookEvent::RelationDeparted),
        ] {
            if let Some(name) = s.strip_suffix(suffix) {
                let relation = match name {
                    "nrpe" => Relation::Nrpe,
                    "prometheus" => Relation::Prometheus,
                    "dashboards" => Relation::Dashboards,
                    other => return Err(format!("unknown relation: {other}")),
                };
                return Ok(build(relation));
            }
        }

        Err(format!("unknown hook event: {s}"))
    }
}

// ============================================================================
// AgentActor Messages
// ============================================================================

/// Deliver one hook event together with the current configuration snapshot
#[derive(Debug)]
pub struct Dispatch {
    /// The hook event
    pub event: HookEvent,
    /// Configuration read for this invocation
    pub snapshot: ConfigSnapshot,
}

/// Result of a completed dispatch
#[derive(Debug, Clone, Reply)]
pub struct DispatchOutcome {
    /// Actions executed, in order
    pub actions: Vec<Action>,
    /// Workload status after the dispatch
    pub status: Option<WorkloadStatus>,
}

/// Get the agent's current state summary
#[derive(Debug)]
pub struct GetAgentStatus;

/// Agent state summary
#[derive(Debug, Clone, Reply)]
pub struct AgentStatusReport {
    /// Current flags
    pub flags: Flags,
    /// Established relations
    pub relations: Relations,
    /// Last reported workload status
    pub status: Option<WorkloadStatus>,
    /// When the last dispatch completed
    pub last_dispatch: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_event_roundtrips_through_display() {
        let events = [
            HookEvent::Install,
            HookEvent::ConfigChanged,
            HookEvent::Upgrade,
            HookEvent::UpdateStatus,
            HookEvent::RelationJoined(Relation::Nrpe),
            HookEvent::RelationChanged(Relation::Prometheus),
            HookEvent::RelationDeparted(Relation::Dashboards),
        ];

        for event in events {
            let parsed: HookEvent = event.to_string().parse().unwrap();
            assert_eq!(parsed, event);
        }
    }

    #[test]
    fn test_unknown_hook_event_is_rejected() {
        assert!("reboot".parse::<HookEvent>().is_err());
        assert!("mysql-relation-joined".parse::<HookEvent>().is_err());
    }
}
