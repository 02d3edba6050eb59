//! Agent flag state
//!
//! The flags are the only memory the reconciler has across invocations.
//! Pending-work markers (`do_*`) are consumed by exactly one handler each;
//! a handler clears every marker it consumes before returning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use probekeeper_api::status::WorkloadStatus;

use crate::fingerprint::Fingerprints;

/// Named boolean markers driving reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    /// Exporter snap is installed
    #[serde(default)]
    pub installed: bool,
    /// Exporter service has been started at least once
    #[serde(default)]
    pub started: bool,
    /// NRPE check is registered
    #[serde(default)]
    pub nrpe_configured: bool,
    /// Scrape target has been advertised
    #[serde(default)]
    pub scrape_configured: bool,
    /// Pending: compare fingerprints and decide whether to re-render
    #[serde(default)]
    pub do_check_reconfig: bool,
    /// Pending: re-render the exporter configuration
    #[serde(default)]
    pub do_reconfig_yaml: bool,
    /// Pending: (re)start the exporter service
    #[serde(default)]
    pub do_restart: bool,
    /// Pending: push dashboards to the registry
    #[serde(default)]
    pub publish_dashboards: bool,
}

impl Flags {
    /// Fields that differ between `self` and `newer`, with the new value
    pub fn diff(&self, newer: &Flags) -> Vec<(&'static str, bool)> {
        let mut changed = Vec::new();
        let pairs = [
            ("installed", self.installed, newer.installed),
            ("started", self.started, newer.started),
            ("nrpe_configured", self.nrpe_configured, newer.nrpe_configured),
            (
                "scrape_configured",
                self.scrape_configured,
                newer.scrape_configured,
            ),
            (
                "do_check_reconfig",
                self.do_check_reconfig,
                newer.do_check_reconfig,
            ),
            (
                "do_reconfig_yaml",
                self.do_reconfig_yaml,
                newer.do_reconfig_yaml,
            ),
            ("do_restart", self.do_restart, newer.do_restart),
            (
                "publish_dashboards",
                self.publish_dashboards,
                newer.publish_dashboards,
            ),
        ];
        for (name, old, new) in pairs {
            if old != new {
                changed.push((name, new));
            }
        }
        changed
    }
}

/// Relations this agent can be wired into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// NRPE health check master
    Nrpe,
    /// Prometheus scrape consumer
    Prometheus,
    /// Grafana dashboard registry
    Dashboards,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Nrpe => write!(f, "nrpe"),
            Relation::Prometheus => write!(f, "prometheus"),
            Relation::Dashboards => write!(f, "dashboards"),
        }
    }
}

/// Which relations are currently established
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relations {
    #[serde(default)]
    pub nrpe: bool,
    #[serde(default)]
    pub prometheus: bool,
    #[serde(default)]
    pub dashboards: bool,
}

impl Relations {
    /// Record a relation as established or departed
    pub fn set(&mut self, relation: Relation, present: bool) {
        match relation {
            Relation::Nrpe => self.nrpe = present,
            Relation::Prometheus => self.prometheus = present,
            Relation::Dashboards => self.dashboards = present,
        }
    }

    /// Whether a relation is established
    #[must_use]
    pub fn get(&self, relation: Relation) -> bool {
        match relation {
            Relation::Nrpe => self.nrpe,
            Relation::Prometheus => self.prometheus,
            Relation::Dashboards => self.dashboards,
        }
    }
}

/// Everything the agent persists between invocations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState {
    /// Reconciliation flags
    #[serde(default)]
    pub flags: Flags,
    /// Established relations
    #[serde(default)]
    pub relations: Relations,
    /// Change-detection digests
    #[serde(default)]
    pub fingerprints: Fingerprints,
    /// Last reported workload status
    #[serde(default)]
    pub status: Option<WorkloadStatus>,
    /// When the last dispatch completed
    #[serde(default)]
    pub last_dispatch: Option<DateTime<Utc>>,
}
