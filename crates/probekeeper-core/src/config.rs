//! Configuration types for the exporter deployment

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Operator-tunable configuration, re-read on every dispatch
///
/// Handlers receive the snapshot explicitly; there is no process-global
/// configuration access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// Snap store channel for the exporter
    #[serde(default = "default_channel")]
    pub snap_channel: String,
    /// Probe module list as a YAML blob
    #[serde(default)]
    pub modules: String,
    /// Hostname advertised to monitoring systems
    #[serde(default = "default_hostname")]
    pub hostname: String,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            snap_channel: default_channel(),
            modules: String::new(),
            hostname: default_hostname(),
        }
    }
}

impl ConfigSnapshot {
    /// Canonical bytes used for change detection
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        // Struct field order is stable, so the JSON form is too
        serde_json::to_vec(self).unwrap_or_default()
    }
}

fn default_channel() -> String {
    "stable".to_string()
}

fn default_hostname() -> String {
    "localhost".to_string()
}

/// Fixed identity of the managed exporter on this host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterSettings {
    /// Snap package name
    #[serde(default = "default_snap_name")]
    pub snap_name: String,
    /// systemd unit of the snap's daemon
    #[serde(default = "default_service_unit")]
    pub service_unit: String,
    /// Listening port of the exporter
    #[serde(default = "default_port")]
    pub port: u16,
    /// Rendered configuration file path
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,
    /// Directory holding dashboard JSON documents
    #[serde(default = "default_dashboard_dir")]
    pub dashboard_dir: PathBuf,
    /// Optional operator-supplied dashboard archive
    #[serde(default)]
    pub dashboard_resource: Option<PathBuf>,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            snap_name: default_snap_name(),
            service_unit: default_service_unit(),
            port: default_port(),
            config_path: default_config_path(),
            dashboard_dir: default_dashboard_dir(),
            dashboard_resource: None,
        }
    }
}

fn default_snap_name() -> String {
    "prometheus-blackbox-exporter".to_string()
}

fn default_service_unit() -> String {
    "snap.prometheus-blackbox-exporter.daemon".to_string()
}

fn default_port() -> u16 {
    9115
}

fn default_config_path() -> PathBuf {
    PathBuf::from("/var/snap/prometheus-blackbox-exporter/current/blackbox.yml")
}

fn default_dashboard_dir() -> PathBuf {
    PathBuf::from("/var/lib/probekeeper/dashboards")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bytes_differ_on_module_change() {
        let a = ConfigSnapshot::default();
        let b = ConfigSnapshot {
            modules: "http_2xx: {}".to_string(),
            ..ConfigSnapshot::default()
        };

        assert_ne!(a.canonical_bytes(), b.canonical_bytes());
        assert_eq!(a.canonical_bytes(), a.clone().canonical_bytes());
    }

    #[test]
    fn test_settings_defaults_point_at_snap() {
        let settings = ExporterSettings::default();

        assert_eq!(settings.snap_name, "prometheus-blackbox-exporter");
        assert_eq!(settings.port, 9115);
        assert!(settings
            .config_path
            .starts_with("/var/snap/prometheus-blackbox-exporter"));
    }
}
