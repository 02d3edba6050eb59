//! Configuration loading and types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use probekeeper_core::{ConfigSnapshot, ExporterSettings};

/// Top-level configuration for the probekeeper agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Agent process settings
    #[serde(default)]
    pub agent: AgentConfig,
    /// Managed exporter identity and paths
    #[serde(default)]
    pub exporter: ExporterSettings,
    /// Operator-tunable deployment configuration (the snapshot handlers see)
    #[serde(default)]
    pub deploy: ConfigSnapshot,
    /// NRPE integration paths
    #[serde(default)]
    pub nrpe: NrpeConfig,
    /// Prometheus file-SD integration
    #[serde(default)]
    pub prometheus: PrometheusConfig,
    /// Grafana registry endpoint
    #[serde(default)]
    pub grafana: GrafanaConfig,
}

/// Agent process settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Where the flag state persists
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            log_level: default_log_level(),
        }
    }
}

fn default_state_path() -> PathBuf {
    PathBuf::from("/var/lib/probekeeper/state.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// NRPE integration paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NrpeConfig {
    /// Directory of NRPE check include files
    #[serde(default = "default_nrpe_check_dir")]
    pub check_dir: PathBuf,
    /// NRPE state directory probed for availability
    #[serde(default = "default_nrpe_state_dir")]
    pub state_dir: PathBuf,
    /// NRPE daemon unit
    #[serde(default = "default_nrpe_unit")]
    pub unit: String,
}

impl Default for NrpeConfig {
    fn default() -> Self {
        Self {
            check_dir: default_nrpe_check_dir(),
            state_dir: default_nrpe_state_dir(),
            unit: default_nrpe_unit(),
        }
    }
}

fn default_nrpe_check_dir() -> PathBuf {
    PathBuf::from("/etc/nagios/nrpe.d")
}

fn default_nrpe_state_dir() -> PathBuf {
    PathBuf::from("/var/lib/nagios")
}

fn default_nrpe_unit() -> String {
    "nagios-nrpe-server".to_string()
}

/// Prometheus file-SD integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrometheusConfig {
    /// Target document path
    #[serde(default = "default_file_sd_path")]
    pub file_sd_path: PathBuf,
    /// Job label attached to the target group
    #[serde(default = "default_job")]
    pub job: String,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            file_sd_path: default_file_sd_path(),
            job: default_job(),
        }
    }
}

fn default_file_sd_path() -> PathBuf {
    PathBuf::from("/etc/prometheus/targets.d/blackbox.json")
}

fn default_job() -> String {
    "blackbox".to_string()
}

/// Grafana registry endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrafanaConfig {
    /// Grafana base URL
    #[serde(default = "default_grafana_url")]
    pub url: String,
    /// Optional API token
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for GrafanaConfig {
    fn default() -> Self {
        Self {
            url: default_grafana_url(),
            token: None,
        }
    }
}

fn default_grafana_url() -> String {
    "http://localhost:3000".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &PathBuf) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from default paths or use defaults
    pub fn load_default() -> eyre::Result<Self> {
        // Check environment variable
        if let Ok(path) = std::env::var("PROBEKEEPER_CONFIG") {
            return Self::load(&PathBuf::from(path));
        }

        // Try common paths
        let paths = [
            PathBuf::from("probekeeper.toml"),
            PathBuf::from("/etc/probekeeper/probekeeper.toml"),
            dirs::config_dir()
                .map(|p| p.join("probekeeper/probekeeper.toml"))
                .unwrap_or_default(),
        ];

        for path in paths {
            if path.exists() {
                return Self::load(&path);
            }
        }

        // Return default config if no file found
        tracing::warn!("no config file found, using defaults");
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_the_exporter_snap() {
        let config = Config::default();

        assert_eq!(config.exporter.snap_name, "prometheus-blackbox-exporter");
        assert_eq!(config.deploy.snap_channel, "stable");
        assert_eq!(config.nrpe.unit, "nagios-nrpe-server");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [deploy]
            snap_channel = "candidate"
            modules = "http_2xx:\n  prober: http\n"

            [grafana]
            url = "http://grafana.internal:3000"
            token = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.deploy.snap_channel, "candidate");
        assert_eq!(config.grafana.url, "http://grafana.internal:3000");
        assert_eq!(config.grafana.token.as_deref(), Some("secret"));
        // Untouched sections keep their defaults
        assert_eq!(config.exporter.port, 9115);
        assert_eq!(config.agent.log_level, "info");
    }
}
