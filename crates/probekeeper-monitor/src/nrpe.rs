//! NRPE agent integration
//!
//! Check definitions land as `command[...]` files in the NRPE include
//! directory; `write` restarts the daemon so it picks them up.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use probekeeper_svc::traits::ServiceManager;
use tracing::{debug, info, instrument};

use crate::error::MonitorError;
use crate::traits::{CheckDef, HealthCheckAgent};

/// Health check agent managing a local NRPE daemon
pub struct NrpeAgent {
    /// Directory of check include files, e.g. `/etc/nagios/nrpe.d`
    check_dir: PathBuf,
    /// NRPE state directory probed for availability, e.g. `/var/lib/nagios`
    state_dir: PathBuf,
    /// Monitored-host context written into definitions
    hostname: String,
    /// Service manager used to reload the daemon
    services: Arc<dyn ServiceManager>,
    /// NRPE daemon unit name
    unit: String,
}

impl NrpeAgent {
    /// Create a new NRPE agent
    pub fn new(
        check_dir: impl Into<PathBuf>,
        state_dir: impl Into<PathBuf>,
        hostname: impl Into<String>,
        services: Arc<dyn ServiceManager>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            check_dir: check_dir.into(),
            state_dir: state_dir.into(),
            hostname: hostname.into(),
            services,
            unit: unit.into(),
        }
    }

    fn check_path(&self, shortname: &str) -> Result<PathBuf, MonitorError> {
        // Shortnames become file and command names; keep them word-like
        if shortname.is_empty()
            || !shortname
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(MonitorError::InvalidShortname(shortname.to_string()));
        }
        Ok(self.check_dir.join(format!("check_{shortname}.cfg")))
    }

    fn render_check(&self, check: &CheckDef) -> String {
        format!(
            "# {description}\n# host: {hostname}\ncommand[check_{shortname}]={command}\n",
            description = check.description,
            hostname = self.hostname,
            shortname = check.shortname,
            command = check.command,
        )
    }
}

#[async_trait]
impl HealthCheckAgent for NrpeAgent {
    async fn available(&self) -> bool {
        tokio::fs::try_exists(&self.state_dir).await.unwrap_or(false)
    }

    #[instrument(skip(self, check), fields(shortname = %check.shortname))]
    async fn add_check(&self, check: &CheckDef) -> Result<(), MonitorError> {
        let path = self.check_path(&check.shortname)?;

        tokio::fs::create_dir_all(&self.check_dir)
            .await
            .map_err(|e| MonitorError::IoError(e.to_string()))?;

        tokio::fs::write(&path, self.render_check(check))
            .await
            .map_err(|e| MonitorError::IoError(e.to_string()))?;

        info!(path = %path.display(), "staged NRPE check");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_check(&self, shortname: &str) -> Result<(), MonitorError> {
        let path = self.check_path(shortname)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "removed NRPE check");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "check already absent");
                Ok(())
            }
            Err(e) => Err(MonitorError::IoError(e.to_string())),
        }
    }

    #[instrument(skip(self))]
    async fn write(&self) -> Result<(), MonitorError> {
        self.services
            .restart(&self.unit)
            .await
            .map_err(|e| MonitorError::ReloadFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use probekeeper_svc::error::SvcError;

    use super::*;

    struct RecordingServices {
        restarts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ServiceManager for RecordingServices {
        async fn is_running(&self, _unit: &str) -> Result<bool, SvcError> {
            Ok(true)
        }

        async fn start(&self, _unit: &str) -> Result<(), SvcError> {
            Ok(())
        }

        async fn restart(&self, unit: &str) -> Result<(), SvcError> {
            self.restarts.lock().unwrap().push(unit.to_string());
            Ok(())
        }
    }

    fn agent(check_dir: &std::path::Path, state_dir: &std::path::Path) -> NrpeAgent {
        NrpeAgent::new(
            check_dir,
            state_dir,
            "node1",
            Arc::new(RecordingServices {
                restarts: Mutex::new(Vec::new()),
            }),
            "nagios-nrpe-server",
        )
    }

    #[tokio::test]
    async fn test_add_check_writes_definition() {
        let dir = tempfile::tempdir().unwrap();
        let nrpe = agent(dir.path(), dir.path());

        let check = CheckDef::new(
            "prometheus_blackbox_exporter_http",
            "/usr/lib/nagios/plugins/check_http -I 127.0.0.1 -p 9115 -u /metrics",
            "Blackbox exporter HTTP check",
        );
        nrpe.add_check(&check).await.unwrap();

        let written = std::fs::read_to_string(
            dir.path().join("check_prometheus_blackbox_exporter_http.cfg"),
        )
        .unwrap();
        assert!(written.contains(
            "command[check_prometheus_blackbox_exporter_http]=/usr/lib/nagios/plugins/check_http"
        ));
        assert!(written.contains("# host: node1"));
    }

    #[tokio::test]
    async fn test_remove_check_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nrpe = agent(dir.path(), dir.path());

        let check = CheckDef::new("probe_http", "check_http", "probe");
        nrpe.add_check(&check).await.unwrap();

        nrpe.remove_check("probe_http").await.unwrap();
        // Second removal finds nothing and still succeeds
        nrpe.remove_check("probe_http").await.unwrap();

        assert!(!dir.path().join("check_probe_http.cfg").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_like_shortname() {
        let dir = tempfile::tempdir().unwrap();
        let nrpe = agent(dir.path(), dir.path());

        let result = nrpe.remove_check("../etc/passwd").await;

        assert!(matches!(result, Err(MonitorError::InvalidShortname(_))));
    }

    #[tokio::test]
    async fn test_write_reloads_daemon() {
        let dir = tempfile::tempdir().unwrap();
        let services = Arc::new(RecordingServices {
            restarts: Mutex::new(Vec::new()),
        });
        let nrpe = NrpeAgent::new(
            dir.path(),
            dir.path(),
            "node1",
            services.clone(),
            "nagios-nrpe-server",
        );

        nrpe.write().await.unwrap();

        assert_eq!(
            services.restarts.lock().unwrap().as_slice(),
            ["nagios-nrpe-server"]
        );
    }

    #[tokio::test]
    async fn test_available_probes_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let present = agent(dir.path(), dir.path());
        assert!(present.available().await);

        let absent = agent(dir.path(), &dir.path().join("missing"));
        assert!(!absent.available().await);
    }
}
