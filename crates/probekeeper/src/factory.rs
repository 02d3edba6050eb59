//! Production collaborator factory
//!
//! Builds the injected implementations the `AgentActor` drives: snapd,
//! systemd, ufw, NRPE, file-SD and Grafana.

use std::sync::Arc;

use eyre::Result;

use probekeeper_dash::traits::DashboardRegistry;
use probekeeper_dash::GrafanaRegistry;
use probekeeper_exec::traits::CommandRunner;
use probekeeper_exec::LocalExecutor;
use probekeeper_monitor::traits::HealthCheckAgent;
use probekeeper_monitor::NrpeAgent;
use probekeeper_pkg::traits::SnapInstaller;
use probekeeper_pkg::SnapCli;
use probekeeper_svc::traits::{Firewall, ScrapeTargetPublisher, ServiceManager};
use probekeeper_svc::{FileSdPublisher, SystemdManager, UfwFirewall};

use crate::config::Config;

/// The full collaborator set for one agent
pub struct Collaborators {
    pub installer: Arc<dyn SnapInstaller>,
    pub services: Arc<dyn ServiceManager>,
    pub firewall: Arc<dyn Firewall>,
    pub health_checks: Arc<dyn HealthCheckAgent>,
    pub scrape_targets: Arc<dyn ScrapeTargetPublisher>,
    pub dashboards: Arc<dyn DashboardRegistry>,
}

/// Build production collaborators from the loaded configuration
pub async fn build(config: &Config) -> Result<Collaborators> {
    let runner: Arc<dyn CommandRunner> = Arc::new(LocalExecutor::new());
    let use_sudo = detect_sudo(&runner).await;

    tracing::debug!(use_sudo, "built local command runner");

    let services: Arc<dyn ServiceManager> =
        Arc::new(SystemdManager::new(runner.clone(), use_sudo));

    let health_checks: Arc<dyn HealthCheckAgent> = Arc::new(NrpeAgent::new(
        config.nrpe.check_dir.clone(),
        config.nrpe.state_dir.clone(),
        config.deploy.hostname.clone(),
        services.clone(),
        config.nrpe.unit.clone(),
    ));

    Ok(Collaborators {
        installer: Arc::new(SnapCli::new(runner.clone(), use_sudo)),
        firewall: Arc::new(UfwFirewall::new(runner, use_sudo)),
        scrape_targets: Arc::new(FileSdPublisher::new(
            config.prometheus.file_sd_path.clone(),
            config.prometheus.job.clone(),
        )),
        dashboards: Arc::new(GrafanaRegistry::new(
            config.grafana.url.clone(),
            config.grafana.token.clone(),
        )),
        services,
        health_checks,
    })
}

/// Commands need sudo unless the agent already runs as root
async fn detect_sudo(runner: &Arc<dyn CommandRunner>) -> bool {
    match runner.run("whoami").await {
        Ok(result) => result.stdout.trim() != "root",
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_from_default_config() {
        let config = Config::default();

        let collaborators = build(&config).await;

        assert!(collaborators.is_ok());
    }
}
