//! systemd service manager

use std::sync::Arc;

use async_trait::async_trait;
use probekeeper_exec::traits::CommandRunner;
use tracing::{debug, info, instrument};

use crate::error::SvcError;
use crate::traits::ServiceManager;

/// Service manager driving `systemctl`
pub struct SystemdManager {
    /// Command runner for systemctl invocations
    runner: Arc<dyn CommandRunner>,
    /// Whether to prefix mutating commands with sudo
    use_sudo: bool,
}

impl SystemdManager {
    /// Create a new systemd manager
    pub fn new(runner: Arc<dyn CommandRunner>, use_sudo: bool) -> Self {
        Self { runner, use_sudo }
    }

    /// Build systemctl command with optional sudo
    fn systemctl_cmd(&self, args: &str) -> String {
        if self.use_sudo {
            format!("sudo systemctl {args}")
        } else {
            format!("systemctl {args}")
        }
    }

    async fn run_mutating(&self, verb: &str, unit: &str) -> Result<(), SvcError> {
        let cmd = self.systemctl_cmd(&format!("{verb} {unit}"));
        let result = self
            .runner
            .run(&cmd)
            .await
            .map_err(|e| SvcError::ExecutionError(e.to_string()))?;

        if !result.success() {
            if result.stderr.contains("not found") || result.stderr.contains("not loaded") {
                return Err(SvcError::UnitNotFound(unit.to_string()));
            }
            return Err(SvcError::CommandFailed {
                status: result.status,
                message: result.stderr,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ServiceManager for SystemdManager {
    #[instrument(skip(self))]
    async fn is_running(&self, unit: &str) -> Result<bool, SvcError> {
        // is-active exits 0 when active, 3 when inactive; both are answers
        let cmd = format!("systemctl is-active --quiet {unit}");
        let result = self
            .runner
            .run(&cmd)
            .await
            .map_err(|e| SvcError::ExecutionError(e.to_string()))?;

        debug!(unit = %unit, active = result.success(), "queried unit state");
        Ok(result.success())
    }

    #[instrument(skip(self))]
    async fn start(&self, unit: &str) -> Result<(), SvcError> {
        info!(unit = %unit, "starting unit");
        self.run_mutating("start", unit).await
    }

    #[instrument(skip(self))]
    async fn restart(&self, unit: &str) -> Result<(), SvcError> {
        info!(unit = %unit, "restarting unit");
        self.run_mutating("restart", unit).await
    }
}
