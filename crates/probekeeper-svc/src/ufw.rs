//! ufw firewall integration

use std::sync::Arc;

use async_trait::async_trait;
use probekeeper_exec::traits::CommandRunner;
use tracing::{debug, info, instrument};

use crate::error::SvcError;
use crate::traits::Firewall;

/// Firewall managing inbound rules via `ufw`
///
/// A host without ufw has no firewall to configure; `open_port` then
/// succeeds as a no-op.
pub struct UfwFirewall {
    /// Command runner for ufw invocations
    runner: Arc<dyn CommandRunner>,
    /// Whether to prefix commands with sudo
    use_sudo: bool,
}

impl UfwFirewall {
    /// Create a new ufw firewall
    pub fn new(runner: Arc<dyn CommandRunner>, use_sudo: bool) -> Self {
        Self { runner, use_sudo }
    }

    fn ufw_cmd(&self, args: &str) -> String {
        if self.use_sudo {
            format!("sudo ufw {args}")
        } else {
            format!("ufw {args}")
        }
    }
}

#[async_trait]
impl Firewall for UfwFirewall {
    #[instrument(skip(self))]
    async fn open_port(&self, port: u16) -> Result<(), SvcError> {
        let probe = self
            .runner
            .run("which ufw")
            .await
            .map_err(|e| SvcError::ExecutionError(e.to_string()))?;

        if !probe.success() {
            debug!(port, "ufw not present, skipping port rule");
            return Ok(());
        }

        // ufw allow is idempotent; re-adding an existing rule succeeds
        let cmd = self.ufw_cmd(&format!("allow {port}/tcp"));
        let result = self
            .runner
            .run(&cmd)
            .await
            .map_err(|e| SvcError::ExecutionError(e.to_string()))?;

        if !result.success() {
            return Err(SvcError::CommandFailed {
                status: result.status,
                message: result.stderr,
            });
        }

        info!(port, "opened exporter port");
        Ok(())
    }
}
