//! snapd CLI installer

use std::sync::Arc;

use async_trait::async_trait;
use probekeeper_exec::traits::CommandRunner;
use tracing::{debug, info, instrument};

use crate::error::SnapError;
use crate::traits::SnapInstaller;
use crate::types::InstalledSnap;

/// Snap installer driving the `snap` CLI
pub struct SnapCli {
    /// Command runner for snap invocations
    runner: Arc<dyn CommandRunner>,
    /// Whether to prefix commands with sudo
    use_sudo: bool,
}

impl SnapCli {
    /// Create a new snap CLI installer
    ///
    /// # Arguments
    /// * `runner` - Command runner for snap commands
    /// * `use_sudo` - Whether to prefix mutating commands with sudo
    pub fn new(runner: Arc<dyn CommandRunner>, use_sudo: bool) -> Self {
        Self { runner, use_sudo }
    }

    /// Build snap command with optional sudo
    fn snap_cmd(&self, args: &str) -> String {
        if self.use_sudo {
            format!("sudo snap {args}")
        } else {
            format!("snap {args}")
        }
    }

    /// Map a failed snap invocation to a specific error
    fn classify_failure(status: i32, stderr: &str) -> SnapError {
        if stderr.contains("cannot communicate with server")
            || stderr.contains("store server")
        {
            return SnapError::StoreUnavailable(stderr.to_string());
        }
        if stderr.contains("change in progress") || stderr.contains("has \"install\" change") {
            return SnapError::SnapdBusy(stderr.to_string());
        }
        if stderr.contains("permission denied") || stderr.contains("access denied") {
            return SnapError::PermissionDenied(stderr.to_string());
        }
        SnapError::CommandFailed {
            status,
            message: stderr.to_string(),
        }
    }

    /// Parse `snap list <name>` output
    ///
    /// Example:
    /// ```text
    /// Name                          Version  Rev  Tracking       Publisher  Notes
    /// prometheus-blackbox-exporter  0.24.0   58   latest/stable  ondrejk    -
    /// ```
    fn parse_list(name: &str, output: &str) -> Result<InstalledSnap, SnapError> {
        for line in output.lines() {
            if line.is_empty() || line.starts_with("Name") {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 4 && parts[0] == name {
                return Ok(InstalledSnap::new(parts[0], parts[1], parts[2], parts[3]));
            }
        }

        Err(SnapError::ParseError(format!(
            "snap {name} missing from list output"
        )))
    }
}

#[async_trait]
impl SnapInstaller for SnapCli {
    #[instrument(skip(self))]
    async fn installed(&self, name: &str) -> Result<Option<InstalledSnap>, SnapError> {
        debug!(snap = %name, "querying installed snap");

        // snap list exits non-zero when the snap is not installed
        let result = self
            .runner
            .run(&format!("snap list {name}"))
            .await
            .map_err(|e| SnapError::ExecutionError(e.to_string()))?;

        if !result.success() {
            if result.stderr.contains("no matching snaps installed") {
                return Ok(None);
            }
            return Err(Self::classify_failure(result.status, &result.stderr));
        }

        Self::parse_list(name, &result.stdout).map(Some)
    }

    #[instrument(skip(self))]
    async fn install(&self, name: &str, channel: &str) -> Result<InstalledSnap, SnapError> {
        if let Some(current) = self.installed(name).await? {
            if current.tracks(channel) {
                debug!(snap = %name, channel = %channel, "snap already installed");
                return Ok(current);
            }
            info!(snap = %name, channel = %channel, "snap tracking a different channel, refreshing");
            return self.refresh(name, channel).await;
        }

        info!(snap = %name, channel = %channel, "installing snap");

        let cmd = self.snap_cmd(&format!("install {name} --channel={channel}"));
        let result = self
            .runner
            .run(&cmd)
            .await
            .map_err(|e| SnapError::ExecutionError(e.to_string()))?;

        if !result.success() {
            if result.stderr.contains("not found") {
                return Err(SnapError::SnapNotFound(name.to_string()));
            }
            if result.stderr.contains("no snap revision on specified channel") {
                return Err(SnapError::InvalidChannel {
                    snap: name.to_string(),
                    channel: channel.to_string(),
                });
            }
            return Err(Self::classify_failure(result.status, &result.stderr));
        }

        self.installed(name).await?.ok_or_else(|| {
            SnapError::ParseError(format!("snap {name} not listed after install"))
        })
    }

    #[instrument(skip(self))]
    async fn refresh(&self, name: &str, channel: &str) -> Result<InstalledSnap, SnapError> {
        info!(snap = %name, channel = %channel, "refreshing snap");

        let cmd = self.snap_cmd(&format!("refresh {name} --channel={channel}"));
        let result = self
            .runner
            .run(&cmd)
            .await
            .map_err(|e| SnapError::ExecutionError(e.to_string()))?;

        // "snap has no updates available" exits zero; anything else non-zero is real
        if !result.success() {
            return Err(Self::classify_failure(result.status, &result.stderr));
        }

        self.installed(name).await?.ok_or_else(|| {
            SnapError::ParseError(format!("snap {name} not listed after refresh"))
        })
    }

    async fn is_available(&self) -> bool {
        match self.runner.run("which snap").await {
            Ok(result) => result.success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let output = "Name                          Version  Rev  Tracking       Publisher  Notes\n\
                      prometheus-blackbox-exporter  0.24.0   58   latest/stable  ondrejk    -";

        let snap = SnapCli::parse_list("prometheus-blackbox-exporter", output).unwrap();

        assert_eq!(snap.name, "prometheus-blackbox-exporter");
        assert_eq!(snap.version, "0.24.0");
        assert_eq!(snap.revision, "58");
        assert_eq!(snap.tracking, "latest/stable");
    }

    #[test]
    fn test_parse_list_missing_snap() {
        let output = "Name  Version  Rev  Tracking  Publisher  Notes\n\
                      core  16-2.61  161  stable    canonical  core";

        let result = SnapCli::parse_list("prometheus-blackbox-exporter", output);

        assert!(matches!(result, Err(SnapError::ParseError(_))));
    }

    #[test]
    fn test_tracks_matches_latest_shorthand() {
        let snap = InstalledSnap::new("x", "1.0", "1", "latest/edge");

        assert!(snap.tracks("edge"));
        assert!(snap.tracks("latest/edge"));
        assert!(!snap.tracks("stable"));
    }

    #[test]
    fn test_classify_store_failure() {
        let err = SnapCli::classify_failure(1, "error: cannot communicate with server");

        assert!(matches!(err, SnapError::StoreUnavailable(_)));
        assert!(err.is_retryable());
    }
}
