//! Prometheus file-SD scrape target publisher
//!
//! Writes the exporter endpoint as a file service-discovery document, the
//! form Prometheus consumes to pick up scrape targets from disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::SvcError;
use crate::traits::ScrapeTargetPublisher;

/// One file-SD target group
#[derive(Debug, Serialize)]
struct TargetGroup {
    targets: Vec<String>,
    labels: TargetLabels,
}

#[derive(Debug, Serialize)]
struct TargetLabels {
    job: String,
}

/// Publishes the exporter as a Prometheus file-SD target
pub struct FileSdPublisher {
    /// Path of the target document, e.g. `/etc/prometheus/targets.d/blackbox.json`
    path: PathBuf,
    /// Job label attached to the target group
    job: String,
}

impl FileSdPublisher {
    /// Create a new publisher writing to `path` with the given job label
    pub fn new(path: impl Into<PathBuf>, job: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            job: job.into(),
        }
    }

    /// Path of the target document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ScrapeTargetPublisher for FileSdPublisher {
    #[instrument(skip(self))]
    async fn configure(&self, host: &str, port: u16) -> Result<(), SvcError> {
        let groups = vec![TargetGroup {
            targets: vec![format!("{host}:{port}")],
            labels: TargetLabels {
                job: self.job.clone(),
            },
        }];

        let doc = serde_json::to_vec_pretty(&groups)
            .map_err(|e| SvcError::SerializeError(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SvcError::IoError(e.to_string()))?;
        }

        tokio::fs::write(&self.path, doc)
            .await
            .map_err(|e| SvcError::IoError(e.to_string()))?;

        info!(path = %self.path.display(), target = %format!("{host}:{port}"), "published scrape target");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_configure_writes_target_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("targets.d/blackbox.json");
        let publisher = FileSdPublisher::new(&path, "blackbox");

        publisher.configure("node1.example.com", 9115).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed[0]["targets"][0], "node1.example.com:9115");
        assert_eq!(parsed[0]["labels"]["job"], "blackbox");
    }

    #[tokio::test]
    async fn test_configure_overwrites_previous_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blackbox.json");
        let publisher = FileSdPublisher::new(&path, "blackbox");

        publisher.configure("old-host", 9115).await.unwrap();
        publisher.configure("new-host", 9116).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("new-host:9116"));
        assert!(!written.contains("old-host"));
    }
}
