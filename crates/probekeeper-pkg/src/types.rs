//! Type definitions for snap management

use serde::{Deserialize, Serialize};

/// An installed snap as reported by `snap list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledSnap {
    /// Snap name
    pub name: String,
    /// Installed version string
    pub version: String,
    /// Store revision
    pub revision: String,
    /// Channel the snap is tracking
    pub tracking: String,
}

impl InstalledSnap {
    /// Create a new installed snap record
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        revision: impl Into<String>,
        tracking: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            revision: revision.into(),
            tracking: tracking.into(),
        }
    }

    /// Whether the snap tracks the given channel
    ///
    /// `snap list` reports `latest/stable` for the `stable` shorthand, so a
    /// bare channel name matches its `latest/` form as well.
    #[must_use]
    pub fn tracks(&self, channel: &str) -> bool {
        self.tracking == channel || self.tracking == format!("latest/{channel}")
    }
}
