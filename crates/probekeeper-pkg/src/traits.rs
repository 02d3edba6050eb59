//! Snap installer trait

use async_trait::async_trait;

use crate::error::SnapError;
use crate::types::InstalledSnap;

#[async_trait]
pub trait SnapInstaller: Send + Sync {
    /// Query the installed state of a snap, `None` if not installed
    async fn installed(&self, name: &str) -> Result<Option<InstalledSnap>, SnapError>;

    /// Install a snap from the store at the given channel
    ///
    /// Installing an already-installed snap refreshes it onto the channel
    /// instead, so the call is safe to repeat.
    async fn install(&self, name: &str, channel: &str) -> Result<InstalledSnap, SnapError>;

    /// Refresh an installed snap onto the given channel
    async fn refresh(&self, name: &str, channel: &str) -> Result<InstalledSnap, SnapError>;

    /// Whether snapd is present on this host
    async fn is_available(&self) -> bool;
}
