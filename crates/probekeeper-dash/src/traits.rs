//! Dashboard registry trait

use async_trait::async_trait;

use crate::error::DashError;

#[async_trait]
pub trait DashboardRegistry: Send + Sync {
    /// Register a dashboard JSON document under the given name
    async fn register_dashboard(&self, name: &str, dashboard: &str) -> Result<(), DashError>;
}
