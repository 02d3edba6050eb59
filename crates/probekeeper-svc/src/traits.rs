//! Service, firewall and scrape-target traits

use async_trait::async_trait;

use crate::error::SvcError;

#[async_trait]
pub trait ServiceManager: Send + Sync {
    /// Whether the unit is currently active
    async fn is_running(&self, unit: &str) -> Result<bool, SvcError>;

    /// Start the unit
    async fn start(&self, unit: &str) -> Result<(), SvcError>;

    /// Restart the unit
    async fn restart(&self, unit: &str) -> Result<(), SvcError>;
}

#[async_trait]
pub trait Firewall: Send + Sync {
    /// Allow inbound TCP traffic on the port
    ///
    /// Must succeed (as a no-op) on hosts without a firewall; opening the
    /// port never fails the surrounding reconfiguration.
    async fn open_port(&self, port: u16) -> Result<(), SvcError>;
}

#[async_trait]
pub trait ScrapeTargetPublisher: Send + Sync {
    /// Advertise the exporter endpoint to the scraping system
    async fn configure(&self, host: &str, port: u16) -> Result<(), SvcError>;
}
