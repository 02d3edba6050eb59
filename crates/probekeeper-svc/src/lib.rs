//! probekeeper-svc: Host service integrations
//!
//! Service supervision (systemd), firewall port management (ufw) and the
//! Prometheus file-SD scrape target advertisement.

pub mod error;
pub mod file_sd;
pub mod systemd;
pub mod traits;
pub mod ufw;

pub use error::SvcError;
pub use file_sd::FileSdPublisher;
pub use systemd::SystemdManager;
pub use traits::{Firewall, ScrapeTargetPublisher, ServiceManager};
pub use ufw::UfwFirewall;
