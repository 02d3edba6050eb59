//! probekeeper-dash: Dashboard handling
//!
//! Extraction of the operator-supplied dashboard archive over the shipped
//! defaults, and registration of dashboard JSON documents with Grafana.

pub mod archive;
pub mod error;
pub mod grafana;
pub mod traits;

pub use archive::{list_dashboards, refresh_from_resource, Dashboard};
pub use error::DashError;
pub use grafana::GrafanaRegistry;
pub use traits::DashboardRegistry;
