//! probekeeper-monitor: NRPE health check management
//!
//! Registers and removes the exporter's HTTP health probe with a local
//! NRPE agent.

pub mod error;
pub mod nrpe;
pub mod traits;

pub use error::MonitorError;
pub use nrpe::NrpeAgent;
pub use traits::{CheckDef, HealthCheckAgent};
