//! probekeeper-api: Shared event and status types
//!
//! Contains the agent event broadcast types and workload status reporting
//! used across the reconciler and the daemon binary.

pub mod events;
pub mod status;

pub use events::AgentEvent;
pub use status::{StatusLevel, WorkloadStatus};
