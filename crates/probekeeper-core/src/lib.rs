//! probekeeper-core: Reconciler for the blackbox exporter deployment
//!
//! Implements the `AgentActor` using the kameo framework: its mailbox
//! serializes hook events, each handled to completion against the persisted
//! flag state. All host collaborators are injected trait objects.

pub mod actor;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod message;
pub mod modules;
pub mod plan;
pub mod render;
pub mod state;
pub mod store;

pub use actor::agent::{AgentActor, AgentActorArgs};
pub use config::{ConfigSnapshot, ExporterSettings};
pub use error::CoreError;
pub use fingerprint::Fingerprints;
pub use message::{AgentStatusReport, Dispatch, DispatchOutcome, GetAgentStatus, HookEvent};
pub use plan::Action;
pub use state::{AgentState, Flags, Relation, Relations};
pub use store::StateStore;
