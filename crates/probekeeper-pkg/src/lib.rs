//! probekeeper-pkg: Snap installation abstraction
//!
//! Provides the `SnapInstaller` trait and the snapd CLI implementation used
//! to install the exporter snap at a configured channel.

pub mod error;
pub mod snap;
pub mod traits;
pub mod types;

pub use error::SnapError;
pub use snap::SnapCli;
pub use traits::SnapInstaller;
pub use types::InstalledSnap;
