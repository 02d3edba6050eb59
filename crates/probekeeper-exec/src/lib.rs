//! probekeeper-exec: Command execution abstraction
//!
//! Provides the `CommandRunner` trait and the local implementation used to
//! drive snap, systemctl and the other host tools.

pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use error::ExecError;
pub use local::LocalExecutor;
pub use result::CommandResult;
pub use traits::CommandRunner;
