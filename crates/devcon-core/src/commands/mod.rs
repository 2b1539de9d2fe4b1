//! High-level commands for devcon operations.
//!
//! These are the operations the CLI exposes; each takes the shared
//! [`AppContext`](crate::context::AppContext).

pub mod exec;
pub mod init;
pub mod up;

pub use exec::{ExecCommand, ExecOutcome};
pub use init::{InitOutcome, init_common_config};
pub use up::{MergePlan, UpCommand, UpOptions, UpReport, write_override_file};

pub use crate::status::{ContainerSummary, WorkspaceStatus};
