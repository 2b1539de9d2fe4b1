//! devcon Core Library
//!
//! Layered devcontainer configuration: a comment-tolerant parser, a
//! deterministic deep merge, command-line override normalization and the
//! pipeline that combines common, project and override layers into the
//! document handed to `devcontainer up`.

pub mod commands;
pub mod container;
pub mod context;
pub mod document;
pub mod errors;
pub mod merge;
pub mod orchestrator;
pub mod overrides;
pub mod settings;
pub mod status;
pub mod template;
pub mod types;
pub mod workspace;

/// Re-exports of commonly used types
pub mod prelude {
    // Documents
    pub use crate::document::{ConfigDocument, Location, ParseError, parse, parse_named};

    // Merge
    pub use crate::merge::{DEFAULT_CONCAT_KEYS, MergePolicy, fold, merge};

    // Overrides
    pub use crate::overrides::{
        EnvSpec, MountDefaults, MountSpec, OverrideSet, PortSpec, normalize_mount, normalize_port,
        parse_env,
    };

    // Orchestration
    pub use crate::errors::{ConfigError, ConfigResult};
    pub use crate::orchestrator::{MergeOrchestrator, SourceText, build_final_config};
    pub use crate::types::MergeSource;

    // Settings and context
    pub use crate::context::AppContext;
    pub use crate::settings::{Settings, SettingsStore};
}
