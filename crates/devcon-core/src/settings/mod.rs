//! Tool settings (`<config_dir>/devcon/settings.toml`).
//!
//! Settings supply the defaults the merge engine takes as explicit
//! parameters: common-config path, mount defaults and extra concatenation
//! keys. Command-line flags take precedence over them.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use paths::{default_common_config_path, expand_home};
pub use schema::{MergeSettings, Settings};
pub use store::SettingsStore;
