//! Application configuration.

/// Settings loaded from `config.toml`.
pub mod app_config;
/// Command-line arguments.
pub mod args;
/// Reading and writing the config file.
pub mod storage;

pub use app_config::{AppConfig, LogLevel};
pub use args::{CliArgs, Command, ResolveArgs, TargetSizeArgs};
pub use storage::{ConfigError, StorageManager};
