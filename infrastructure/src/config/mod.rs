//! Configuration file loading for arcana
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables prefixed `ARCANA_` (`ARCANA_ENDPOINT__PATH=/api/chat`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./arcana.toml` or `./.arcana.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/arcana/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileEndpointConfig, FileInstructionsConfig,
    FileLoggingConfig, FileOutputConfig, FileStreamConfig,
};
pub use loader::ConfigLoader;
