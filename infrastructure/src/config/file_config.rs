//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use arcana_application::IngestOptions;
use arcana_domain::{DecodeMode, DivinationKind, InstructionTable, WireFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("endpoint.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("endpoint.path must start with '/': {0}")]
    InvalidPath(String),

    #[error("endpoint.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("instructions.{0} cannot be blank")]
    BlankInstruction(DivinationKind),
}

/// Raw endpoint configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEndpointConfig {
    /// Scheme, host and port of the generation proxy
    pub base_url: String,
    /// Request path (`/api/proxy` streams text, `/api/chat` streams JSON)
    pub path: String,
    /// Encoding of the streamed body
    pub wire_format: WireFormat,
    /// Timeout in seconds for connecting and for the whole stream
    pub timeout_seconds: Option<u64>,
}

impl Default for FileEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            path: "/api/proxy".to_string(),
            wire_format: WireFormat::PlainText,
            timeout_seconds: None,
        }
    }
}

/// Raw stream configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStreamConfig {
    /// Replacement for the builtin sentinel
    pub sentinel: Option<String>,
    /// Fail the session on invalid UTF-8 instead of substituting U+FFFD
    pub strict_utf8: bool,
}

/// Per-kind system instruction overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInstructionsConfig {
    pub tarot: Option<String>,
    pub iching: Option<String>,
    pub astrology: Option<String>,
    pub runes: Option<String>,
}

impl FileInstructionsConfig {
    fn overrides(&self) -> impl Iterator<Item = (DivinationKind, &str)> {
        [
            (DivinationKind::Tarot, &self.tarot),
            (DivinationKind::IChing, &self.iching),
            (DivinationKind::Astrology, &self.astrology),
            (DivinationKind::Runes, &self.runes),
        ]
        .into_iter()
        .filter_map(|(kind, text)| text.as_deref().map(|t| (kind, t)))
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Show a spinner until the first fragment arrives
    pub show_spinner: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_spinner: true,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write logs to this file instead of stderr
    pub file: Option<PathBuf>,
}

/// Complete configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub endpoint: FileEndpointConfig,
    pub stream: FileStreamConfig,
    pub instructions: FileInstructionsConfig,
    pub output: FileOutputConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.endpoint.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }

        if !self.endpoint.path.starts_with('/') {
            return Err(ConfigValidationError::InvalidPath(
                self.endpoint.path.clone(),
            ));
        }

        if let Some(0) = self.endpoint.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        for (kind, text) in self.instructions.overrides() {
            if text.trim().is_empty() {
                return Err(ConfigValidationError::BlankInstruction(kind));
            }
        }

        Ok(())
    }

    /// Builtin instruction table with the configured overrides applied
    pub fn instruction_table(&self) -> InstructionTable {
        self.instructions
            .overrides()
            .fold(InstructionTable::builtin(), |table, (kind, text)| {
                table.with_override(kind, text)
            })
    }

    /// Ingestion options for every session
    pub fn ingest_options(&self) -> IngestOptions {
        let mut options = IngestOptions::default()
            .with_wire_format(self.endpoint.wire_format)
            .with_decode_mode(if self.stream.strict_utf8 {
                DecodeMode::Strict
            } else {
                DecodeMode::Lossy
            });
        if let Some(sentinel) = &self.stream.sentinel {
            options = options.with_sentinel(sentinel.clone());
        }
        options
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.endpoint.timeout_seconds.map(Duration::from_secs)
    }
}
