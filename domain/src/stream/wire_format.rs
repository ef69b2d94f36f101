//! Response body encoding

use serde::{Deserialize, Serialize};

/// How the generation service encodes the streamed body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    /// The body is the generated text itself (proxy endpoint).
    #[default]
    PlainText,
    /// The body is the provider's JSON array of response objects, split at
    /// arbitrary byte boundaries.
    JsonFragments,
}

impl std::fmt::Display for WireFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireFormat::PlainText => write!(f, "plain_text"),
            WireFormat::JsonFragments => write!(f, "json_fragments"),
        }
    }
}
