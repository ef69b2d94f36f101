//! Domain layer for arcana
//!
//! This crate contains the core logic of a reading: what may be asked, how the
//! prompt is assembled, and how a chunked response body is turned back into
//! text. It performs no I/O and has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Divination
//!
//! - **Kind**: tarot, I Ching, astrology or runes
//! - **Request**: the validated question (and optional birth date context)
//!
//! ## Stream reassembly
//!
//! - **Decoder**: byte chunks to text, never splitting a character
//! - **Fragment extraction**: `"text"` values out of a JSON fragment stream
//! - **Sentinel**: the fixed fragment shown when a session fails

pub mod core;
pub mod divination;
pub mod prompt;
pub mod stream;
pub mod util;

// Re-export commonly used types
pub use core::error::DomainError;
pub use divination::{kind::DivinationKind, request::DivinationRequest};
pub use prompt::{DivinationPrompt, FALLBACK_INSTRUCTION, InstructionTable, PromptBuilder};
pub use stream::{
    DEFAULT_SENTINEL,
    decoder::{DecodeError, DecodeMode, Utf8ChunkDecoder},
    event::StreamEvent,
    fragment::{Extraction, FragmentExtractor},
    result_text::ResultText,
    wire_format::WireFormat,
};
