//! Prompt domain
//!
//! The per-kind system instructions and the pure prompt builder that pairs
//! them with the user's question.

mod builder;
mod instructions;

pub use builder::{DivinationPrompt, PromptBuilder};
pub use instructions::{FALLBACK_INSTRUCTION, InstructionTable};
