//! Presentation layer for arcana
//!
//! This crate contains CLI definitions, console rendering of streamed
//! readings, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use output::stream_printer::StreamPrinter;
