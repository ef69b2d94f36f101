//! Interactive chat module
//!
//! Provides a line-editor based interactive interface for readings.

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::ChatRepl;
