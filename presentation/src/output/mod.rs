//! Console output for readings

pub mod console;
pub mod stream_printer;
