//! Application layer for arcana
//!
//! This crate contains the stream ingestor, the divination use case and the
//! port definitions adapters implement. It depends only on the domain layer.

pub mod ingest;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ingest::{EventStream, IngestOptions, StreamIngestor};
pub use ports::{
    progress::{NoProgress, ReadingProgress},
    transport::{ByteStream, OracleTransport, TransportError},
};
pub use use_cases::run_divination::{DivinationStream, RunDivinationError, RunDivinationUseCase};
