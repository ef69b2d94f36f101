//! Stream ingestion
//!
//! Turns a transport's byte stream into the [`StreamEvent`](arcana_domain::StreamEvent)
//! sequence a reading is displayed from.

mod ingestor;

pub use ingestor::{EventStream, IngestOptions, StreamIngestor};
