//! Oracle transport port
//!
//! Defines how the application layer reaches the generation service: send a
//! prompt, get back the response body as a stream of byte chunks.

use arcana_domain::DivinationPrompt;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur while opening or reading a response stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Response has no body")]
    MissingBody,

    #[error("Read error: {0}")]
    Read(String),

    #[error("Timeout")]
    Timeout,
}

/// A response body, chunked as it arrives.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Transport to the generation service
///
/// Implementations (adapters) live in the infrastructure layer. The returned
/// stream exclusively owns the underlying connection; dropping it releases
/// the connection.
#[async_trait]
pub trait OracleTransport: Send + Sync {
    /// Send the prompt and return the streamed response body.
    ///
    /// Non-success responses are errors; the body of a failed response is
    /// never streamed.
    async fn open(&self, prompt: &DivinationPrompt) -> Result<ByteStream, TransportError>;
}
