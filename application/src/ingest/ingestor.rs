//! The stream ingestor.
//!
//! One call to [`StreamIngestor::ingest`] is one session: it owns the byte
//! source, a [`Utf8ChunkDecoder`] and (for [`WireFormat::JsonFragments`]) a
//! [`FragmentExtractor`], and yields:
//!
//! - one [`StreamEvent::Delta`] per read that decodes to non-empty text
//!   (plain text), or per extracted `"text"` value (JSON fragments);
//! - nothing more when the source completes normally;
//! - exactly one [`StreamEvent::Interrupted`] carrying the sentinel, and then
//!   nothing, when the source or the decoder fails.
//!
//! Failures never escape as errors. Dropping the returned stream drops the
//! source, which releases the connection.

use crate::ports::transport::TransportError;
use arcana_domain::{
    DEFAULT_SENTINEL, DecodeMode, FragmentExtractor, StreamEvent, Utf8ChunkDecoder, WireFormat,
};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use tracing::{debug, error};

/// A boxed stream of reading events.
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// How a session decodes its body and what it shows on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    pub wire_format: WireFormat,
    pub decode_mode: DecodeMode,
    pub sentinel: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            wire_format: WireFormat::default(),
            decode_mode: DecodeMode::default(),
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }
}

impl IngestOptions {
    pub fn with_wire_format(mut self, wire_format: WireFormat) -> Self {
        self.wire_format = wire_format;
        self
    }

    pub fn with_decode_mode(mut self, decode_mode: DecodeMode) -> Self {
        self.decode_mode = decode_mode;
        self
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }
}

/// Creates ingestion sessions.
#[derive(Debug, Clone, Default)]
pub struct StreamIngestor {
    options: IngestOptions,
}

impl StreamIngestor {
    pub fn new(options: IngestOptions) -> Self {
        Self { options }
    }

    /// Start a session over `source`.
    pub fn ingest<S>(&self, source: S) -> impl Stream<Item = StreamEvent> + Send + 'static
    where
        S: Stream<Item = Result<Bytes, TransportError>> + Send + 'static,
    {
        let options = self.options.clone();

        async_stream::stream! {
            let mut source = std::pin::pin!(source);
            let mut decoder = Utf8ChunkDecoder::new(options.decode_mode);
            let mut extractor = match options.wire_format {
                WireFormat::JsonFragments => Some(FragmentExtractor::new()),
                WireFormat::PlainText => None,
            };
            let mut reads = 0usize;

            while let Some(read) = source.next().await {
                reads += 1;
                let bytes = match read {
                    Ok(b) => b,
                    Err(e) => {
                        error!(error = %e, reads, "Stream read failed");
                        yield StreamEvent::Interrupted(options.sentinel.clone());
                        return;
                    }
                };

                let text = match decoder.decode(&bytes) {
                    Ok(t) => t,
                    Err(e) => {
                        error!(error = %e, reads, "Stream decode failed");
                        yield StreamEvent::Interrupted(options.sentinel.clone());
                        return;
                    }
                };
                debug!(reads, bytes = bytes.len(), chars = text.chars().count(), "Read chunk");

                for fragment in route(&mut extractor, text) {
                    yield StreamEvent::Delta(fragment);
                }
            }

            let tail = match decoder.finish() {
                Ok(t) => t,
                Err(e) => {
                    error!(error = %e, reads, "Stream ended mid-character");
                    yield StreamEvent::Interrupted(options.sentinel.clone());
                    return;
                }
            };
            for fragment in route(&mut extractor, tail) {
                yield StreamEvent::Delta(fragment);
            }
            if let Some(mut extractor) = extractor {
                for fragment in extractor.finish().into_iter().filter(|f| !f.is_empty()) {
                    yield StreamEvent::Delta(fragment);
                }
            }
            debug!(reads, "Stream completed");
        }
    }

    /// A session that failed before any body was available.
    pub fn failed(&self) -> impl Stream<Item = StreamEvent> + Send + 'static {
        futures::stream::iter([StreamEvent::Interrupted(self.options.sentinel.clone())])
    }
}

/// Decoded text to displayable fragments for the session's wire format.
fn route(extractor: &mut Option<FragmentExtractor>, text: String) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    match extractor {
        None => vec![text],
        Some(extractor) => {
            extractor.push(&text);
            extractor
                .extract()
                .fragments
                .into_iter()
                .filter(|f| !f.is_empty())
                .collect()
        }
    }
}
