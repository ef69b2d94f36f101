//! Stream reassembly domain.
//!
//! Everything needed to turn a chunked response body into displayable text,
//! without doing any I/O:
//!
//! - [`decoder::Utf8ChunkDecoder`]: byte chunks to text, carrying split characters
//! - [`fragment::FragmentExtractor`]: `"text"` values out of a JSON fragment stream
//! - [`event::StreamEvent`]: what the consumer of a reading receives
//! - [`result_text::ResultText`]: the growing text a UI displays
//! - [`wire_format::WireFormat`]: which body encoding a transport delivers

pub mod decoder;
pub mod event;
pub mod fragment;
pub mod result_text;
pub mod wire_format;

/// Fragment emitted in place of further output when a session fails.
pub const DEFAULT_SENTINEL: &str =
    "\n\n( 连接中断：灵能讯号微弱，请检查网络配置或API Key设置。 )";
