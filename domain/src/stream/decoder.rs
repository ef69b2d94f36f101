//! Incremental UTF-8 decoding of byte chunks.
//!
//! Network reads split the body at arbitrary byte positions, so a multi-byte
//! character can straddle two reads. [`Utf8ChunkDecoder`] holds the incomplete
//! tail of one read and prepends it to the next, so that concatenating every
//! decoded chunk equals decoding the whole body at once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How invalid byte sequences are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Replace each invalid sequence with U+FFFD (browser decoder behavior).
    #[default]
    Lossy,
    /// Fail on the first invalid sequence.
    Strict,
}

/// Decoding failures (strict mode only)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Invalid UTF-8 sequence at byte {offset} of the stream")]
    InvalidSequence { offset: u64 },

    #[error("Stream ended inside a multi-byte character ({pending} dangling bytes)")]
    Truncated { pending: usize },
}

/// Stateful UTF-8 decoder for chunked input.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    mode: DecodeMode,
    pending: Vec<u8>,
    /// Bytes fully decoded so far, for error offsets.
    decoded: u64,
}

impl Utf8ChunkDecoder {
    pub fn new(mode: DecodeMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn strict() -> Self {
        Self::new(DecodeMode::Strict)
    }

    /// Decode one chunk.
    ///
    /// Returns an empty string when the chunk only completes nothing yet
    /// (e.g. it is the first byte of a character).
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String, DecodeError> {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    self.decoded += rest.len() as u64;
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    self.decoded += valid.len() as u64;

                    match e.error_len() {
                        // Incomplete character at the end: keep it for the next chunk.
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                        Some(len) => match self.mode {
                            DecodeMode::Strict => {
                                return Err(DecodeError::InvalidSequence {
                                    offset: self.decoded,
                                });
                            }
                            DecodeMode::Lossy => {
                                out.push(char::REPLACEMENT_CHARACTER);
                                self.decoded += len as u64;
                                rest = &after[len..];
                            }
                        },
                    }
                }
            }
        }

        Ok(out)
    }

    /// Flush at end of stream.
    pub fn finish(&mut self) -> Result<String, DecodeError> {
        if self.pending.is_empty() {
            return Ok(String::new());
        }
        let pending = std::mem::take(&mut self.pending);
        match self.mode {
            DecodeMode::Strict => Err(DecodeError::Truncated {
                pending: pending.len(),
            }),
            DecodeMode::Lossy => {
                self.decoded += pending.len() as u64;
                Ok(char::REPLACEMENT_CHARACTER.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_split(bytes: &[u8], at: &[usize]) -> String {
        let mut decoder = Utf8ChunkDecoder::strict();
        let mut out = String::new();
        let mut start = 0;
        for &cut in at.iter().chain(std::iter::once(&bytes.len())) {
            out.push_str(&decoder.decode(&bytes[start..cut]).unwrap());
            start = cut;
        }
        out.push_str(&decoder.finish().unwrap());
        out
    }

    #[test]
    fn test_ascii_passthrough() {
        let mut decoder = Utf8ChunkDecoder::default();
        assert_eq!(decoder.decode(b"hello").unwrap(), "hello");
        assert!(decoder.pending.is_empty());
    }

    #[test]
    fn test_split_character_is_carried() {
        // "好" is e5 a5 bd
        let mut decoder = Utf8ChunkDecoder::strict();
        assert_eq!(decoder.decode(&[0xe4, 0xbd, 0xa0, 0xe5, 0xa5]).unwrap(), "你");
        assert!(!decoder.pending.is_empty());
        assert_eq!(decoder.decode(&[0xbd]).unwrap(), "好");
        assert!(decoder.pending.is_empty());
    }

    #[test]
    fn test_chunk_completing_nothing_yields_empty() {
        let mut decoder = Utf8ChunkDecoder::strict();
        assert_eq!(decoder.decode(&[0xf0]).unwrap(), "");
        assert_eq!(decoder.decode(&[0x9f, 0x94]).unwrap(), "");
        assert_eq!(decoder.decode(&[0xae]).unwrap(), "🔮");
    }

    #[test]
    fn test_every_split_point_reassembles() {
        let text = "塔罗 ᚠ runes 🔮 星盘";
        let bytes = text.as_bytes();
        for i in 0..=bytes.len() {
            for j in i..=bytes.len() {
                assert_eq!(decode_split(bytes, &[i, j]), text, "split at {i},{j}");
            }
        }
    }

    #[test]
    fn test_lossy_replaces_invalid_and_continues() {
        let mut decoder = Utf8ChunkDecoder::default();
        assert_eq!(decoder.decode(b"a\xffb").unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn test_strict_reports_offset() {
        let mut decoder = Utf8ChunkDecoder::strict();
        decoder.decode(b"abc").unwrap();
        let err = decoder.decode(b"d\xff").unwrap_err();
        assert_eq!(err, DecodeError::InvalidSequence { offset: 4 });
    }

    #[test]
    fn test_finish_with_dangling_bytes() {
        let mut lossy = Utf8ChunkDecoder::default();
        lossy.decode(&[0xe5, 0xa5]).unwrap();
        assert_eq!(lossy.finish().unwrap(), "\u{FFFD}");

        let mut strict = Utf8ChunkDecoder::strict();
        strict.decode(&[0xe5, 0xa5]).unwrap();
        assert_eq!(
            strict.finish().unwrap_err(),
            DecodeError::Truncated { pending: 2 }
        );
    }
}
