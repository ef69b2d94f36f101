//! Extraction of `"text"` values from a JSON fragment stream.
//!
//! Some providers stream their response as one large JSON array of response
//! objects, cut at arbitrary byte positions:
//!
//! ```text
//! [{"candidates": [{"content": {"parts": [{"text": "你"}]}}]}
//! ,{"candidates": [{"content": {"parts": [{"text": "好"}]}}]}]
//! ```
//!
//! [`FragmentExtractor`] tokenizes the decoded text incrementally, tracking
//! string, escape and nesting state, and yields every string value whose key
//! is `"text"`. Input is only consumed up to the last structural `}`; anything
//! after it stays buffered and is rescanned from the committed tokenizer state
//! once more data arrives, so a value is never emitted twice and never lost.

use tracing::{debug, warn};

/// Key whose string values are extracted.
const TEXT_KEY: &str = "text";

/// Result of one [`FragmentExtractor::extract`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Unescaped `"text"` values, in the order their closing quotes appear.
    pub fragments: Vec<String>,
    /// Bytes drained from the buffer by this call.
    pub consumed: usize,
}

/// Tokenizer state. Only ever committed right after a structural `}`.
#[derive(Debug, Clone, Default)]
struct ScanState {
    depth: usize,
    in_string: bool,
    escaped: bool,
    /// Byte offset where the open string's content starts.
    string_start: usize,
    /// Last closed string outside any value position; becomes a key on `:`.
    last_string: Option<String>,
    /// Key whose value is expected next.
    value_key: Option<String>,
}

impl ScanState {
    fn clear_key(&mut self) {
        self.last_string = None;
        self.value_key = None;
    }
}

/// Outcome of scanning the current buffer.
struct Scan {
    /// Values closed before the last `}`.
    committed: Vec<String>,
    /// Values closed after the last `}`.
    trailing: Vec<String>,
    /// Buffer offset just past the last `}`, with the state at that point.
    commit: Option<(usize, ScanState)>,
    end_state: ScanState,
}

/// Incremental `"text"` value extractor for one session.
#[derive(Debug, Default)]
pub struct FragmentExtractor {
    buffer: String,
    state: ScanState,
}

impl FragmentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append newly decoded text.
    pub fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Extract every value completed before the last `}` and drain the
    /// buffer up to that delimiter.
    ///
    /// Calling this again without a [`push`](Self::push) in between yields
    /// nothing.
    pub fn extract(&mut self) -> Extraction {
        let scan = self.scan();
        let Some((cursor, state)) = scan.commit else {
            return Extraction::default();
        };

        self.buffer.drain(..cursor);
        self.state = state;
        debug!(
            consumed = cursor,
            fragments = scan.committed.len(),
            retained = self.buffer.len(),
            "Extracted text fragments"
        );

        Extraction {
            fragments: scan.committed,
            consumed: cursor,
        }
    }

    /// Flush at end of stream: every remaining complete value, including
    /// those not followed by a `}`.
    pub fn finish(&mut self) -> Vec<String> {
        let scan = self.scan();
        if scan.end_state.in_string || scan.end_state.depth != 0 {
            warn!(
                depth = scan.end_state.depth,
                in_string = scan.end_state.in_string,
                "Fragment stream ended with unbalanced structure"
            );
        }

        self.buffer.clear();
        self.state = ScanState::default();

        let mut fragments = scan.committed;
        fragments.extend(scan.trailing);
        fragments
    }

    fn scan(&self) -> Scan {
        let mut st = self.state.clone();
        let mut committed = Vec::new();
        let mut trailing = Vec::new();
        let mut commit = None;

        for (i, ch) in self.buffer.char_indices() {
            if st.in_string {
                if st.escaped {
                    st.escaped = false;
                    continue;
                }
                match ch {
                    '\\' => st.escaped = true,
                    '"' => {
                        st.in_string = false;
                        let raw = &self.buffer[st.string_start..i];
                        if st.value_key.as_deref() == Some(TEXT_KEY) {
                            trailing.push(unescape(raw));
                            st.clear_key();
                        } else {
                            st.value_key = None;
                            st.last_string = Some(raw.to_string());
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match ch {
                '"' => {
                    st.in_string = true;
                    st.string_start = i + 1;
                }
                ':' => st.value_key = st.last_string.take(),
                '{' | '[' => {
                    st.depth += 1;
                    st.clear_key();
                }
                '}' => {
                    st.depth = st.depth.saturating_sub(1);
                    st.clear_key();
                    committed.append(&mut trailing);
                    commit = Some((i + 1, st.clone()));
                }
                ']' => {
                    st.depth = st.depth.saturating_sub(1);
                    st.clear_key();
                }
                c if c.is_whitespace() => {}
                // commas and scalar literals end any pending key
                _ => st.clear_key(),
            }
        }

        Scan {
            committed,
            trailing,
            commit,
            end_state: st,
        }
    }
}

/// Unescape a raw JSON string body, falling back to the raw text.
fn unescape(raw: &str) -> String {
    match serde_json::from_str::<String>(&format!("\"{}\"", raw)) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Emitting raw text value after failed unescape");
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract_all(chunks: &[&str]) -> Vec<String> {
        let mut extractor = FragmentExtractor::new();
        let mut out = Vec::new();
        for chunk in chunks {
            extractor.push(chunk);
            out.extend(extractor.extract().fragments);
        }
        out.extend(extractor.finish());
        out
    }

    #[test]
    fn test_single_object() {
        let mut extractor = FragmentExtractor::new();
        extractor.push(r#"[{"text": "你好"}]"#);
        let extraction = extractor.extract();
        assert_eq!(extraction.fragments, vec!["你好".to_string()]);
        assert_eq!(extraction.consumed, r#"[{"text": "你好"}"#.len());
        assert_eq!(extractor.buffer, "]");
    }

    #[test]
    fn test_partial_tail_is_retained() {
        let mut extractor = FragmentExtractor::new();
        extractor.push(r#"[{"text":"a"},{"text":"b"},{"text":"c"#);
        let extraction = extractor.extract();
        assert_eq!(extraction.fragments, vec!["a", "b"]);
        assert_eq!(extraction.consumed, r#"[{"text":"a"},{"text":"b"}"#.len());
        assert_eq!(extractor.buffer, r#",{"text":"c"#);

        extractor.push(r#"d"}]"#);
        assert_eq!(extractor.extract().fragments, vec!["cd"]);
    }

    #[test]
    fn test_extract_is_idempotent_without_new_data() {
        let mut extractor = FragmentExtractor::new();
        extractor.push(r#"[{"text":"a"},{"text":"b"#);
        assert_eq!(extractor.extract().fragments, vec!["a"]);
        assert_eq!(extractor.extract(), Extraction::default());
        assert_eq!(extractor.extract(), Extraction::default());
    }

    #[test]
    fn test_value_completed_before_brace_is_not_lost_or_repeated() {
        let mut extractor = FragmentExtractor::new();
        extractor.push(r#"[{"text":"a"#);
        extractor.push(r#"""#);
        assert!(extractor.extract().fragments.is_empty());
        extractor.push(r#"},{"text":"b"}"#);
        assert_eq!(extractor.extract().fragments, vec!["a", "b"]);
    }

    #[test]
    fn test_gemini_shaped_stream() {
        let body = concat!(
            r#"[{"candidates": [{"content": {"parts": [{"text": "星辰"}],"role": "model"}}]}"#,
            "\r\n,\r\n",
            r#"{"candidates": [{"content": {"parts": [{"text": "低语\n"}],"role": "model"},"finishReason": "STOP"}]}"#,
            "]"
        );
        for cut in 0..body.len() {
            if !body.is_char_boundary(cut) {
                continue;
            }
            let (a, b) = body.split_at(cut);
            assert_eq!(extract_all(&[a, b]), vec!["星辰", "低语\n"], "cut at {cut}");
        }
    }

    #[test]
    fn test_escapes_are_decoded() {
        let got = extract_all(&[r#"[{"text": "say \"hi\"\\n 你\n"}]"#]);
        assert_eq!(got, vec!["say \"hi\"\\n 你\n"]);
    }

    #[test]
    fn test_braces_and_keys_inside_strings_are_ignored() {
        let got = extract_all(&[r#"[{"note": "}{\"text\": \"x\"}", "text": "real"}]"#]);
        assert_eq!(got, vec!["real"]);
    }

    #[test]
    fn test_text_key_with_non_string_value_is_skipped() {
        let got = extract_all(&[r#"[{"text": 42, "other": "text"}, {"text": "ok"}]"#]);
        assert_eq!(got, vec!["ok"]);
    }

    #[test]
    fn test_text_as_value_is_not_a_key() {
        let got = extract_all(&[r#"[{"role": "text", "text": "ok"}]"#]);
        assert_eq!(got, vec!["ok"]);
    }

    #[test]
    fn test_malformed_escape_falls_back_to_raw() {
        let got = extract_all(&[r#"[{"text": "bad \x escape"}]"#]);
        assert_eq!(got, vec![r#"bad \x escape"#]);
    }

    #[test]
    fn test_finish_flushes_value_without_closing_brace() {
        let mut extractor = FragmentExtractor::new();
        extractor.push(r#"[{"text": "last"#);
        extractor.push(r#"""#);
        assert!(extractor.extract().fragments.is_empty());
        assert_eq!(extractor.finish(), vec!["last"]);
        assert!(extractor.buffer.is_empty());
    }

    #[test]
    fn test_finish_drops_incomplete_value() {
        let mut extractor = FragmentExtractor::new();
        extractor.push(r#"[{"text": "a"}, {"text": "unterminated"#);
        assert_eq!(extractor.extract().fragments, vec!["a"]);
        assert!(extractor.finish().is_empty());
    }
}
