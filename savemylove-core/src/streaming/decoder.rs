//! Line framing and payload decoding for `data: <json>` event streams.

use crate::config::constants::streaming::{COMMENT_PREFIX, DATA_PREFIX, DONE_MARKER};
use serde::Deserialize;

/// Splits an arbitrary sequence of byte chunks into complete lines.
///
/// Bytes are buffered until a `\n` arrives, so a line cut in the middle of a
/// multi-byte UTF-8 character is decoded only once it is whole.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: Vec<u8>,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed, without the
    /// trailing `\n` or `\r\n`. A trailing partial line is held back.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buffer[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            lines.push(decode_line(&self.buffer[start..end]));
            start = end + 1;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }
        lines
    }

    /// Flush whatever is left once the stream has ended
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = decode_line(&self.buffer);
        self.buffer.clear();
        Some(line)
    }

    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Classification of a single event-stream line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    Blank,
    /// Heartbeat / comment line starting with `:`
    Comment,
    /// The `data: [DONE]` termination marker
    Done,
    Data(&'a str),
    /// `event:`, `id:`, `retry:` or anything unrecognised
    Other,
}

pub fn classify_line(line: &str) -> SseLine<'_> {
    if line.trim().is_empty() {
        return SseLine::Blank;
    }
    if line.starts_with(COMMENT_PREFIX) {
        return SseLine::Comment;
    }
    match line.strip_prefix(DATA_PREFIX) {
        Some(rest) => {
            let data = rest.strip_prefix(' ').unwrap_or(rest);
            if data.trim() == DONE_MARKER {
                SseLine::Done
            } else {
                SseLine::Data(data)
            }
        }
        None => SseLine::Other,
    }
}

#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<ChunkError>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkError {
    #[serde(default)]
    message: Option<String>,
}

/// Decoded content of one data line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedPayload {
    /// `choices[0].delta.content`; may be empty
    Delta(String),
    /// The provider reported an error inside the stream
    ProviderError(String),
}

/// Parse a data-line payload and pull out `choices[0].delta.content`.
///
/// Payloads without that field decode to an empty delta.
pub fn decode_payload(data: &str) -> Result<DecodedPayload, serde_json::Error> {
    let payload: ChunkPayload = serde_json::from_str(data.trim())?;

    if let Some(error) = payload.error {
        return Ok(DecodedPayload::ProviderError(
            error
                .message
                .unwrap_or_else(|| "unknown provider error".to_string()),
        ));
    }

    let content = payload
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .unwrap_or_default();
    Ok(DecodedPayload::Delta(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_back_partial_lines() {
        let mut decoder = SseLineDecoder::new();
        assert!(decoder.push(b"data: {\"a\"").is_empty());
        assert_eq!(decoder.pending_bytes(), 10);
        let lines = decoder.push(b":1}\r\ndata: x\n: ping\n");
        assert_eq!(lines, vec!["data: {\"a\":1}", "data: x", ": ping"]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn split_multibyte_character_survives() {
        let text = "data: 你好\n".as_bytes();
        let mut decoder = SseLineDecoder::new();
        assert!(decoder.push(&text[..8]).is_empty());
        assert_eq!(decoder.push(&text[8..]), vec!["data: 你好"]);
    }

    #[test]
    fn finish_flushes_unterminated_tail() {
        let mut decoder = SseLineDecoder::new();
        decoder.push(b"data: [DONE]");
        assert_eq!(decoder.finish().as_deref(), Some("data: [DONE]"));
        assert_eq!(decoder.pending_bytes(), 0);
    }

    #[test]
    fn classifies_lines() {
        assert_eq!(classify_line(""), SseLine::Blank);
        assert_eq!(classify_line(": OPENROUTER PROCESSING"), SseLine::Comment);
        assert_eq!(classify_line("data: [DONE]"), SseLine::Done);
        assert_eq!(classify_line("data:{\"x\":1}"), SseLine::Data("{\"x\":1}"));
        assert_eq!(classify_line("data: {}"), SseLine::Data("{}"));
        assert_eq!(classify_line("event: message"), SseLine::Other);
    }

    #[test]
    fn extracts_nested_delta_content() {
        let payload = r#"{"choices":[{"delta":{"content":"Hel"}}]}"#;
        assert_eq!(
            decode_payload(payload).unwrap(),
            DecodedPayload::Delta("Hel".to_string())
        );
        let role_only = r#"{"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(
            decode_payload(role_only).unwrap(),
            DecodedPayload::Delta(String::new())
        );
    }

    #[test]
    fn reports_in_band_errors_and_rejects_garbage() {
        let payload = r#"{"error":{"message":"overloaded","code":502}}"#;
        assert_eq!(
            decode_payload(payload).unwrap(),
            DecodedPayload::ProviderError("overloaded".to_string())
        );
        assert!(decode_payload("{not json").is_err());
    }
}
