//! Protocol event classification
//!
//! Lines of interest carry a `data: ` marker followed by one JSON object
//! whose `type` field selects the event kind. Everything else is noise
//! the session tolerates.

use serde::Deserialize;
use tracing::{debug, warn};

/// Marker prefix for event lines.
const EVENT_MARKER: &str = "data: ";

/// Substituted when an error event arrives without a message.
const UNKNOWN_ERROR: &str = "unknown error";

/// One classified protocol event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramedEvent {
    /// Generated text to forward to the consumer. Never empty.
    Chunk(String),
    /// The producer finished the response.
    End,
    /// Producer-reported failure. The message is never empty.
    Error(String),
    /// Keep-alive, comment, or malformed line. Dropped by the dispatcher.
    Unrecognized,
}

/// Wire payload carried after the event marker.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireEvent {
    Chunk { content: Option<String> },
    End,
    Error { message: Option<String> },
}

/// Classify one framed line.
///
/// A malformed payload classifies as `Unrecognized` rather than `Error`:
/// the producer may recover on the next line, and a single bad event must
/// not end the session.
pub fn classify(line: &str) -> FramedEvent {
    let Some(payload) = line.strip_prefix(EVENT_MARKER) else {
        return FramedEvent::Unrecognized;
    };

    match serde_json::from_str::<WireEvent>(payload) {
        Ok(WireEvent::Chunk { content }) => match content {
            Some(text) if !text.is_empty() => FramedEvent::Chunk(text),
            _ => {
                debug!("dropping chunk event with empty content");
                FramedEvent::Unrecognized
            }
        },
        Ok(WireEvent::End) => FramedEvent::End,
        Ok(WireEvent::Error { message }) => {
            let message = match message {
                Some(m) if !m.is_empty() => m,
                _ => UNKNOWN_ERROR.to_string(),
            };
            FramedEvent::Error(message)
        }
        Err(err) => {
            warn!("unparseable event payload ({err}): {payload}");
            FramedEvent::Unrecognized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_event() {
        assert_eq!(
            classify(r#"data: {"type":"chunk","content":"Hello"}"#),
            FramedEvent::Chunk("Hello".to_string())
        );
    }

    #[test]
    fn test_end_event() {
        assert_eq!(classify(r#"data: {"type":"end"}"#), FramedEvent::End);
    }

    #[test]
    fn test_error_event_with_message() {
        assert_eq!(
            classify(r#"data: {"type":"error","message":"model overloaded"}"#),
            FramedEvent::Error("model overloaded".to_string())
        );
    }

    #[test]
    fn test_error_event_without_message_gets_generic_text() {
        assert_eq!(
            classify(r#"data: {"type":"error"}"#),
            FramedEvent::Error("unknown error".to_string())
        );
        assert_eq!(
            classify(r#"data: {"type":"error","message":""}"#),
            FramedEvent::Error("unknown error".to_string())
        );
    }

    #[test]
    fn test_empty_chunk_is_unrecognized() {
        assert_eq!(
            classify(r#"data: {"type":"chunk","content":""}"#),
            FramedEvent::Unrecognized
        );
        assert_eq!(
            classify(r#"data: {"type":"chunk"}"#),
            FramedEvent::Unrecognized
        );
    }

    #[test]
    fn test_unmarked_line_is_unrecognized() {
        assert_eq!(classify(": keep-alive"), FramedEvent::Unrecognized);
        assert_eq!(classify("event: message"), FramedEvent::Unrecognized);
        assert_eq!(classify(""), FramedEvent::Unrecognized);
    }

    #[test]
    fn test_malformed_json_is_unrecognized() {
        assert_eq!(classify("data: {not json"), FramedEvent::Unrecognized);
    }

    #[test]
    fn test_unknown_discriminant_is_unrecognized() {
        assert_eq!(
            classify(r#"data: {"type":"usage","tokens":42}"#),
            FramedEvent::Unrecognized
        );
    }

    #[test]
    fn test_extra_fields_tolerated() {
        assert_eq!(
            classify(r#"data: {"type":"end","elapsed_ms":1200}"#),
            FramedEvent::End
        );
    }
}
