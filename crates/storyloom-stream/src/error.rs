//! Session error taxonomy
//!
//! The fatal conditions surfaced through `on_error`, shared with the
//! non-streaming completion call. Cancellation is not an error and never
//! appears here.

use thiserror::Error;

/// A fatal session condition.
///
/// Framing noise (unrecognized or unparseable lines) is not represented:
/// it is dropped without ending the session.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The endpoint path did not resolve against the configured base URL.
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The connection could not be established or failed mid-body.
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}")]
    Status { status: reqwest::StatusCode },

    /// A well-formed error event from the producer.
    #[error("{0}")]
    Producer(String),

    /// The body ended before the producer signalled completion.
    #[error("response ended before completion")]
    Truncated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_names_the_code() {
        let err = StreamError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        assert_eq!(err.to_string(), "request failed with status 502 Bad Gateway");
    }

    #[test]
    fn test_producer_message_passes_through_verbatim() {
        let err = StreamError::Producer("model overloaded".to_string());
        assert_eq!(err.to_string(), "model overloaded");
    }
}
