//! Streaming session lifecycle
//!
//! One session owns the transport connection, the decode and framing
//! buffers, and the state machine that turns classified events into
//! consumer callbacks.

use bytes::Bytes;
use futures::{Future, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::decode::Utf8Decoder;
use crate::error::StreamError;
use crate::event::{classify, FramedEvent};
use crate::framing::LineFramer;
use crate::handler::StreamHandler;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Streaming,
    Completed,
    Failed,
    Cancelled,
}

impl SessionState {
    /// Whether no further transitions occur from this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Whether the read loop keeps going after a dispatched line.
enum Step {
    Continue,
    Stop,
}

/// One request/response streaming cycle.
///
/// For a session that is not cancelled, exactly one of `on_end` /
/// `on_error` fires, exactly once, with no `on_chunk` after it. A
/// cancelled session fires no terminal callback; the cancellation token
/// is consulted before every callback and before continuing to read.
pub(crate) struct StreamSession<H: StreamHandler> {
    id: Uuid,
    state: SessionState,
    handler: H,
    token: CancellationToken,
    decoder: Utf8Decoder,
    framer: LineFramer,
}

impl<H: StreamHandler> StreamSession<H> {
    pub(crate) fn new(handler: H, token: CancellationToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            handler,
            token,
            decoder: Utf8Decoder::new(),
            framer: LineFramer::new(),
        }
    }

    /// Run the session: open the transport, then consume fragments until
    /// a terminal state is reached. Dropping the fragment stream on return
    /// releases the connection.
    pub(crate) async fn run<C, S>(mut self, connect: C)
    where
        C: Future<Output = Result<S, StreamError>>,
        S: Stream<Item = Result<Bytes, StreamError>> + Unpin,
    {
        self.transition(SessionState::Connecting);
        let token = self.token.clone();

        let mut fragments = tokio::select! {
            _ = token.cancelled() => {
                self.transition(SessionState::Cancelled);
                return;
            }
            connected = connect => match connected {
                Ok(stream) => stream,
                Err(err) => {
                    self.fail(&err.to_string());
                    return;
                }
            },
        };

        loop {
            let fragment = tokio::select! {
                _ = token.cancelled() => {
                    // A fragment may already be in flight; it is discarded
                    // along with the stream.
                    self.transition(SessionState::Cancelled);
                    return;
                }
                fragment = fragments.next() => fragment,
            };

            match fragment {
                Some(Ok(bytes)) => {
                    if self.state == SessionState::Connecting {
                        self.transition(SessionState::Streaming);
                    }
                    debug!(session = %self.id, len = bytes.len(), "fragment received");
                    let text = self.decoder.decode(&bytes);
                    for line in self.framer.push(&text) {
                        if let Step::Stop = self.dispatch_line(&line) {
                            return;
                        }
                    }
                }
                Some(Err(err)) => {
                    if self.token.is_cancelled() {
                        self.transition(SessionState::Cancelled);
                        return;
                    }
                    self.fail(&err.to_string());
                    return;
                }
                None => {
                    self.finish_eof();
                    return;
                }
            }
        }
    }

    /// Dispatch one framed line.
    fn dispatch_line(&mut self, line: &str) -> Step {
        if self.token.is_cancelled() {
            self.transition(SessionState::Cancelled);
            return Step::Stop;
        }
        // Blank lines separate events on SSE transports
        if line.is_empty() {
            return Step::Continue;
        }
        match classify(line) {
            FramedEvent::Chunk(text) => {
                self.handler.on_chunk(&text);
                Step::Continue
            }
            FramedEvent::End => {
                self.transition(SessionState::Completed);
                self.handler.on_end();
                Step::Stop
            }
            FramedEvent::Error(message) => {
                self.fail(&message);
                Step::Stop
            }
            FramedEvent::Unrecognized => {
                debug!(session = %self.id, line, "ignoring unrecognized line");
                Step::Continue
            }
        }
    }

    /// End-of-body without a terminal event: flush the decode and framing
    /// buffers, then report truncation if the producer never signalled
    /// completion.
    fn finish_eof(&mut self) {
        let tail = self.decoder.finish();
        for line in self.framer.push(&tail) {
            if let Step::Stop = self.dispatch_line(&line) {
                return;
            }
        }
        if let Some(line) = self.framer.flush() {
            if let Step::Stop = self.dispatch_line(&line) {
                return;
            }
        }
        if self.token.is_cancelled() {
            self.transition(SessionState::Cancelled);
            return;
        }
        warn!(session = %self.id, "body ended without a terminal event");
        self.fail(&StreamError::Truncated.to_string());
    }

    fn fail(&mut self, message: &str) {
        self.transition(SessionState::Failed);
        self.handler.on_error(message);
    }

    fn transition(&mut self, next: SessionState) {
        if next.is_terminal() {
            info!(session = %self.id, from = ?self.state, to = ?next, "session finished");
        } else {
            debug!(session = %self.id, from = ?self.state, to = ?next, "session transition");
        }
        self.state = next;
    }
}
