//! Cancellation support for streaming sessions
//!
//! Allows interrupting an in-flight generation request.

use tokio_util::sync::CancellationToken;

/// Handle for cancelling one streaming session, returned by `start_stream`
/// and owned by the caller.
///
/// Cancellation is cooperative: the session stops at its next suspension
/// point and produces no further callbacks. Calling `cancel` after the
/// session reached a terminal state is a no-op.
#[derive(Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub(crate) fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token consulted by the session's read loop.
    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_idempotent() {
        let handle = CancelHandle::new();
        assert!(!handle.is_cancelled());

        handle.cancel();
        assert!(handle.is_cancelled());

        // Second cancel has no further effect
        handle.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let handle = CancelHandle::new();
        let other = handle.clone();

        handle.cancel();
        assert!(other.is_cancelled());
    }
}
