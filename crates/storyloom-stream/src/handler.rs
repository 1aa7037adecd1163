//! Consumer-side callbacks for one streaming session

/// Receives the output of one streaming session.
///
/// For a session that is not cancelled, exactly one of `on_end` /
/// `on_error` is invoked, exactly once, and no `on_chunk` call follows
/// it. A cancelled session receives no terminal callback at all; chunks
/// already delivered stand.
pub trait StreamHandler: Send {
    /// A piece of generated text, in arrival order.
    fn on_chunk(&mut self, text: &str);

    /// The producer completed the response.
    fn on_end(&mut self);

    /// The session failed. `message` describes the fatal condition.
    fn on_error(&mut self, message: &str);
}

/// Builds a handler out of three closures, mirroring the shape most call
/// sites want.
pub struct CallbackHandler<C, E, F>
where
    C: FnMut(&str) + Send,
    E: FnMut() + Send,
    F: FnMut(&str) + Send,
{
    on_chunk: C,
    on_end: E,
    on_error: F,
}

impl<C, E, F> CallbackHandler<C, E, F>
where
    C: FnMut(&str) + Send,
    E: FnMut() + Send,
    F: FnMut(&str) + Send,
{
    pub fn new(on_chunk: C, on_end: E, on_error: F) -> Self {
        Self {
            on_chunk,
            on_end,
            on_error,
        }
    }
}

impl<C, E, F> StreamHandler for CallbackHandler<C, E, F>
where
    C: FnMut(&str) + Send,
    E: FnMut() + Send,
    F: FnMut(&str) + Send,
{
    fn on_chunk(&mut self, text: &str) {
        (self.on_chunk)(text);
    }

    fn on_end(&mut self) {
        (self.on_end)();
    }

    fn on_error(&mut self, message: &str) {
        (self.on_error)(message);
    }
}
