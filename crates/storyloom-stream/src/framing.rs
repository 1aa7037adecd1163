//! Line framing over decoded text
//!
//! Buffers undelivered trailing text and yields complete lines in the
//! order their terminators arrived.

/// Reassembles newline-terminated lines from arbitrarily-chunked text.
pub struct LineFramer {
    /// Trailing text not yet terminated by a newline.
    buffer: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Append decoded text and return every newly completed line.
    ///
    /// A single call may yield zero, one, or many lines. A trailing `\r`
    /// is stripped so CRLF transports frame identically.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.buffer.push_str(text);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let mut line: String = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            lines.push(line);
        }
        lines
    }

    /// Residual partial line at end-of-stream, if any.
    pub fn flush(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_push_many_lines() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push("a\nb\nc\n"), vec!["a", "b", "c"]);
        assert_eq!(framer.flush(), None);
    }

    #[test]
    fn test_partial_line_retained() {
        let mut framer = LineFramer::new();
        assert!(framer.push("data: {\"ty").is_empty());
        assert_eq!(framer.push("pe\":\"end\"}\n"), vec!["data: {\"type\":\"end\"}"]);
    }

    #[test]
    fn test_push_spanning_terminator() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push("one\ntw"), vec!["one"]);
        assert_eq!(framer.push("o\n"), vec!["two"]);
    }

    #[test]
    fn test_crlf_stripped() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push("a\r\nb\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_flush_returns_residue() {
        let mut framer = LineFramer::new();
        framer.push("no terminator");
        assert_eq!(framer.flush(), Some("no terminator".to_string()));
        assert_eq!(framer.flush(), None);
    }

    #[test]
    fn test_empty_lines_preserved() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push("a\n\nb\n"), vec!["a", "", "b"]);
    }
}
