//! Incremental UTF-8 decoding of transport fragments
//!
//! Fragment boundaries are arbitrary and may split a multi-byte character;
//! the incomplete tail is buffered and prepended to the next fragment.

/// Stateful byte-to-text decoder for one session.
pub struct Utf8Decoder {
    /// Bytes of an incomplete character carried over from the last fragment.
    partial: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self {
            partial: Vec::new(),
        }
    }

    /// Decode one fragment, returning every complete character.
    ///
    /// Invalid byte sequences inside the fragment decode to the replacement
    /// character; an incomplete sequence at the tail is held back until the
    /// next fragment completes it.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let combined: Vec<u8>;
        let mut rest: &[u8] = if self.partial.is_empty() {
            bytes
        } else {
            let mut joined = std::mem::take(&mut self.partial);
            joined.extend_from_slice(bytes);
            combined = joined;
            &combined
        };

        let mut out = String::new();
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            // Character split across the fragment boundary
                            self.partial = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush at end-of-input. A truncated trailing sequence decodes lossily
    /// rather than erroring; the truncation itself is the transport's
    /// failure to report, not the decoder's.
    pub fn finish(&mut self) -> String {
        if self.partial.is_empty() {
            String::new()
        } else {
            let tail = std::mem::take(&mut self.partial);
            String::from_utf8_lossy(&tail).into_owned()
        }
    }
}

impl Default for Utf8Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"hello"), "hello");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_multibyte_split_across_fragments() {
        // "é" is 0xC3 0xA9
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"h\xC3"), "h");
        assert_eq!(decoder.decode(b"\xA9llo"), "éllo");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_four_byte_char_split_three_ways() {
        // "🎭" is 0xF0 0x9F 0x8E 0xAD
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"\xF0"), "");
        assert_eq!(decoder.decode(b"\x9F\x8E"), "");
        assert_eq!(decoder.decode(b"\xAD!"), "🎭!");
    }

    #[test]
    fn test_truncated_tail_decodes_lossily() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"ok\xE5\x89"), "ok");
        assert_eq!(decoder.finish(), "\u{FFFD}");
    }

    #[test]
    fn test_invalid_byte_mid_stream() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"a\xFFb"), "a\u{FFFD}b");
        // Decoder keeps working afterwards
        assert_eq!(decoder.decode(b"c"), "c");
    }

    #[test]
    fn test_empty_fragment() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b""), "");
        assert_eq!(decoder.decode(b"\xE4\xB8"), "");
        assert_eq!(decoder.decode(b""), "");
        assert_eq!(decoder.decode(b"\xAD"), "中");
    }
}
