/// An incremental UTF-8 decoder for a byte stream read in chunks.
///
/// The response has no length framing, so it arrives as arbitrarily
/// sized reads and a multi-byte character can land half in one read and
/// half in the next. The decoder keeps the trailing incomplete sequence
/// of each chunk and prepends it to the following one, so the split
/// never shows up in the output. Invalid sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    pending: Vec<u8>,
}

impl StreamDecoder {
    /// Create a decoder with no pending bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, appending the text to `out`.
    pub fn feed(&mut self, chunk: &[u8], out: &mut String) {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(std::str::from_utf8(&rest[..valid]).unwrap());

                    match e.error_len() {
                        // invalid bytes in the middle of the chunk
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &rest[valid + len..];
                        }
                        // incomplete sequence at the end, wait for the next chunk
                        None => {
                            self.pending = rest[valid..].to_vec();
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Flush the decoder at end of stream.
    ///
    /// A sequence still incomplete when the stream closes was truncated
    /// by the server and decodes to a single U+FFFD.
    pub fn finish(self, out: &mut String) {
        if !self.pending.is_empty() {
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }
}
