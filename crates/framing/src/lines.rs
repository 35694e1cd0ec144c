/// Buffers input and emits a line whenever a newline is encountered.
///
/// The Videohub protocol terminates every line with `\n`; some firmware
/// revisions emit `\r\n`, so a `\r` immediately before the delimiter is
/// stripped. The trailing partial line is carried across `feed` calls, which
/// is the whole point: TCP delivers the stream in arbitrary chunks and a
/// header line may well arrive split down the middle.
pub struct LineFramer {
    buffer: Vec<u8>,
    overflow_resets: u64,
}

/// Ceiling on a buffered partial line. The protocol does not bound line
/// length, but a peer that streams megabytes without a newline is not a
/// Videohub; drop the garbage and start over rather than grow forever.
pub const MAX_PENDING_LINE: usize = 64 * 1024;

impl LineFramer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(256),
            overflow_resets: 0,
        }
    }

    /// Ingest a chunk and return any complete lines found, without their
    /// terminating newline. Bytes are never lost or duplicated: whatever
    /// does not end in `\n` stays buffered for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut out = Vec::new();

        for &b in chunk {
            if b == b'\n' {
                if self.buffer.last() == Some(&b'\r') {
                    self.buffer.pop();
                }
                out.push(String::from_utf8_lossy(&self.buffer).into_owned());
                self.buffer.clear();
            } else {
                self.buffer.push(b);
                if self.buffer.len() > MAX_PENDING_LINE {
                    self.buffer.clear();
                    self.overflow_resets = self.overflow_resets.saturating_add(1);
                }
            }
        }

        out
    }

    /// Discard any buffered partial line. Called on disconnect; the device
    /// re-announces full state after reconnection, so the loss is harmless.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Times the pending-line ceiling was exceeded and the buffer dropped.
    pub fn overflow_resets(&self) -> u64 {
        self.overflow_resets
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_lines() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"Hello\nWorld\n");
        assert_eq!(lines, vec!["Hello", "World"]);
    }

    #[test]
    fn test_partial_line_carried_over() {
        let mut framer = LineFramer::new();
        assert!(framer.feed(b"VIDEO OUT").is_empty());
        let lines = framer.feed(b"PUT ROUTING:\n");
        assert_eq!(lines, vec!["VIDEO OUTPUT ROUTING:"]);
    }

    #[test]
    fn test_empty_lines_preserved() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"0 3\n\n");
        assert_eq!(lines, vec!["0 3", ""]);
    }

    #[test]
    fn test_crlf_stripped() {
        let mut framer = LineFramer::new();
        let lines = framer.feed(b"ACK\r\n");
        assert_eq!(lines, vec!["ACK"]);
    }

    #[test]
    fn test_chunk_with_no_newline_emits_nothing() {
        let mut framer = LineFramer::new();
        assert!(framer.feed(b"PING").is_empty());
        assert!(framer.feed(b"").is_empty());
    }

    #[test]
    fn test_reset_drops_partial() {
        let mut framer = LineFramer::new();
        framer.feed(b"half a li");
        framer.reset();
        let lines = framer.feed(b"ne\n");
        assert_eq!(lines, vec!["ne"]);
    }

    #[test]
    fn test_overflow_guard() {
        let mut framer = LineFramer::new();
        let big = vec![b'x'; MAX_PENDING_LINE + 10];
        framer.feed(&big);
        assert_eq!(framer.overflow_resets(), 1);
        // Stream recovers once the peer sends a newline again.
        let lines = framer.feed(b"ok\n");
        assert!(lines[0].ends_with("ok"));
    }

    #[test]
    fn test_no_bytes_lost_across_every_split() {
        let payload = b"INPUT LABELS:\n0 Camera 1\n\n";
        for split in 0..=payload.len() {
            let mut framer = LineFramer::new();
            let mut lines = framer.feed(&payload[..split]);
            lines.extend(framer.feed(&payload[split..]));
            assert_eq!(
                lines,
                vec!["INPUT LABELS:", "0 Camera 1", ""],
                "split at {}",
                split
            );
        }
    }
}
