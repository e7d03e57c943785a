//! Line-oriented cursor over captured command output.

/// A restartable single-pass reader over a text buffer.
///
/// Yields one terminator-stripped line per call and remembers where the
/// most recently returned line started, so exactly one read can be
/// undone with [`rollback`](LineCursor::rollback). Handles `\n` and
/// `\r\n` terminators, mixed freely within one buffer.
#[derive(Debug)]
pub struct LineCursor {
    text: String,
    off: usize,
    prev_off: usize,
}

impl LineCursor {
    /// Create a cursor over the full captured output of a command.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            off: 0,
            prev_off: 0,
        }
    }

    /// Return the next line with its terminator stripped, or `None` when
    /// the buffer is exhausted.
    pub fn next_line(&mut self) -> Option<&str> {
        let bytes = self.text.as_bytes();
        let len = bytes.len();
        if self.off == len {
            return None;
        }

        let start = self.off;
        let mut end = start;
        while end < len && bytes[end] != b'\n' && bytes[end] != b'\r' {
            end += 1;
        }
        let next = match bytes.get(end) {
            Some(&b'\r') if bytes.get(end + 1) == Some(&b'\n') => end + 2,
            Some(_) => end + 1,
            None => end,
        };

        self.prev_off = start;
        self.off = next;
        Some(&self.text[start..end])
    }

    /// Un-read the line most recently returned.
    ///
    /// Only one level is supported: calling this twice without an
    /// intervening successful read re-points to the same line start.
    pub fn rollback(&mut self) {
        self.off = self.prev_off;
    }
}
