//! Parser for plain-format `git log` output.

use crate::core::LineCursor;

// Label widths fixed by the log's plain formatting.
const COMMIT_PREFIX: usize = 7; // "commit "
const AUTHOR_PREFIX: usize = 8; // "Author: "
const DATE_PREFIX: usize = 6; // "Date:" and one column of its padding
const MESSAGE_INDENT: usize = 4;

/// One commit from a log listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full commit hash.
    pub hash: String,
    /// Author as printed by the log (`Name <email>`).
    pub author: Option<String>,
    /// Commit date as printed by the log.
    pub date: Option<String>,
    /// De-indented, trimmed commit message. Empty when the record had no
    /// body.
    pub message: String,
}

/// Streaming parser over one captured `git log` invocation.
///
/// Records are returned one at a time in the order the log printed them.
/// An early `None` can mean malformed input rather than true exhaustion
/// (a merge commit's `Merge:` line breaks the fixed record shape, for
/// example), so callers should treat the stream as possibly partial.
#[derive(Debug)]
pub struct CommitLogParser {
    cursor: LineCursor,
}

impl CommitLogParser {
    /// Create a parser over captured `git log` output.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            cursor: LineCursor::new(text),
        }
    }

    /// Parse the next commit record, or `None` at end of input.
    pub fn next_commit(&mut self) -> Option<CommitRecord> {
        let mut header = self.cursor.next_line()?.to_string();
        while header.is_empty() {
            header = self.cursor.next_line()?.to_string();
        }
        let hash = header.get(COMMIT_PREFIX..).unwrap_or("").to_string();

        let author = self
            .cursor
            .next_line()
            .and_then(|l| l.get(AUTHOR_PREFIX..))
            .map(str::to_string);
        let date = self
            .cursor
            .next_line()
            .and_then(|l| l.get(DATE_PREFIX..))
            .map(|d| d.trim().to_string());

        // Exactly one blank line separates the header from the message
        // body; anything else ends the stream.
        if let Some(separator) = self.cursor.next_line() {
            if !separator.trim().is_empty() {
                return None;
            }
        }

        let mut message = String::new();
        while let Some(line) = self.cursor.next_line() {
            if line.is_empty() {
                break;
            }
            message.push_str(line.get(MESSAGE_INDENT..).unwrap_or(""));
            message.push('\n');
        }
        let message = message.trim().to_string();

        Some(CommitRecord {
            hash,
            author,
            date,
            message,
        })
    }
}

impl Iterator for CommitLogParser {
    type Item = CommitRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_commit()
    }
}
