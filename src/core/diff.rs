//! Parser for unified diff output from `git show` and `git diff`.

use thiserror::Error;
use tracing::debug;

use crate::core::LineCursor;

/// Marker introducing one file's diff within a multi-file stream.
const FILE_MARKER: &str = "diff";
/// Width of the `--- `/`+++ ` prefix on path lines.
const PATH_PREFIX: usize = 4;

/// Errors from diff parsing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiffError {
    /// Hunk header did not match the `@@ -s,l +s,l @@` shape. The
    /// producing tool occasionally emits inconsistent output mid-stream,
    /// so re-running the command and re-parsing may succeed.
    #[error("malformed hunk header {line:?}; the producing command sometimes emits inconsistent output, re-running it may help")]
    MalformedHunkHeader {
        /// The offending line.
        line: String,
    },
}

/// Classification of one hunk body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Line present only in the result.
    Added,
    /// Line present only in the source.
    Removed,
    /// Unchanged line shown for positional reference.
    Context,
}

/// One line of a hunk body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    /// How the line is classified in the diff.
    pub kind: LineKind,
    /// Line content with the marker column stripped.
    pub content: String,
}

impl DiffLine {
    /// Create a hunk body line.
    pub fn new(kind: LineKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

/// A `start[,count]` descriptor from a hunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
    /// First line of the region, as printed by the tool.
    pub start: u32,
    /// Number of lines in the region.
    pub count: u32,
}

/// One file's change within a diff stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// The `diff --git a/<path> b/<path>` marker line.
    pub command_line: String,
    /// The `index <old>..<new>` line, when present.
    pub index_line: Option<String>,
    /// The `new file mode ...` line, when this diff created the file.
    pub new_file: Option<String>,
    /// Source path as printed (`a/` prefix intact).
    pub source_path: String,
    /// Result path as printed (`b/` prefix intact).
    pub result_path: String,
    /// Source line range of the leading hunk, when the diff carries one.
    pub source_range: Option<HunkRange>,
    /// Result line range of the leading hunk, when the diff carries one.
    pub result_range: Option<HunkRange>,
    /// Hunk body lines. Empty for zero-hunk records, e.g. a newly
    /// created empty file or a mode-only change.
    pub lines: Vec<DiffLine>,
}

/// Streaming parser over one captured `git show` or `git diff`
/// invocation.
///
/// Returns one [`FileDiff`] per file in the stream, in order. The parser
/// never invokes the tool itself; it only consumes captured text.
#[derive(Debug)]
pub struct DiffParser {
    cursor: LineCursor,
    show_mode: bool,
}

impl DiffParser {
    /// Parser for `git diff` output, which starts at the first file
    /// marker.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            cursor: LineCursor::new(text),
            show_mode: false,
        }
    }

    /// Parser for `git show` output, which precedes the first file
    /// marker with commit metadata to skip.
    pub fn new_show(text: impl Into<String>) -> Self {
        Self {
            cursor: LineCursor::new(text),
            show_mode: true,
        }
    }

    /// Parse the next per-file record, or `Ok(None)` when the input is
    /// exhausted.
    pub fn next_file(&mut self) -> Result<Option<FileDiff>, DiffError> {
        let mut command_line = match self.cursor.next_line() {
            Some(line) => line.to_string(),
            None => return Ok(None),
        };
        if self.show_mode {
            while !command_line.starts_with(FILE_MARKER) {
                match self.cursor.next_line() {
                    Some(line) => command_line = line.to_string(),
                    None => return Ok(None),
                }
            }
        }
        if !command_line.starts_with(FILE_MARKER) {
            return Ok(None);
        }

        let mut index_line = self.cursor.next_line().map(str::to_string);
        let mut new_file = None;
        if index_line.as_deref().is_some_and(|l| l.starts_with("new")) {
            new_file = index_line.take();
            index_line = self.cursor.next_line().map(str::to_string);
        }

        let source_path = match self.cursor.next_line() {
            Some(line) => strip_path_prefix(line).to_string(),
            None => {
                // Diff of a file with no content on one side: no `--- `
                // line follows, so the paths come from the marker line's
                // trailing tokens.
                let mut tokens = command_line.split(' ').rev();
                let result_path = tokens.next().unwrap_or("").to_string();
                let source_path = tokens.next().unwrap_or("").to_string();
                return Ok(Some(FileDiff {
                    command_line,
                    index_line,
                    new_file,
                    source_path,
                    result_path,
                    source_range: None,
                    result_range: None,
                    lines: Vec::new(),
                }));
            }
        };
        let result_path = self
            .cursor
            .next_line()
            .map(|l| strip_path_prefix(l).to_string())
            .unwrap_or_default();

        let header = match self.cursor.next_line() {
            Some(line) if !line.is_empty() => line.to_string(),
            _ => {
                // No hunk follows (mode-only change).
                return Ok(Some(FileDiff {
                    command_line,
                    index_line,
                    new_file,
                    source_path,
                    result_path,
                    source_range: None,
                    result_range: None,
                    lines: Vec::new(),
                }));
            }
        };
        if !header.starts_with("@@") {
            let has_second_marker = header.get(3..).map(|t| t.contains("@@")).unwrap_or(false);
            debug!(line = %header, has_second_marker, "unexpected hunk header");
            if !header.ends_with("@@") && has_second_marker {
                return Err(DiffError::MalformedHunkHeader { line: header });
            }
            return Ok(None);
        }

        let (source_range, result_range) =
            parse_hunk_ranges(&header).ok_or(DiffError::MalformedHunkHeader { line: header })?;

        let mut lines = Vec::new();
        loop {
            let line = match self.cursor.next_line() {
                Some(line) if !line.is_empty() => line.to_string(),
                _ => break,
            };
            if line.starts_with(FILE_MARKER) {
                // Belongs to the next file's record.
                self.cursor.rollback();
                break;
            }
            let mut chars = line.chars();
            let kind = match chars.next() {
                Some('+') => LineKind::Added,
                Some('-') => LineKind::Removed,
                // No-newline-at-end-of-file marker, not a content line.
                Some('\\') => continue,
                _ => LineKind::Context,
            };
            lines.push(DiffLine::new(kind, chars.as_str()));
        }

        Ok(Some(FileDiff {
            command_line,
            index_line,
            new_file,
            source_path,
            result_path,
            source_range: Some(source_range),
            result_range: Some(result_range),
            lines,
        }))
    }
}

impl Iterator for DiffParser {
    type Item = Result<FileDiff, DiffError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_file().transpose()
    }
}

/// Strip the `--- `/`+++ ` prefix from a path line.
fn strip_path_prefix(line: &str) -> &str {
    line.get(PATH_PREFIX..).unwrap_or("")
}

/// Parse `@@ -s[,l] +s[,l] @@ ...` into source and result ranges.
///
/// An absent source count defaults to 0; an absent result count defaults
/// to the result start (a single-line result hunk).
fn parse_hunk_ranges(header: &str) -> Option<(HunkRange, HunkRange)> {
    let body = header.get(3..header.len().saturating_sub(3))?;
    let mut descriptors = body.split(' ');
    let source = descriptors.next()?;
    let result = descriptors.next()?;

    let (src_start, src_count) = split_range(source.strip_prefix('-').unwrap_or(source));
    let (res_start, res_count) = split_range(result.strip_prefix('+').unwrap_or(result));
    let src_start: u32 = src_start.parse().ok()?;
    let res_start: u32 = res_start.parse().ok()?;

    Some((
        HunkRange {
            start: src_start,
            count: src_count.and_then(|c| c.parse().ok()).unwrap_or(0),
        },
        HunkRange {
            start: res_start,
            count: res_count.and_then(|c| c.parse().ok()).unwrap_or(res_start),
        },
    ))
}

/// Split a `start[,count]` descriptor.
fn split_range(descriptor: &str) -> (&str, Option<&str>) {
    match descriptor.split_once(',') {
        Some((start, count)) => (start, Some(count)),
        None => (descriptor, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_hunk() {
        let diff = "diff --git a/src/main.rs b/src/main.rs\nindex abc123..def456 100644\n--- a/src/main.rs\n+++ b/src/main.rs\n@@ -1,2 +1,3 @@\n context\n-old\n+new\n+added\n";
        let mut parser = DiffParser::new(diff);

        let file = parser.next_file().unwrap().unwrap();
        assert_eq!(file.command_line, "diff --git a/src/main.rs b/src/main.rs");
        assert_eq!(
            file.index_line.as_deref(),
            Some("index abc123..def456 100644")
        );
        assert_eq!(file.new_file, None);
        assert_eq!(file.source_path, "a/src/main.rs");
        assert_eq!(file.result_path, "b/src/main.rs");
        assert_eq!(file.source_range, Some(HunkRange { start: 1, count: 2 }));
        assert_eq!(file.result_range, Some(HunkRange { start: 1, count: 3 }));
        assert_eq!(
            file.lines,
            vec![
                DiffLine::new(LineKind::Context, "context"),
                DiffLine::new(LineKind::Removed, "old"),
                DiffLine::new(LineKind::Added, "new"),
                DiffLine::new(LineKind::Added, "added"),
            ]
        );

        assert!(parser.next_file().unwrap().is_none());
    }

    #[test]
    fn parse_new_file() {
        let diff = "diff --git a/new.txt b/new.txt\nnew file mode 100644\nindex 0000000..abc123\n--- /dev/null\n+++ b/new.txt\n@@ -0,0 +1,2 @@\n+line 1\n+line 2\n";
        let file = DiffParser::new(diff).next_file().unwrap().unwrap();

        assert_eq!(file.new_file.as_deref(), Some("new file mode 100644"));
        assert_eq!(file.index_line.as_deref(), Some("index 0000000..abc123"));
        assert_eq!(file.source_path, "/dev/null");
        assert_eq!(file.result_path, "b/new.txt");
        assert_eq!(file.lines.len(), 2);
        assert!(file.lines.iter().all(|l| l.kind == LineKind::Added));
    }

    #[test]
    fn parse_empty_file_creation() {
        // No `--- ` line at all: paths come from the marker line.
        let diff =
            "diff --git a/empty.txt b/empty.txt\nnew file mode 100644\nindex 0000000..e69de29\n";
        let file = DiffParser::new(diff).next_file().unwrap().unwrap();

        assert_eq!(file.new_file.as_deref(), Some("new file mode 100644"));
        assert_eq!(file.source_path, "a/empty.txt");
        assert_eq!(file.result_path, "b/empty.txt");
        assert_eq!(file.source_range, None);
        assert_eq!(file.result_range, None);
        assert!(file.lines.is_empty());
    }

    #[test]
    fn parse_show_output_skips_preamble() {
        let show = "commit abc123\nAuthor: A <a@x.com>\nDate:   Mon Jan 1\n\n    [1] step\n\ndiff --git a/f.txt b/f.txt\nindex 111..222 100644\n--- a/f.txt\n+++ b/f.txt\n@@ -1 +1 @@\n-x\n+y\n";
        let mut parser = DiffParser::new_show(show);

        let file = parser.next_file().unwrap().unwrap();
        assert_eq!(file.source_path, "a/f.txt");
        // Counts absent from the header: 0 on the source side, the
        // start line on the result side.
        assert_eq!(file.source_range, Some(HunkRange { start: 1, count: 0 }));
        assert_eq!(file.result_range, Some(HunkRange { start: 1, count: 1 }));
        assert_eq!(file.lines.len(), 2);

        assert!(parser.next_file().unwrap().is_none());
    }

    #[test]
    fn parse_multiple_files() {
        let diff = "diff --git a/a.rs b/a.rs\nindex 111..222 100644\n--- a/a.rs\n+++ b/a.rs\n@@ -1 +1 @@\n-old\n+new\ndiff --git a/b.rs b/b.rs\nindex 333..444 100644\n--- a/b.rs\n+++ b/b.rs\n@@ -1 +1,2 @@\n existing\n+added\n";
        let mut parser = DiffParser::new(diff);

        let first = parser.next_file().unwrap().unwrap();
        assert_eq!(first.source_path, "a/a.rs");
        assert_eq!(first.lines.len(), 2);

        let second = parser.next_file().unwrap().unwrap();
        assert_eq!(second.source_path, "a/b.rs");
        assert_eq!(second.lines.len(), 2);

        assert!(parser.next_file().unwrap().is_none());
    }

    #[test]
    fn skips_no_newline_marker() {
        let diff = "diff --git a/f b/f\nindex 1..2 100644\n--- a/f\n+++ b/f\n@@ -1 +1 @@\n-old\n\\ No newline at end of file\n+new\n";
        let file = DiffParser::new(diff).next_file().unwrap().unwrap();

        assert_eq!(
            file.lines,
            vec![
                DiffLine::new(LineKind::Removed, "old"),
                DiffLine::new(LineKind::Added, "new"),
            ]
        );
    }

    #[test]
    fn hunk_header_with_function_context() {
        let diff = "diff --git a/f b/f\nindex 1..2 100644\n--- a/f\n+++ b/f\n@@ -10,3 +10,4 @@ fn main() {\n context\n+new\n";
        let file = DiffParser::new(diff).next_file().unwrap().unwrap();
        assert_eq!(file.source_range, Some(HunkRange { start: 10, count: 3 }));
        assert_eq!(file.result_range, Some(HunkRange { start: 10, count: 4 }));
    }

    #[test]
    fn missing_hunk_is_empty_record() {
        let diff = "diff --git a/f b/f\nindex 1..2 100644\n--- a/f\n+++ b/f\n";
        let file = DiffParser::new(diff).next_file().unwrap().unwrap();
        assert_eq!(file.source_path, "a/f");
        assert_eq!(file.result_path, "b/f");
        assert!(file.lines.is_empty());
    }

    #[test]
    fn garbled_header_with_interior_marker_is_fatal() {
        let diff = "diff --git a/f b/f\nindex 1..2 100644\n--- a/f\n+++ b/f\ngarbage @@ trailing\n";
        let err = DiffParser::new(diff).next_file().unwrap_err();
        assert!(matches!(err, DiffError::MalformedHunkHeader { .. }));
    }

    #[test]
    fn garbled_header_without_marker_ends_stream() {
        let diff = "diff --git a/f b/f\nindex 1..2 100644\n--- a/f\n+++ b/f\ngarbage line\n";
        assert!(DiffParser::new(diff).next_file().unwrap().is_none());
    }

    #[test]
    fn garbled_header_closed_by_marker_ends_stream() {
        let diff = "diff --git a/f b/f\nindex 1..2 100644\n--- a/f\n+++ b/f\ngarbage @@\n";
        assert!(DiffParser::new(diff).next_file().unwrap().is_none());
    }

    #[test]
    fn unparsable_range_is_fatal() {
        let diff = "diff --git a/f b/f\nindex 1..2 100644\n--- a/f\n+++ b/f\n@@ nonsense @@\n";
        let err = DiffParser::new(diff).next_file().unwrap_err();
        assert!(matches!(err, DiffError::MalformedHunkHeader { .. }));
    }

    #[test]
    fn empty_input() {
        assert!(DiffParser::new("").next_file().unwrap().is_none());
        assert!(DiffParser::new_show("").next_file().unwrap().is_none());
    }
}
