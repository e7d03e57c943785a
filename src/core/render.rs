//! Pure rendering helpers over hunk body lines.

use crate::core::{DiffLine, LineKind};

/// Reconstruct the canonical `+`/`-`/space hunk body text, one line per
/// entry, newline-terminated.
pub fn join(lines: &[DiffLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push(match line.kind {
            LineKind::Added => '+',
            LineKind::Removed => '-',
            LineKind::Context => ' ',
        });
        out.push_str(&line.content);
        out.push('\n');
    }
    out
}

/// Reconstruct the post-change content of a hunk: added and unchanged
/// lines only, newline-terminated.
pub fn result(lines: &[DiffLine]) -> String {
    let mut out = String::new();
    for line in lines {
        if line.kind == LineKind::Removed {
            continue;
        }
        out.push_str(&line.content);
        out.push('\n');
    }
    out
}
