//! Normalization of noisy remove/add interleavings in hunk bodies.

use crate::core::{DiffLine, LineKind};

/// Collapse adjacent removed/added pairs that carry identical content.
///
/// Unified diffs sometimes render a pure content move as an interleaved
/// remove/add of the same lines. Each removed line immediately followed
/// by an added line with byte-identical content becomes a single
/// unchanged line. When at least one pair collapsed and an added line
/// remains strictly before the final line, the leading added marker is
/// shifted to the line just after the last added one, grouping the
/// insertion at the end of the displayed hunk.
///
/// Inputs shorter than 3 lines are returned unchanged. Applying the pass
/// twice yields the same result as applying it once.
pub fn normalize(lines: Vec<DiffLine>) -> Vec<DiffLine> {
    if lines.len() < 3 {
        return lines;
    }

    let mut out = lines;
    let mut collapsed = false;
    let mut off = 1;
    while off < out.len() {
        if out[off - 1].kind == LineKind::Removed
            && out[off].kind == LineKind::Added
            && out[off - 1].content == out[off].content
        {
            out.remove(off);
            out[off - 1].kind = LineKind::Context;
            collapsed = true;
            continue;
        }
        off += 1;
    }

    if collapsed {
        let last = out.len() - 1;
        let first_add = out.iter().position(|l| l.kind == LineKind::Added);
        let last_add = out.iter().rposition(|l| l.kind == LineKind::Added);
        if let (Some(first_add), Some(last_add)) = (first_add, last_add) {
            if first_add != last && last_add != last {
                out[first_add].kind = LineKind::Context;
                out[last_add + 1].kind = LineKind::Added;
            }
        }
    }

    out
}
