//! Hierarchical step numbering for generated pages.

use std::fmt;

/// A hierarchical step number such as `1.2.3`.
///
/// Ordering is element-wise, with a shorter sequence sorting before any
/// sequence it prefixes: `[1] < [1,1] < [1,2] < [2]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepPath(Vec<u32>);

impl StepPath {
    /// Create a step path from its segments.
    pub fn new(segments: Vec<u32>) -> Self {
        Self(segments)
    }

    /// Parse the numeric prefix of a generated page name, everything
    /// before the `__` separator (`1.2__Title.md` parses as `[1, 2]`).
    /// `None` when the name has no separator or a non-numeric segment.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (prefix, _) = name.split_once("__")?;
        let segments = prefix
            .split('.')
            .map(|s| s.parse().ok())
            .collect::<Option<Vec<u32>>>()?;
        Some(Self(segments))
    }

    /// The path's segments, outermost first.
    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    /// Nesting depth (number of segments).
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for StepPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
