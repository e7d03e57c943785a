//! Common re-exports for convenient importing.
//!
//! # Example
//!
//! ```rust,ignore
//! use stepdocs::prelude::*;
//! ```

pub use crate::core::{
    CommitLogParser, CommitRecord, DiffError, DiffLine, DiffParser, FileDiff, HunkRange, LineKind,
    RepoError, RepoRoot, StepPath,
};
pub use crate::pages::{Manifest, MarkdownBuilder, PageGenerator, RenderMode, StepEntry};
