//! stepdocs - turn a git history into linked step documentation.
//!
//! Parses the textual output of `git log` and `git show`, renders each
//! step-tagged commit (`[1.2] Title`) as a markdown page, and threads
//! the pages together with previous/next links and a sidebar.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use stepdocs::prelude::*;
//!
//! let repo = RepoRoot::discover(std::path::Path::new("."))?;
//! let log = stepdocs::core::log_all(&repo)?;
//! let commits: Vec<_> = CommitLogParser::new(log).collect();
//! ```

#![deny(missing_docs)]

pub mod core;
pub mod metrics;
pub mod pages;
pub mod prelude;
