//! Navigation pass: orders generated pages, links neighbors, writes the
//! sidebar.

use std::fs;
use std::io;
use std::path::Path;

use crate::core::StepPath;
use crate::pages::{Manifest, MarkdownBuilder, NEXT_MARKER, PREV_MARKER};

/// A generated page located on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFile {
    /// Hierarchical number parsed from the file name.
    pub path: StepPath,
    /// File name within the output directory.
    pub file: String,
}

/// List step pages in the output directory, ordered by step number.
///
/// Only flat `<number>__<title>.md` names count; everything else
/// (the sidebar, the manifest directory) is ignored.
#[must_use = "this returns a Result that should be checked"]
pub fn list_steps(dir: &Path) -> io::Result<Vec<StepFile>> {
    let mut steps = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        let path = match StepPath::from_file_name(&name) {
            Some(path) => path,
            None => continue,
        };
        steps.push(StepFile { path, file: name });
    }
    steps.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(steps)
}

/// Patch the prev/next markers in every page and write `_Sidebar.md`.
///
/// Display names come from the manifest; pages without a manifest entry
/// fall back to their file name.
#[must_use = "this returns a Result that should be checked"]
pub fn write_navigation(dir: &Path, manifest: &Manifest) -> io::Result<()> {
    let steps = list_steps(dir)?;

    let mut sidebar = MarkdownBuilder::new();
    let mut last_group: u32 = 1;

    for (i, step) in steps.iter().enumerate() {
        let name = manifest.name_for(&step.file).unwrap_or(&step.file);

        let group = step.path.segments().first().copied().unwrap_or(0);
        if group != last_group {
            sidebar.endsection();
        }
        last_group = group;

        sidebar
            .bullet(step.path.depth().saturating_sub(1))
            .link(name, page_link(&step.file))
            .newline();

        let prev = if i > 0 { steps.get(i - 1) } else { None };
        let next = steps.get(i + 1);
        patch_markers(dir, &step.file, prev, next, manifest)?;
    }

    fs::write(dir.join("_Sidebar.md"), sidebar.as_str())?;
    Ok(())
}

/// Link target for a page: its file name without the `.md` suffix.
fn page_link(file: &str) -> &str {
    file.strip_suffix(".md").unwrap_or(file)
}

/// Replace the prev/next placeholders of one page with neighbor links.
fn patch_markers(
    dir: &Path,
    file: &str,
    prev: Option<&StepFile>,
    next: Option<&StepFile>,
    manifest: &Manifest,
) -> io::Result<()> {
    let page_path = dir.join(file);
    let contents = fs::read_to_string(&page_path)?;

    let prev_text = prev
        .map(|s| neighbor_link("Previous", s, manifest))
        .unwrap_or_default();
    let next_text = next
        .map(|s| neighbor_link("Next", s, manifest))
        .unwrap_or_default();

    let contents = contents.replacen(PREV_MARKER, &prev_text, 1);
    let contents = contents.replacen(NEXT_MARKER, &next_text, 1);
    fs::write(page_path, contents)?;
    Ok(())
}

/// `Previous : [name](link)` / `Next : [name](link)` text for a
/// neighboring step.
fn neighbor_link(label: &str, step: &StepFile, manifest: &Manifest) -> String {
    let name = manifest.name_for(&step.file).unwrap_or(&step.file);
    format!("{} : [{}]({})", label, name, page_link(&step.file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::StepEntry;
    use tempfile::TempDir;

    fn write_page(dir: &Path, file: &str) {
        let body = format!("{}\n\n---\ncontent\n\n---\n{}\n", PREV_MARKER, NEXT_MARKER);
        fs::write(dir.join(file), body).unwrap();
    }

    fn manifest_with(dir: &Path, entries: &[(&str, &str)]) -> Manifest {
        let mut manifest = Manifest::open(dir).unwrap();
        for (file, name) in entries {
            manifest.record(StepEntry {
                file: file.to_string(),
                name: name.to_string(),
                commit: "abc".to_string(),
            });
        }
        manifest
    }

    #[test]
    fn list_steps_orders_and_filters() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "2__Second.md");
        write_page(dir.path(), "1__First.md");
        write_page(dir.path(), "1.1__Nested.md");
        fs::write(dir.path().join("_Sidebar.md"), "ignored").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let steps = list_steps(dir.path()).unwrap();
        let files: Vec<_> = steps.iter().map(|s| s.file.as_str()).collect();
        assert_eq!(files, vec!["1__First.md", "1.1__Nested.md", "2__Second.md"]);
    }

    #[test]
    fn navigation_patches_markers() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "1__First.md");
        write_page(dir.path(), "2__Second.md");
        let manifest = manifest_with(
            dir.path(),
            &[("1__First.md", "1 First"), ("2__Second.md", "2 Second")],
        );

        write_navigation(dir.path(), &manifest).unwrap();

        let first = fs::read_to_string(dir.path().join("1__First.md")).unwrap();
        assert!(!first.contains(PREV_MARKER));
        assert!(!first.contains(NEXT_MARKER));
        assert!(first.contains("Next : [2 Second](2__Second)"));

        let second = fs::read_to_string(dir.path().join("2__Second.md")).unwrap();
        assert!(second.contains("Previous : [1 First](1__First)"));
        assert!(!second.contains(NEXT_MARKER));
    }

    #[test]
    fn sidebar_lists_steps_in_order() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "1__First.md");
        write_page(dir.path(), "1.1__Nested.md");
        write_page(dir.path(), "2__Second.md");
        let manifest = manifest_with(
            dir.path(),
            &[
                ("1__First.md", "1 First"),
                ("1.1__Nested.md", "1.1 Nested"),
                ("2__Second.md", "2 Second"),
            ],
        );

        write_navigation(dir.path(), &manifest).unwrap();

        let sidebar = fs::read_to_string(dir.path().join("_Sidebar.md")).unwrap();
        assert!(sidebar.contains("+ [1 First](1__First)"));
        assert!(sidebar.contains("  + [1.1 Nested](1.1__Nested)"));
        assert!(sidebar.contains("+ [2 Second](2__Second)"));

        // Top-level groups are separated by a rule.
        let first_pos = sidebar.find("1 First").unwrap();
        let rule_pos = sidebar.find("\n---\n").unwrap();
        let second_pos = sidebar.find("2 Second").unwrap();
        assert!(first_pos < rule_pos && rule_pos < second_pos);
    }

    #[test]
    fn unknown_pages_fall_back_to_file_name() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "1__Only.md");
        let manifest = Manifest::open(dir.path()).unwrap();

        write_navigation(dir.path(), &manifest).unwrap();

        let sidebar = fs::read_to_string(dir.path().join("_Sidebar.md")).unwrap();
        assert!(sidebar.contains("+ [1__Only.md](1__Only)"));
    }
}
