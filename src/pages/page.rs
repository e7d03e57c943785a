//! Rendering one commit into a step documentation page.

use regex::Regex;

use crate::core::{join, normalize, result, CommitRecord, FileDiff};
use crate::pages::MarkdownBuilder;

/// Placeholder patched with the previous-step link by the navigation
/// pass.
pub const PREV_MARKER: &str = "!!PREV_MARKER!!";
/// Placeholder patched with the next-step link by the navigation pass.
pub const NEXT_MARKER: &str = "!!NEXT_MARKER!!";

/// Generator tag linked from the page footer.
const APP_VERSION: &str = concat!("stepdocs-v", env!("CARGO_PKG_VERSION"));
const APP_URL: &str = "https://github.com/stepdocs/stepdocs";

/// Output flavor for generated pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RenderMode {
    /// GitHub-wiki pages: the page title comes from the file name.
    #[default]
    Wiki,
    /// Plain markdown: each page opens with an H1 title.
    Markdown,
}

/// A qualifying commit's derived page identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInfo {
    /// Display name, e.g. `1.2 Add parser`.
    pub name: String,
    /// Page file name, e.g. `1.2__Add-parser.md`.
    pub file: String,
}

/// Derive the page name and file name from a step-tagged message.
///
/// The first message line must look like `[1.2] Title`; the file name
/// replaces whitespace and dots in the title with `-` and drops `?`/`#`.
pub fn step_info(message: &str) -> Option<StepInfo> {
    let first = message.lines().next()?;
    let rest = first.strip_prefix('[')?;
    let (index, title) = rest.split_once(']')?;
    let title = title.trim();
    if index.is_empty() || title.is_empty() {
        return None;
    }

    let slug: String = title
        .chars()
        .filter(|c| !matches!(c, '?' | '#'))
        .map(|c| if c.is_whitespace() || c == '.' { '-' } else { c })
        .collect();

    Some(StepInfo {
        name: format!("{} {}", index, title),
        file: format!("{}__{}.md", index, slug),
    })
}

/// Renders qualifying commits into step pages.
///
/// The repository web URL, when known, is threaded through explicitly;
/// pages fall back to plain text without it.
#[derive(Debug)]
pub struct PageGenerator {
    origin: Option<String>,
    mode: RenderMode,
    step_tag: Regex,
}

impl PageGenerator {
    /// Create a generator for the given origin URL and page flavor.
    pub fn new(origin: Option<String>, mode: RenderMode) -> Self {
        Self {
            origin,
            mode,
            // A message line shaped like `[1.2.3] Title`.
            step_tag: Regex::new(r"(?m)^\[\d+(\.\d+)*\] .+").expect("valid step tag pattern"),
        }
    }

    /// Whether a commit message carries a step tag.
    pub fn is_step(&self, message: &str) -> bool {
        self.step_tag.is_match(message)
    }

    /// Render the full page for one commit and its parsed file diffs.
    ///
    /// The page carries unresolved prev/next placeholders; the
    /// navigation pass patches them once all pages exist.
    pub fn render_page(&self, commit: &CommitRecord, diffs: &[FileDiff]) -> String {
        let mut md = MarkdownBuilder::new();

        if self.mode == RenderMode::Markdown {
            if let Some(info) = step_info(&commit.message) {
                md.header(1, &info.name).newline();
            }
        }
        md.appendln(PREV_MARKER).endsection();

        // Message lines past the subject and its separator become
        // quoted notes.
        for line in commit.message.lines().skip(2) {
            md.quote(line);
        }

        for diff in diffs {
            self.render_file(&mut md, commit, diff);
        }

        md.endsection().appendln(NEXT_MARKER).endsection();

        if let Some(origin) = &self.origin {
            md.append("Commit Hash : ")
                .link(&commit.hash, &format!("{}/commit/{}", origin, commit.hash))
                .link("View files", &format!("{}/tree/{}", origin, commit.hash))
                .newline();
        }

        if let Some(author) = &commit.author {
            let username = author.split('<').next().unwrap_or("").trim();
            md.endsection()
                .append("*Docs by ")
                .link(username, &format!("https://github.com/{}", username))
                .append("* (generated by ")
                .link(&format!("*{}*", APP_VERSION), APP_URL)
                .append(")");
        }

        md.finish()
    }

    /// Render one file's section of the page.
    fn render_file(&self, md: &mut MarkdownBuilder, commit: &CommitRecord, diff: &FileDiff) {
        let file_name = display_path(&diff.result_path);

        if diff.lines.is_empty() {
            match &self.origin {
                Some(origin) => {
                    md.header(3, "Create empty file at ")
                        .code_link(
                            file_name,
                            &format!("{}/tree/{}/{}", origin, commit.hash, file_name),
                        )
                        .newline();
                }
                None => {
                    md.header(3, "Create empty file at `")
                        .append(file_name)
                        .appendln("`");
                }
            }
            return;
        }

        match &self.origin {
            Some(origin) => {
                md.header(3, "File: ")
                    .link(
                        file_name,
                        &format!("{}/tree/{}/{}", origin, commit.hash, file_name),
                    )
                    .newline();
            }
            None => {
                md.header(3, "File: ").appendln(file_name);
            }
        }

        if diff.new_file.is_some() {
            // A created file reads better as its final content than as a
            // wall of added lines.
            md.code_block(language_for(&diff.result_path))
                .append(result(&diff.lines))
                .end();
        } else {
            md.code_block("diff")
                .append(join(&normalize(diff.lines.clone())))
                .end();
        }
    }
}

/// Path as displayed on the page: the `a/`/`b/` marker prefix dropped.
fn display_path(path: &str) -> &str {
    path.get(2..).unwrap_or("")
}

/// Fence language for a file, from its extension.
fn language_for(path: &str) -> &str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "js" => "javascript",
        "ts" => "typescript",
        "sh" => "shell",
        "md" => "markdown",
        "rs" => "rust",
        "py" => "python",
        "yml" | "yaml" => "yaml",
        other => other,
    }
}
