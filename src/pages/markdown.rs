//! Markdown string assembly.

use std::fmt::{Display, Write};

/// Accumulates markdown text through chained append calls.
///
/// Line-oriented helpers end lines with the two-space markdown hard
/// break so consecutive short lines render as separate lines.
#[derive(Debug, Default)]
pub struct MarkdownBuilder {
    out: String,
}

impl MarkdownBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value verbatim.
    pub fn append(&mut self, value: impl Display) -> &mut Self {
        let _ = write!(self.out, "{}", value);
        self
    }

    /// Append a value followed by a hard line break.
    pub fn appendln(&mut self, value: impl Display) -> &mut Self {
        self.append(value).newline()
    }

    /// Append a hard line break (two spaces plus newline).
    pub fn newline(&mut self) -> &mut Self {
        self.out.push_str("  \n");
        self
    }

    /// Append `[alt](link) `.
    pub fn link(&mut self, alt: &str, link: &str) -> &mut Self {
        self.append("[")
            .append(alt)
            .append("](")
            .append(link)
            .append(") ")
    }

    /// Append `` [`alt`](link) ``.
    pub fn code_link(&mut self, alt: &str, link: &str) -> &mut Self {
        self.append("[`")
            .append(alt)
            .append("`](")
            .append(link)
            .append(") ")
    }

    /// Append a heading of the given level and the given text.
    pub fn header(&mut self, level: usize, text: impl Display) -> &mut Self {
        for _ in 0..level {
            self.append("#");
        }
        self.append(" ").append(text)
    }

    /// Append a quoted line.
    pub fn quote(&mut self, text: impl Display) -> &mut Self {
        self.append("> ").appendln(text)
    }

    /// Append a horizontal rule separating sections.
    pub fn endsection(&mut self) -> &mut Self {
        self.out.push_str("\n---\n");
        self
    }

    /// Append a bullet marker at the given indent level.
    pub fn bullet(&mut self, level: usize) -> &mut Self {
        for _ in 0..level {
            self.append("  ");
        }
        self.append("+ ")
    }

    /// Open a fenced code block, closed by [`CodeBlock::end`].
    pub fn code_block(&mut self, language: &str) -> CodeBlock<'_> {
        self.append("```").appendln(language);
        CodeBlock { parent: self }
    }

    /// View of the accumulated markdown.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consume the builder, returning the markdown.
    pub fn finish(self) -> String {
        self.out
    }
}

/// Scoped writer for a fenced code block.
#[derive(Debug)]
pub struct CodeBlock<'a> {
    parent: &'a mut MarkdownBuilder,
}

impl<'a> CodeBlock<'a> {
    /// Append raw content inside the fence.
    pub fn append(self, value: impl Display) -> Self {
        self.parent.append(value);
        self
    }

    /// Close the fence, returning the parent builder.
    pub fn end(self) -> &'a mut MarkdownBuilder {
        self.parent.appendln("```")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appendln_uses_hard_break() {
        let mut md = MarkdownBuilder::new();
        md.appendln("hello");
        assert_eq!(md.as_str(), "hello  \n");
    }

    #[test]
    fn link_and_code_link() {
        let mut md = MarkdownBuilder::new();
        md.link("name", "target");
        md.code_link("file.rs", "url");
        assert_eq!(md.as_str(), "[name](target) [`file.rs`](url) ");
    }

    #[test]
    fn header_levels() {
        let mut md = MarkdownBuilder::new();
        md.header(3, "Title");
        assert_eq!(md.as_str(), "### Title");
    }

    #[test]
    fn quote_line() {
        let mut md = MarkdownBuilder::new();
        md.quote("note");
        assert_eq!(md.as_str(), "> note  \n");
    }

    #[test]
    fn bullet_indents() {
        let mut md = MarkdownBuilder::new();
        md.bullet(0).append("top").newline();
        md.bullet(2).append("nested").newline();
        assert_eq!(md.as_str(), "+ top  \n    + nested  \n");
    }

    #[test]
    fn endsection_rule() {
        let mut md = MarkdownBuilder::new();
        md.append("a").endsection().append("b");
        assert_eq!(md.as_str(), "a\n---\nb");
    }

    #[test]
    fn code_block_fences() {
        let mut md = MarkdownBuilder::new();
        md.code_block("diff").append("+added\n").end();
        assert_eq!(md.as_str(), "```diff  \n+added\n```  \n");
    }

    #[test]
    fn chained_page_fragment() {
        let mut md = MarkdownBuilder::new();
        md.header(3, "File: ").link("a.rs", "url/a.rs").newline();
        assert_eq!(md.as_str(), "### File: [a.rs](url/a.rs)   \n");
    }
}
