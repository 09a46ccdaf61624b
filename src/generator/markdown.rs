use crate::outline::{LineKind, Outline};
use regex::Regex;
use std::sync::LazyLock;

static BLANK_RUN_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank run pattern is valid"));

/// Renders an `Outline` as Markdown.
///
/// Headings become `# text`, section headers become `**text**` preceded by a
/// blank line, and bullets become `* text` indented by two spaces per depth.
/// Runs of blank lines are collapsed so that blocks are separated by at most
/// one empty line.
pub struct MarkdownGenerator<'a> {
    outline: &'a Outline,
}

impl<'a> MarkdownGenerator<'a> {
    pub fn new(outline: &'a Outline) -> Self {
        MarkdownGenerator { outline }
    }

    pub fn output(&self) -> String {
        let mut result: Vec<String> = Vec::with_capacity(self.outline.line.len());

        for line in self.outline {
            match line.kind {
                LineKind::Blank => result.push(String::new()),
                LineKind::Heading => result.push(format!("# {}", line.text)),
                LineKind::Section => {
                    result.push(String::new());
                    result.push(format!("**{}**", line.text));
                }
                LineKind::Bullet { depth } => {
                    result.push(format!("{}* {}", "  ".repeat(depth), line.text));
                }
            }
        }

        collapse_blank_lines(&result.join("\n"))
    }
}

/// Collapses every run of three or more line feeds down to two.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN_REGEXP.replace_all(text, "\n\n").into_owned()
}

/// Renders an `Outline` as Markdown.
pub fn render(outline: &Outline) -> String {
    MarkdownGenerator::new(outline).output()
}
