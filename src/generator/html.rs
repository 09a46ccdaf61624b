//! Markdown to HTML.
//!
//! This only understands the Markdown subset that `generator::markdown`
//! produces: `#` headings, whole-line `**bold**` section headers and `*`
//! bullets indented by two spaces per level. Anything else becomes a
//! paragraph.

use regex::Regex;
use std::sync::LazyLock;

static HEADING_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading pattern is valid"));
static SECTION_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*(.+)\*\*$").expect("section pattern is valid"));
static BULLET_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)\*\s+(.+)$").expect("bullet pattern is valid"));
static BOLD_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));
static CODE_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.+?)`").expect("code pattern is valid"));

const LIST_OPEN: &str = "<ul><li>";
const LIST_CLOSE: &str = "</li></ul>";

/// Escapes `&`, `<`, `>` and `"`.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Applies inline formatting to escaped text: `**bold**`, then `*italic*`,
/// then `` `code` ``.
pub fn inline_format(text: &str) -> String {
    let escaped = escape_html(text);
    let bolded = BOLD_REGEXP.replace_all(&escaped, "<strong>${1}</strong>");
    let italicized = replace_italic(&bolded);
    CODE_REGEXP
        .replace_all(&italicized, "<code>${1}</code>")
        .into_owned()
}

/// Wraps `*text*` in `<em>` where neither delimiter touches another `*`.
///
/// Matches are found left to right, non-overlapping, with the shortest
/// non-empty body, as a lazy regex with `*` lookarounds would.
fn replace_italic(text: &str) -> String {
    let bytes = text.as_bytes();
    let star = |i: usize| bytes.get(i) == Some(&b'*');
    let lone_star = |i: usize| star(i) && (i == 0 || !star(i - 1)) && !star(i + 1);

    let mut result = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        if lone_star(i) {
            if let Some(end) = (i + 2..bytes.len()).find(|&j| lone_star(j)) {
                result.push_str(&text[copied..i]);
                result.push_str("<em>");
                result.push_str(&text[i + 1..end]);
                result.push_str("</em>");
                copied = end + 1;
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    result.push_str(&text[copied..]);
    result
}

/// Render buffer plus the count of open list levels.
struct HtmlWriter {
    parts: Vec<String>,
    current_depth: usize,
}

impl HtmlWriter {
    fn close_levels(&mut self, count: usize) {
        for _ in 0..count {
            self.parts.push(LIST_CLOSE.to_string());
        }
        self.current_depth -= count;
    }

    fn close_all(&mut self) {
        self.close_levels(self.current_depth);
    }

    fn bullet(&mut self, depth: usize, content: &str) {
        if depth > self.current_depth {
            for _ in self.current_depth..depth {
                self.parts.push(LIST_OPEN.to_string());
            }
            // The text belongs to the innermost item only.
            if let Some(last) = self.parts.last_mut() {
                *last = format!("{}{}", LIST_OPEN, content);
            }
        } else {
            self.close_levels(self.current_depth - depth);
            self.parts.push(format!("</li><li>{}", content));
        }
        self.current_depth = depth;
    }

    fn line(&mut self, line: &str) {
        let stripped = line.trim();

        if stripped.is_empty() {
            self.close_all();
            return;
        }

        if let Some(captures) = HEADING_REGEXP.captures(stripped) {
            self.close_all();
            let level = captures[1].len();
            self.parts
                .push(format!("<h{0}>{1}</h{0}>", level, inline_format(&captures[2])));
            return;
        }

        if let Some(captures) = SECTION_REGEXP.captures(stripped) {
            self.close_all();
            self.parts.push(format!(
                "<p><strong>{}</strong></p>",
                escape_html(&captures[1])
            ));
            return;
        }

        if let Some(captures) = BULLET_REGEXP.captures(line) {
            let depth = captures[1].len() / 2 + 1;
            self.bullet(depth, &inline_format(&captures[2]));
            return;
        }

        self.close_all();
        self.parts.push(format!("<p>{}</p>", inline_format(stripped)));
    }
}

/// Renders generated Markdown as an HTML fragment.
pub struct HtmlGenerator<'a> {
    markdown: &'a str,
}

impl<'a> HtmlGenerator<'a> {
    pub fn new(markdown: &'a str) -> Self {
        HtmlGenerator { markdown }
    }

    /// Returns the HTML parts joined by line feeds.
    pub fn output(&self) -> String {
        let mut writer = HtmlWriter {
            parts: Vec::new(),
            current_depth: 0,
        };
        for line in self.markdown.split('\n') {
            writer.line(line);
        }
        writer.close_all();
        writer.parts.join("\n")
    }
}

/// Renders generated Markdown as an HTML fragment.
pub fn render(markdown: &str) -> String {
    HtmlGenerator::new(markdown).output()
}
