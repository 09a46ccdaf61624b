//! Slack rich-message HTML.
//!
//! Slack's paste recognizer reads a proprietary HTML dialect with
//! `data-stringify-*` attributes and rich-text CSS classes. Lists must be
//! truly nested `<ul>`/`<li>` elements, and every list and item carries the
//! indent it was opened at.

use crate::outline::{LineKind, Outline, OutlineLine};

/// Charset declaration Slack places in front of its own clipboard HTML.
pub const META: &str = r#"<meta charset="utf-8">"#;

const DIV_OPEN: &str = r#"<div class="p-rich_text_section">"#;
const DIV_CLOSE: &str = "</div>";
const BR: &str = r#"<br aria-hidden="true">"#;
const PARA_BREAK: &str = r#"<span aria-label="&nbsp;" class="c-mrkdwn__br" data-stringify-type="paragraph-break"></span>"#;
const ITEM_CLOSE: &str = "</li>";
const LIST_CLOSE: &str = "</li></ul>";

fn bold(text: &str) -> String {
    format!(r#"<b data-stringify-type="bold">{}</b>"#, text)
}

fn list_open(indent: usize) -> String {
    format!(
        "<ul data-stringify-type=\"unordered-list\" data-list-tree=\"true\" \
         class=\"p-rich_text_list p-rich_text_list__bullet p-rich_text_list--nested\" \
         data-indent=\"{}\" data-border=\"0\">",
        indent
    )
}

fn item_open(indent: usize) -> String {
    format!(
        r#"<li data-stringify-indent="{}" data-stringify-border="0">"#,
        indent
    )
}

/// Escapes `&`, `<` and `>`. Slack leaves quotes alone.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A currently open container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// A `p-rich_text_section` div. Never open at the same time as a list.
    Block,
    /// A `<ul>` with one open `<li>`, opened at `depth`.
    List { depth: usize },
}

impl Frame {
    fn close_tag(&self) -> &'static str {
        match self {
            Frame::Block => DIV_CLOSE,
            Frame::List { .. } => LIST_CLOSE,
        }
    }
}

/// Render buffer plus nesting stack for one rendering pass.
///
/// List depths on the stack are strictly increasing from bottom to top, and
/// every frame on the stack has exactly one matching close tag still owed.
struct SlackWriter {
    parts: Vec<String>,
    stack: Vec<Frame>,
    first_heading: bool,
}

impl SlackWriter {
    fn new() -> Self {
        SlackWriter {
            parts: Vec::new(),
            stack: Vec::new(),
            first_heading: true,
        }
    }

    fn block_open(&self) -> bool {
        matches!(self.stack.last(), Some(Frame::Block))
    }

    fn top_depth(&self) -> Option<usize> {
        match self.stack.last() {
            Some(Frame::List { depth }) => Some(*depth),
            _ => None,
        }
    }

    /// Pops and closes frames for as long as `close` accepts the top frame.
    fn unwind_while(&mut self, close: impl Fn(&Frame) -> bool) {
        while let Some(frame) = self.stack.last().copied() {
            if !close(&frame) {
                break;
            }
            self.parts.push(frame.close_tag().to_string());
            self.stack.pop();
        }
    }

    /// Closes every list nested deeper than `depth`, or all lists for `None`.
    fn unwind_lists(&mut self, depth: Option<usize>) {
        self.unwind_while(|frame| match (frame, depth) {
            (Frame::List { .. }, None) => true,
            (Frame::List { depth: open }, Some(target)) => *open > target,
            (Frame::Block, _) => false,
        });
    }

    /// Opens a block if none is open. Returns whether one was opened.
    fn ensure_block(&mut self) -> bool {
        if self.block_open() {
            return false;
        }
        self.parts.push(DIV_OPEN.to_string());
        self.stack.push(Frame::Block);
        true
    }

    fn close_block(&mut self) {
        self.unwind_while(|frame| *frame == Frame::Block);
    }

    fn open_list(&mut self, depth: usize, content: &str) {
        self.parts.push(list_open(depth));
        self.parts.push(format!("{}{}", item_open(depth), content));
        self.stack.push(Frame::List { depth });
    }

    fn sibling_item(&mut self, depth: usize, content: &str) {
        self.parts.push(ITEM_CLOSE.to_string());
        self.parts.push(format!("{}{}", item_open(depth), content));
    }

    fn line(&mut self, line: &OutlineLine) {
        let content = escape(&line.text);

        match line.kind {
            LineKind::Blank => self.unwind_lists(None),
            LineKind::Heading => {
                self.unwind_lists(None);
                if self.ensure_block() && !self.first_heading {
                    self.parts.push(PARA_BREAK.to_string());
                }
                self.first_heading = false;
                self.parts.push(bold(&content.to_uppercase()));
            }
            LineKind::Section => {
                self.unwind_lists(None);
                self.ensure_block();
                self.parts.push(PARA_BREAK.to_string());
                self.parts.push(bold(&content));
                self.parts.push(BR.to_string());
                self.close_block();
            }
            LineKind::Bullet { depth } => {
                self.close_block();
                self.bullet(depth, &content);
            }
        }
    }

    fn bullet(&mut self, depth: usize, content: &str) {
        match self.top_depth() {
            None => self.open_list(depth, content),
            Some(top) if depth > top => {
                // Skipped levels get an empty item; only the target depth
                // carries the text.
                for next in top + 1..=depth {
                    let text = if next == depth { content } else { "" };
                    self.open_list(next, text);
                }
            }
            Some(top) if depth == top => self.sibling_item(depth, content),
            Some(_) => {
                self.unwind_lists(Some(depth));
                match self.top_depth() {
                    Some(_) => self.sibling_item(depth, content),
                    // Shallower than the outermost open list: start a new one.
                    None => self.open_list(depth, content),
                }
            }
        }
    }

    fn finish(mut self) -> String {
        self.unwind_while(|_| true);
        debug_assert!(self.stack.is_empty());
        self.parts.concat()
    }
}

/// Renders an `Outline` as Slack rich-message HTML.
///
/// Headings are upper-cased bold text inside a section block that stays open
/// for following headings; section headers are bold text in a block that is
/// closed immediately; bullets become nested lists.
pub struct SlackHtmlGenerator<'a> {
    outline: &'a Outline,
}

impl<'a> SlackHtmlGenerator<'a> {
    pub fn new(outline: &'a Outline) -> Self {
        SlackHtmlGenerator { outline }
    }

    /// Returns the HTML fragment, without the leading [`META`] tag.
    pub fn output(&self) -> String {
        let mut writer = SlackWriter::new();
        for line in self.outline {
            writer.line(line);
        }
        writer.finish()
    }
}

/// Renders an `Outline` as Slack rich-message HTML.
pub fn render(outline: &Outline) -> String {
    SlackHtmlGenerator::new(outline).output()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tab_note::parse;

    fn to_slack(input: &str) -> String {
        render(&parse(input))
    }

    fn assert_balanced(html: &str) {
        assert_eq!(html.matches("<ul ").count(), html.matches("</ul>").count());
        assert_eq!(html.matches("<li ").count(), html.matches("</li>").count());
        assert_eq!(html.matches("<div ").count(), html.matches("</div>").count());
    }

    #[test]
    fn test_sibling_then_nested_bullet() {
        let html = to_slack("\t\tFirst\n\t\tSecond\n\t\t\tNested");
        let expected = [
            list_open(0),
            item_open(0),
            "First".to_string(),
            ITEM_CLOSE.to_string(),
            item_open(0),
            "Second".to_string(),
            list_open(1),
            item_open(1),
            "Nested".to_string(),
            LIST_CLOSE.to_string(),
            LIST_CLOSE.to_string(),
        ]
        .concat();
        assert_eq!(html, expected);
        assert_eq!(html.matches(r#"data-indent="0""#).count(), 1);
        assert_eq!(html.matches(r#"data-indent="1""#).count(), 1);
    }

    #[test]
    fn test_heading_section_and_bullet() {
        let html = to_slack("Title\n\tSection\n\t\tItem\n");
        let expected = [
            DIV_OPEN.to_string(),
            bold("TITLE"),
            PARA_BREAK.to_string(),
            bold("Section"),
            BR.to_string(),
            DIV_CLOSE.to_string(),
            list_open(0),
            item_open(0),
            "Item".to_string(),
            LIST_CLOSE.to_string(),
        ]
        .concat();
        assert_eq!(html, expected);
    }

    #[test]
    fn test_consecutive_headings_share_block() {
        let html = to_slack("One\nTwo");
        let expected = [
            DIV_OPEN.to_string(),
            bold("ONE"),
            bold("TWO"),
            DIV_CLOSE.to_string(),
        ]
        .concat();
        assert_eq!(html, expected);
    }

    #[test]
    fn test_heading_after_closed_block_gets_paragraph_break() {
        let html = to_slack("One\n\tS\nTwo");
        let expected = [
            DIV_OPEN.to_string(),
            bold("ONE"),
            PARA_BREAK.to_string(),
            bold("S"),
            BR.to_string(),
            DIV_CLOSE.to_string(),
            DIV_OPEN.to_string(),
            PARA_BREAK.to_string(),
            bold("TWO"),
            DIV_CLOSE.to_string(),
        ]
        .concat();
        assert_eq!(html, expected);
    }

    #[test]
    fn test_depth_jump_opens_empty_intermediate_items() {
        let html = to_slack("\t\ta\n\t\t\t\t\tb");
        let expected = [
            list_open(0),
            item_open(0),
            "a".to_string(),
            list_open(1),
            item_open(1),
            list_open(2),
            item_open(2),
            list_open(3),
            item_open(3),
            "b".to_string(),
            LIST_CLOSE.repeat(4),
        ]
        .concat();
        assert_eq!(html, expected);
    }

    #[test]
    fn test_going_shallower_closes_deeper_levels() {
        let html = to_slack("\t\ta\n\t\t\tb\n\t\t\t\tc\n\t\td");
        let expected = [
            list_open(0),
            item_open(0),
            "a".to_string(),
            list_open(1),
            item_open(1),
            "b".to_string(),
            list_open(2),
            item_open(2),
            "c".to_string(),
            LIST_CLOSE.repeat(2),
            ITEM_CLOSE.to_string(),
            item_open(0),
            "d".to_string(),
            LIST_CLOSE.to_string(),
        ]
        .concat();
        assert_eq!(html, expected);
    }

    #[test]
    fn test_shallower_than_first_list_starts_new_list() {
        let html = to_slack("\t\t\t\ta\n\t\tb");
        let expected = [
            list_open(2),
            item_open(2),
            "a".to_string(),
            LIST_CLOSE.to_string(),
            list_open(0),
            item_open(0),
            "b".to_string(),
            LIST_CLOSE.to_string(),
        ]
        .concat();
        assert_eq!(html, expected);
        assert_balanced(&html);
    }

    #[test]
    fn test_blank_line_closes_lists() {
        let html = to_slack("\t\ta\n\n\t\tb");
        let expected = [
            list_open(0),
            item_open(0),
            "a".to_string(),
            LIST_CLOSE.to_string(),
            list_open(0),
            item_open(0),
            "b".to_string(),
            LIST_CLOSE.to_string(),
        ]
        .concat();
        assert_eq!(html, expected);
    }

    #[test]
    fn test_escaping_leaves_quotes() {
        let html = to_slack("a&b\n\t\t<x> \"q\"");
        assert!(html.contains(&bold("A&AMP;B")));
        assert!(html.contains("&lt;x&gt; \"q\""));
    }

    #[test]
    fn test_balanced_for_assorted_inputs() {
        let inputs = [
            "",
            "Title",
            "\tSection",
            "\t\t\t\t\t\tdeep",
            "T\n\tS\n\t\ta\n\t\t\tb\n\n\t\t\t\tc\nT2\n\t\td\n\t\t\t\te\n\tS2",
            "\t\t\ta\n\t\tb\n\t\t\t\tc\n\t\t\td\nTitle\n\t\te",
        ];
        for input in inputs {
            assert_balanced(&to_slack(input));
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_slack(""), "");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&</a>"#), r#"&lt;a href="x"&gt;&amp;&lt;/a&gt;"#);
    }
}
