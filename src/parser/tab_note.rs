use crate::outline::{LineKind, Outline, OutlineLine};
use regex::Regex;
use std::sync::LazyLock;

static INDENT_REGEXP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indents>\t*)(?P<content>.*)$").expect("indent pattern is valid")
});

/// A parser for converting raw tab notes into an `Outline`.
///
/// Every input is accepted. Lines are classified mechanically by their count
/// of leading tab characters; spaces are never treated as indentation.
#[derive(Debug, Default, Clone, Copy)]
pub struct TabNoteParser;

impl TabNoteParser {
    /// Creates a new `TabNoteParser`.
    pub fn new() -> Self {
        TabNoteParser
    }

    /// Parses the input string and converts it into an `Outline`.
    ///
    /// Lines are separated by line feeds only. Trailing whitespace (including a
    /// carriage return) is removed from each line before classification, so a
    /// trailing line feed yields a final blank line.
    ///
    /// # Arguments
    ///
    /// * `input` - The raw tab note text.
    pub fn parse(&self, input: &str) -> Outline {
        let mut outline = Outline::new();

        for line in input.split('\n') {
            outline.line.push(Self::parse_line(line));
        }

        outline
    }

    /// Classifies a single raw line.
    pub fn parse_line(line: &str) -> OutlineLine {
        let trimmed_line = line.trim_end();
        if trimmed_line.is_empty() {
            return OutlineLine::blank();
        }

        let (tab_count, content) = match INDENT_REGEXP.captures(trimmed_line) {
            Some(captures) => (
                captures.name("indents").map_or(0, |m| m.as_str().len()),
                captures.name("content").map_or("", |m| m.as_str()),
            ),
            None => (0, trimmed_line),
        };

        OutlineLine::new(OutlineLine::kind_for_tabs(tab_count), content)
    }
}

/// Parses raw tab note text with the default parser.
pub fn parse(input: &str) -> Outline {
    TabNoteParser::new().parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_outline() -> Outline {
        let mut outline = Outline::new();
        outline.add_line(LineKind::Heading, "Title");
        outline.add_line(LineKind::Section, "Section A");
        outline.add_line(LineKind::Bullet { depth: 0 }, "First");
        outline.add_line(LineKind::Bullet { depth: 1 }, "Nested");
        outline.add_line(LineKind::Bullet { depth: 0 }, "Second");
        outline.add_line(LineKind::Blank, "");
        outline
    }

    #[test]
    fn test_tab_note_parser_parse() {
        let input = "Title\n\tSection A\n\t\tFirst\n\t\t\tNested\n\t\tSecond\n";
        let outline = TabNoteParser::new().parse(input);
        assert_eq!(outline, reference_outline());
    }

    #[test]
    fn test_empty_input() {
        let outline = parse("");
        assert_eq!(outline.line, vec![OutlineLine::blank()]);
    }

    #[test]
    fn test_whitespace_only_lines_are_blank() {
        let outline = parse("\t\t\n   \n\t \t");
        assert_eq!(outline.line.len(), 3);
        assert!(outline.iter().all(OutlineLine::is_blank));
    }

    #[test]
    fn test_trailing_whitespace_and_crlf_are_trimmed() {
        let outline = parse("Title  \r\n\t\tItem\t\r\n");
        assert_eq!(outline.line[0], OutlineLine::new(LineKind::Heading, "Title"));
        assert_eq!(
            outline.line[1],
            OutlineLine::new(LineKind::Bullet { depth: 0 }, "Item")
        );
    }

    #[test]
    fn test_spaces_are_not_indentation() {
        let outline = parse("    spaced\n\t  mixed");
        assert_eq!(
            outline.line[0],
            OutlineLine::new(LineKind::Heading, "    spaced")
        );
        assert_eq!(outline.line[1], OutlineLine::new(LineKind::Section, "  mixed"));
    }

    #[test]
    fn test_only_leading_tabs_count() {
        let outline = parse("\t\ta\tb");
        assert_eq!(
            outline.line[0],
            OutlineLine::new(LineKind::Bullet { depth: 0 }, "a\tb")
        );
    }

    #[test]
    fn test_deep_bullets() {
        let outline = parse("\t\t\t\t\tdeep");
        assert_eq!(outline.line[0].kind, LineKind::Bullet { depth: 3 });
        assert_eq!(outline.max_tab_count(), 5);
    }
}
