/// The structural role of a single line of tab-note input.
///
/// The role is decided purely by the number of leading tab characters:
/// zero tabs is a heading, one tab is a section header, and two or more
/// tabs is a bullet whose nesting depth is `tab_count - 2`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LineKind {
    /// A line that is empty after trimming trailing whitespace.
    Blank,
    /// A top-level title line (no leading tabs).
    Heading,
    /// A section header (one leading tab).
    Section,
    /// A bullet point. `depth` is 0 for the outermost list.
    Bullet { depth: usize },
}

/// Represents a single typed line of an outline.
///
/// A line consists of its structural kind and its text with the leading tabs
/// and trailing whitespace removed.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OutlineLine {
    /// The structural role of the line.
    pub kind: LineKind,
    /// The text content of the line. Empty for `LineKind::Blank`.
    pub text: String,
}

impl OutlineLine {
    /// Creates a new `OutlineLine`.
    ///
    /// # Arguments
    ///
    /// * `kind` - The structural role of the line.
    /// * `text` - The line content without indentation.
    pub fn new(kind: LineKind, text: &str) -> Self {
        OutlineLine {
            kind,
            text: text.to_string(),
        }
    }

    /// Creates a blank line.
    pub fn blank() -> Self {
        Self::new(LineKind::Blank, "")
    }

    /// Builds the line kind from a count of leading tab characters.
    pub fn kind_for_tabs(tab_count: usize) -> LineKind {
        match tab_count {
            0 => LineKind::Heading,
            1 => LineKind::Section,
            n => LineKind::Bullet { depth: n - 2 },
        }
    }

    /// Returns the number of leading tabs this line was written with,
    /// or `None` for blank lines.
    pub fn tab_count(&self) -> Option<usize> {
        match self.kind {
            LineKind::Blank => None,
            LineKind::Heading => Some(0),
            LineKind::Section => Some(1),
            LineKind::Bullet { depth } => Some(depth + 2),
        }
    }

    /// Returns `true` for blank lines.
    pub fn is_blank(&self) -> bool {
        self.kind == LineKind::Blank
    }
}

/// Represents a parsed tab note.
///
/// An outline is a flat, ordered sequence of typed lines. No tree is built:
/// every generator walks the lines directly and keeps its own nesting state.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Outline {
    /// The typed lines, in input order.
    pub line: Vec<OutlineLine>,
}

impl Outline {
    /// Creates a new, empty `Outline`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line to the outline.
    ///
    /// # Arguments
    ///
    /// * `kind` - The structural role of the line.
    /// * `text` - The line content without indentation.
    pub fn add_line(&mut self, kind: LineKind, text: &str) {
        self.line.push(OutlineLine::new(kind, text));
    }

    /// Returns an iterator over the lines.
    pub fn iter(&self) -> std::slice::Iter<'_, OutlineLine> {
        self.line.iter()
    }

    /// Calculates the maximum number of leading tabs across non-blank lines.
    pub fn max_tab_count(&self) -> usize {
        self.line
            .iter()
            .filter_map(OutlineLine::tab_count)
            .max()
            .unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a Outline {
    type Item = &'a OutlineLine;
    type IntoIter = std::slice::Iter<'a, OutlineLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.line.iter()
    }
}
