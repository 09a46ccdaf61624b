//! Output generators.
//!
//! Each generator walks the typed lines of an `Outline` (or, for `html`, the
//! Markdown text produced by `markdown`) and keeps its own nesting state.
//! The generators deliberately share no intermediate tree.

pub mod html;
pub mod markdown;
pub mod slack_html;

use clap::ValueEnum;

/// The output types a tab note can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputType {
    /// Markdown text.
    Markdown,
    /// An HTML fragment rendered from the Markdown output.
    Html,
    /// Slack rich-message HTML.
    Slack,
}

impl OutputType {
    /// The name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            OutputType::Markdown => "markdown",
            OutputType::Html => "html",
            OutputType::Slack => "slack",
        }
    }
}
