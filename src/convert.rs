//! Conversion entry points.
//!
//! Each entry point takes raw tab note text and returns the rendered output
//! together with the plain-text fallback that goes on the clipboard beside it.

use crate::clipboard::{
    ClipboardFormat, ClipboardPayload, PlacementError, PlacementReport, PlacementRequest,
};
use crate::generator::{html, markdown, slack_html, OutputType};
use crate::parser::tab_note;
use crate::payload::{cf_html, chromium_mime, PayloadError};

/// Strips surrounding whitespace and ends the text with exactly one line feed.
pub fn normalize_output(text: &str) -> String {
    format!("{}\n", text.trim())
}

/// The result of converting one tab note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub output_type: OutputType,
    /// Markdown text, or the HTML fragment for the HTML and Slack types.
    pub output: String,
    /// The normalized Markdown, placed as plain text alongside rich output.
    pub plain_text: String,
}

impl Conversion {
    /// Builds the clipboard payloads for this conversion.
    ///
    /// Markdown is placed as plain text only. HTML output is placed as
    /// CF_HTML plus plain text, and Slack output additionally carries the
    /// `slack/html` custom MIME entry. If no rich tier succeeds the raw HTML
    /// is placed as text.
    pub fn placement_request(&self) -> Result<PlacementRequest, PayloadError> {
        let mut payloads = Vec::new();
        if self.output_type != OutputType::Markdown {
            payloads.push(ClipboardPayload::new(
                ClipboardFormat::Html,
                cf_html::build(&self.output)?.into_bytes(),
            ));
        }
        payloads.push(ClipboardPayload::unicode_text(&self.plain_text));
        if self.output_type == OutputType::Slack {
            payloads.push(ClipboardPayload::new(
                ClipboardFormat::ChromiumCustomMime,
                chromium_mime::encode_slack_html(&self.output)?,
            ));
        }

        Ok(PlacementRequest {
            payloads,
            last_resort_text: self.output.clone(),
        })
    }

    /// The status line reported after placing this conversion.
    pub fn status_message(&self, report: &PlacementReport) -> &'static str {
        match report.notice() {
            Some(PlacementError::OnlyPlainTextPlaced {
                rich_tiers_attempted: 0,
            }) => "Rich text not supported on this OS — copied raw HTML",
            Some(_) => "Could not set rich text — copied raw HTML (check the log for errors)",
            None => match self.output_type {
                OutputType::Markdown => "Converted to Markdown",
                OutputType::Html => "Converted to Rich Text",
                OutputType::Slack => "Converted for Slack",
            },
        }
    }
}

/// Converts a tab note to normalized Markdown.
pub fn to_markdown(raw: &str) -> Conversion {
    let markdown = normalize_output(&markdown::render(&tab_note::parse(raw)));
    Conversion {
        output_type: OutputType::Markdown,
        output: markdown.clone(),
        plain_text: markdown,
    }
}

/// Converts a tab note to an HTML fragment by way of its Markdown.
pub fn to_rich_text(raw: &str) -> Conversion {
    let markdown = markdown::render(&tab_note::parse(raw));
    Conversion {
        output_type: OutputType::Html,
        output: html::render(&markdown),
        plain_text: normalize_output(&markdown),
    }
}

/// Converts a tab note to Slack rich-message HTML.
pub fn to_slack(raw: &str) -> Conversion {
    let outline = tab_note::parse(raw);
    Conversion {
        output_type: OutputType::Slack,
        output: format!("{}{}", slack_html::META, slack_html::render(&outline)),
        plain_text: normalize_output(&markdown::render(&outline)),
    }
}

/// Converts a tab note to the given output type.
pub fn convert(raw: &str, output_type: OutputType) -> Conversion {
    match output_type {
        OutputType::Markdown => to_markdown(raw),
        OutputType::Html => to_rich_text(raw),
        OutputType::Slack => to_slack(raw),
    }
}
