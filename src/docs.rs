//! Detailed documentation for the input format and output types.
//!
//! This module contains reference documentation about the tab note format
//! and the outputs and clipboard payloads tabnote-conv-rs produces.

/// # Input
///
/// ## Tab notes
///
/// A text consisting of lines separated by line feeds where the number of
/// leading tab characters decides the role of each line:
///
/// ```text
/// Title Line              (0 tabs -> heading)
/// 	Section Header      (1 tab  -> bold section)
/// 		Bullet point    (2 tabs -> bullet)
/// 			Nested      (3 tabs -> nested bullet)
/// ```
///
/// - Spaces are never indentation; they stay part of the text.
/// - A line that is empty after removing trailing whitespace is blank.
/// - Blank lines end any open list.
/// - Any input is accepted.
pub mod input_types {
    /// Documentation for the tab note input format
    pub mod tab_note {
        //! Tab-indented meeting notes
    }
}

/// # Types of Output
///
/// The sample input used in this section is as follows:
///
/// ```text
/// Title
/// 	Section A
/// 		First
/// 			Nested
/// 		Second
/// ```
///
/// ## `markdown`
///
/// ```text
/// # Title
///
/// **Section A**
/// * First
///   * Nested
/// * Second
/// ```
///
/// Runs of blank lines collapse to one. With `--clipboard` the Markdown is
/// placed as plain text.
///
/// ## `html`
///
/// The Markdown above rendered to an HTML fragment (`<h1>`, `<p><strong>`,
/// nested `<ul><li>`), with `**bold**`, `*italic*` and `` `code` `` inline
/// formatting. With `--clipboard` it is placed as `HTML Format` (CF_HTML)
/// together with the Markdown as plain text.
///
/// ## `slack`
///
/// Slack's rich-message HTML: headings upper-cased and bold, sections bold
/// with paragraph breaks, bullets as nested lists carrying `data-indent`.
/// With `--clipboard` it is placed as CF_HTML, plain text, and a
/// `Chromium Web Custom MIME Data Format` entry named `slack/html`, which is
/// what Slack reads to keep nested lists.
///
/// ## Payloads (`--emit`)
///
/// `text` : the rendered output (default)
/// `cf-html` : the CF_HTML payload (`html`, `slack`)
/// `chromium` : the custom MIME container (`slack`)
///
/// ## Clipboard placement
///
/// On Windows the native clipboard API is tried first, then PowerShell, then
/// plain text. Elsewhere only plain text is available and the raw HTML is
/// placed as text. `--timeout-ms` bounds each attempt.
pub mod output_types {
    /// Documentation for markdown output format
    pub mod markdown {
        //! Markdown text
    }

    /// Documentation for html output format
    pub mod html {
        //! HTML fragment rendered from Markdown
    }

    /// Documentation for slack output format
    pub mod slack {
        //! Slack rich-message HTML
    }
}
