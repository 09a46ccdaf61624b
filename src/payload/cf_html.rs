//! Win32 `HTML Format` (CF_HTML) clipboard payloads.
//!
//! The header carries four byte offsets into the UTF-8 encoding of the whole
//! payload. Offsets are zero-padded to ten digits, so the header length does
//! not depend on the offset values.

use super::PayloadError;
use std::ops::Range;

pub const VERSION: &str = "0.9";
pub const PREFIX: &str = "<html><body>\r\n<!--StartFragment-->";
pub const SUFFIX: &str = "<!--EndFragment-->\r\n</body></html>";

/// The largest value a ten-digit offset field can hold.
const MAX_OFFSET: u64 = 9_999_999_999;

/// The offset fields of a CF_HTML header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfHtmlHeader {
    pub start_html: usize,
    pub end_html: usize,
    pub start_fragment: usize,
    pub end_fragment: usize,
}

impl CfHtmlHeader {
    /// Computes the offsets for a fragment of `fragment_len` UTF-8 bytes.
    pub fn for_fragment(fragment_len: usize) -> Result<Self, PayloadError> {
        let too_large = || PayloadError::TooLarge {
            what: "HTML fragment",
            len: fragment_len,
        };

        let start_html = CfHtmlHeader::zeroed().render().len();
        let start_fragment = start_html + PREFIX.len();
        let end_fragment = start_fragment
            .checked_add(fragment_len)
            .ok_or_else(too_large)?;
        let end_html = end_fragment
            .checked_add(SUFFIX.len())
            .ok_or_else(too_large)?;
        if end_html as u64 > MAX_OFFSET {
            return Err(too_large());
        }

        Ok(CfHtmlHeader {
            start_html,
            end_html,
            start_fragment,
            end_fragment,
        })
    }

    fn zeroed() -> Self {
        CfHtmlHeader {
            start_html: 0,
            end_html: 0,
            start_fragment: 0,
            end_fragment: 0,
        }
    }

    /// Renders the header text, including its trailing CRLF.
    pub fn render(&self) -> String {
        format!(
            "Version:{}\r\nStartHTML:{:010}\r\nEndHTML:{:010}\r\nStartFragment:{:010}\r\nEndFragment:{:010}\r\n",
            VERSION, self.start_html, self.end_html, self.start_fragment, self.end_fragment
        )
    }

    /// Reads the offset fields back from a CF_HTML payload.
    pub fn parse(payload: &str) -> Result<Self, PayloadError> {
        let field = |name: &str| -> Result<usize, PayloadError> {
            let value = payload
                .split("\r\n")
                .find_map(|line| line.strip_prefix(name)?.strip_prefix(':'))
                .ok_or_else(|| PayloadError::InvalidHeader(name.to_string()))?;
            value
                .parse()
                .map_err(|_| PayloadError::InvalidHeader(format!("{}:{}", name, value)))
        };

        Ok(CfHtmlHeader {
            start_html: field("StartHTML")?,
            end_html: field("EndHTML")?,
            start_fragment: field("StartFragment")?,
            end_fragment: field("EndFragment")?,
        })
    }

    /// The byte range of the fragment within the payload.
    pub fn fragment(&self) -> Range<usize> {
        self.start_fragment..self.end_fragment
    }
}

/// Wraps an HTML fragment in a CF_HTML header and document shell.
///
/// # Arguments
///
/// * `fragment` - The HTML fragment to place between the fragment markers.
///
/// # Returns
///
/// The complete payload. Its UTF-8 bytes are what goes on the clipboard.
pub fn build(fragment: &str) -> Result<String, PayloadError> {
    let header = CfHtmlHeader::for_fragment(fragment.len())?;

    let mut payload = header.render();
    payload.reserve(PREFIX.len() + fragment.len() + SUFFIX.len());
    payload.push_str(PREFIX);
    payload.push_str(fragment);
    payload.push_str(SUFFIX);

    debug_assert_eq!(payload.len(), header.end_html);
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_length_is_fixed() {
        let small = CfHtmlHeader::for_fragment(0).unwrap().render();
        let large = CfHtmlHeader::for_fragment(123_456).unwrap().render();
        assert_eq!(small.len(), large.len());
        assert_eq!(small.len(), 105);
    }

    #[test]
    fn test_build_ascii() {
        let payload = build("<p>hi</p>").unwrap();
        let header = CfHtmlHeader::parse(&payload).unwrap();

        assert!(payload.starts_with("Version:0.9\r\nStartHTML:0000000105\r\n"));
        assert_eq!(header.start_html, 105);
        assert_eq!(header.start_fragment, 105 + PREFIX.len());
        assert_eq!(&payload[header.fragment()], "<p>hi</p>");
        assert_eq!(header.end_html, payload.len());
        assert_eq!(&payload[header.start_html..], format!("{}<p>hi</p>{}", PREFIX, SUFFIX));
    }

    #[test]
    fn test_offsets_count_utf8_bytes() {
        let fragment = "<b>Grüße — 日本語 🎉</b>";
        let payload = build(fragment).unwrap();
        let header = CfHtmlHeader::parse(&payload).unwrap();
        let bytes = payload.as_bytes();

        assert_eq!(&bytes[header.fragment()], fragment.as_bytes());
        assert_eq!(header.end_fragment - header.start_fragment, fragment.len());
        assert!(fragment.len() > fragment.chars().count());
        assert_eq!(header.end_html, bytes.len());
    }

    #[test]
    fn test_empty_fragment() {
        let payload = build("").unwrap();
        let header = CfHtmlHeader::parse(&payload).unwrap();
        assert_eq!(header.start_fragment, header.end_fragment);
        assert!(payload.ends_with(&format!("{}{}", PREFIX, SUFFIX)));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_fragment_too_large() {
        let len = MAX_OFFSET as usize;
        assert_eq!(
            CfHtmlHeader::for_fragment(len),
            Err(PayloadError::TooLarge {
                what: "HTML fragment",
                len
            })
        );
        assert!(CfHtmlHeader::for_fragment(usize::MAX).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        assert_eq!(
            CfHtmlHeader::parse("Version:0.9\r\nStartHTML:0000000001\r\n"),
            Err(PayloadError::InvalidHeader("EndHTML".to_string()))
        );
    }
}
