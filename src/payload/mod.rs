//! Binary clipboard payload builders.
//!
//! Both builders are pure functions over explicit byte arithmetic. Every
//! length written to the wire is checked against the width of its field.

pub mod cf_html;
pub mod chromium_mime;

use thiserror::Error;

/// Represents errors that can occur while building or decoding payloads.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PayloadError {
    /// A length does not fit in its wire field.
    #[error("{what} of {len} bytes does not fit in the payload format")]
    TooLarge { what: &'static str, len: usize },
    /// The buffer ended before a field could be read.
    #[error("payload truncated: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// The declared payload size disagrees with the buffer.
    #[error("payload size field says {declared} bytes but {actual} follow")]
    SizeMismatch { declared: usize, actual: usize },
    /// A string field is not valid UTF-16.
    #[error("invalid UTF-16 string at offset {offset}")]
    InvalidUtf16 { offset: usize },
    /// A CF_HTML header field is missing or malformed.
    #[error("invalid CF_HTML header field: {0}")]
    InvalidHeader(String),
}
