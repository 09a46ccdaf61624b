//! Placing converted payloads on the system clipboard.
//!
//! A [`PlacementStrategy`] tries an ordered chain of [`ClipboardBackend`]s:
//! a native multi-format writer, a higher-level OS fallback, and finally a
//! plain-text-only last resort. Every rich tier writes all of its formats in
//! one clipboard session. A tier that fails or times out is logged and the
//! next one is tried.

pub mod powershell;
pub mod text;
#[cfg(windows)]
pub mod windows;

use log::{debug, warn};
use std::time::Duration;
use thiserror::Error;

/// Default time a single tier may take before it is treated as failed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// The clipboard formats a conversion can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardFormat {
    /// `CF_UNICODETEXT`: UTF-16LE plain text.
    UnicodeText,
    /// The registered `HTML Format` (CF_HTML).
    Html,
    /// Chromium's pickled custom MIME map.
    ChromiumCustomMime,
}

impl ClipboardFormat {
    /// The clipboard format name.
    pub fn name(&self) -> &'static str {
        match self {
            ClipboardFormat::UnicodeText => "CF_UNICODETEXT",
            ClipboardFormat::Html => "HTML Format",
            ClipboardFormat::ChromiumCustomMime => "Chromium Web Custom MIME Data Format",
        }
    }
}

/// Bytes for one clipboard format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub format: ClipboardFormat,
    pub bytes: Vec<u8>,
}

impl ClipboardPayload {
    pub fn new(format: ClipboardFormat, bytes: Vec<u8>) -> Self {
        ClipboardPayload { format, bytes }
    }

    /// A `CF_UNICODETEXT` payload holding `text` as UTF-16LE.
    pub fn unicode_text(text: &str) -> Self {
        let bytes = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        Self::new(ClipboardFormat::UnicodeText, bytes)
    }

    /// Decodes a UTF-16LE payload back to text.
    pub fn to_text(&self) -> Option<String> {
        if self.bytes.len() % 2 != 0 {
            return None;
        }
        let units: Vec<u16> = self
            .bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).ok()
    }
}

/// Everything placed for one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRequest {
    /// Payloads in the order they are written.
    pub payloads: Vec<ClipboardPayload>,
    /// Text placed when no rich tier succeeds.
    pub last_resort_text: String,
}

impl PlacementRequest {
    /// Returns the payload for `format`, if present.
    pub fn payload(&self, format: ClipboardFormat) -> Option<&ClipboardPayload> {
        self.payloads.iter().find(|p| p.format == format)
    }

    /// Returns `true` if any payload is richer than plain text.
    pub fn is_rich(&self) -> bool {
        self.payloads
            .iter()
            .any(|p| p.format != ClipboardFormat::UnicodeText)
    }
}

/// Represents errors a single backend can report.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Os(String),
    #[error("missing {0} payload")]
    MissingPayload(&'static str),
    #[error("{command} exited with {status}: {stderr}")]
    Command {
        command: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A mechanism that can put a request on the clipboard.
pub trait ClipboardBackend {
    /// A short name for log messages.
    fn name(&self) -> &'static str;

    /// Places the request, giving up once `timeout` has elapsed.
    fn place(&mut self, request: &PlacementRequest, timeout: Duration) -> Result<(), BackendError>;
}

/// Represents the ways a placement can fall short.
#[derive(Error, Debug)]
pub enum PlacementError {
    /// The native tier failed; the fallback is tried next.
    #[error("native clipboard placement failed: {0}")]
    PrimaryMechanismFailed(String),
    /// The fallback tier failed; the plain-text last resort is tried next.
    #[error("fallback clipboard placement failed: {0}")]
    FallbackMechanismFailed(String),
    /// A rich request ended with only plain text on the clipboard.
    #[error("rich formatting was not applied, only plain text was placed")]
    OnlyPlainTextPlaced { rich_tiers_attempted: usize },
    /// Even the plain-text last resort failed.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// The tier that finally placed the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Native,
    Fallback,
    PlainTextOnly,
}

/// The result of a placement, with every tier failure along the way.
#[derive(Debug)]
pub struct PlacementReport {
    pub placement: Placement,
    pub failures: Vec<PlacementError>,
    pub rich: bool,
}

impl PlacementReport {
    /// Returns the user-facing notice when rich formatting was lost.
    pub fn notice(&self) -> Option<PlacementError> {
        if self.rich && self.placement == Placement::PlainTextOnly {
            Some(PlacementError::OnlyPlainTextPlaced {
                rich_tiers_attempted: self.failures.len(),
            })
        } else {
            None
        }
    }
}

/// Options for configuring the `PlacementStrategy`.
#[derive(Debug, Clone)]
pub struct PlacementOptions {
    /// How long one tier may take.
    pub timeout: Duration,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        PlacementOptions {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// The ordered chain of clipboard backends.
pub struct PlacementStrategy {
    primary: Option<Box<dyn ClipboardBackend>>,
    fallback: Option<Box<dyn ClipboardBackend>>,
    last_resort: Box<dyn ClipboardBackend>,
    options: PlacementOptions,
}

impl PlacementStrategy {
    /// Creates the strategy for the current platform.
    ///
    /// Rich tiers exist only on Windows. Elsewhere every request goes straight
    /// to the plain-text last resort.
    pub fn new(options: PlacementOptions) -> Self {
        #[cfg(windows)]
        let (primary, fallback): (
            Option<Box<dyn ClipboardBackend>>,
            Option<Box<dyn ClipboardBackend>>,
        ) = (
            Some(Box::new(windows::NativeBackend::new())),
            Some(Box::new(powershell::PowerShellBackend::new())),
        );
        #[cfg(not(windows))]
        let (primary, fallback) = (None, None);

        Self::with_backends(primary, fallback, Box::new(text::TextBackend::new()), options)
    }

    /// Creates a strategy from explicit backends.
    pub fn with_backends(
        primary: Option<Box<dyn ClipboardBackend>>,
        fallback: Option<Box<dyn ClipboardBackend>>,
        last_resort: Box<dyn ClipboardBackend>,
        options: PlacementOptions,
    ) -> Self {
        PlacementStrategy {
            primary,
            fallback,
            last_resort,
            options,
        }
    }

    /// Places the request using the first tier that succeeds.
    ///
    /// # Returns
    ///
    /// A report naming the tier used, or `PlacementError::Unavailable` when
    /// even the plain-text last resort failed.
    pub fn place(&mut self, request: &PlacementRequest) -> Result<PlacementReport, PlacementError> {
        let rich = request.is_rich();
        let timeout = self.options.timeout;
        let mut failures = Vec::new();

        if rich {
            let tiers = [
                (self.primary.as_mut(), Placement::Native),
                (self.fallback.as_mut(), Placement::Fallback),
            ];
            for (backend, placement) in tiers {
                let Some(backend) = backend else {
                    continue;
                };
                debug!(
                    "placing {} payload(s) via {} backend",
                    request.payloads.len(),
                    backend.name()
                );
                match backend.place(request, timeout) {
                    Ok(()) => {
                        return Ok(PlacementReport {
                            placement,
                            failures,
                            rich,
                        })
                    }
                    Err(e) => {
                        warn!("{} clipboard backend failed: {}", backend.name(), e);
                        failures.push(match placement {
                            Placement::Native => PlacementError::PrimaryMechanismFailed(e.to_string()),
                            _ => PlacementError::FallbackMechanismFailed(e.to_string()),
                        });
                    }
                }
            }
        }

        debug!("placing plain text via {} backend", self.last_resort.name());
        self.last_resort
            .place(request, timeout)
            .map_err(|e| PlacementError::Unavailable(e.to_string()))?;

        Ok(PlacementReport {
            placement: Placement::PlainTextOnly,
            failures,
            rich,
        })
    }
}
