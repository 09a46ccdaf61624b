//! Plain-text last resort, available on every platform.

use super::{BackendError, ClipboardBackend, PlacementRequest};
use std::time::Duration;

/// Places `PlacementRequest::last_resort_text` through `arboard`.
#[derive(Debug, Default)]
pub struct TextBackend;

impl TextBackend {
    pub fn new() -> Self {
        TextBackend
    }
}

/// On Linux the selection is served by this process, so the text is gone once
/// it exits. Keep serving it until another owner (usually a clipboard
/// manager) takes the selection over, or until `timeout` has passed.
#[cfg(target_os = "linux")]
fn set_text(clipboard: &mut arboard::Clipboard, text: &str, timeout: Duration) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;
    use std::time::Instant;

    clipboard
        .set()
        .wait_until(Instant::now() + timeout)
        .text(text.to_string())
}

#[cfg(not(target_os = "linux"))]
fn set_text(clipboard: &mut arboard::Clipboard, text: &str, _timeout: Duration) -> Result<(), arboard::Error> {
    clipboard.set_text(text.to_string())
}

impl ClipboardBackend for TextBackend {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn place(&mut self, request: &PlacementRequest, timeout: Duration) -> Result<(), BackendError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| BackendError::Os(format!("failed to open clipboard: {}", e)))?;
        set_text(&mut clipboard, &request.last_resort_text, timeout)
            .map_err(|e| BackendError::Os(format!("failed to set clipboard text: {}", e)))
    }
}
