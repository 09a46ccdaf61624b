//! Native Win32 clipboard writer.

use super::{BackendError, ClipboardBackend, ClipboardFormat, PlacementRequest};
use clipboard_win::{formats, raw, register_format, Clipboard};
use log::{debug, warn};
use std::thread;
use std::time::{Duration, Instant};

const RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// Writes every payload in one `OpenClipboard`/`CloseClipboard` session.
#[derive(Debug, Default)]
pub struct NativeBackend;

impl NativeBackend {
    pub fn new() -> Self {
        NativeBackend
    }

    /// Opens the clipboard, retrying while another process holds it.
    fn open(timeout: Duration) -> Result<Clipboard, BackendError> {
        let deadline = Instant::now() + timeout;
        loop {
            match Clipboard::new() {
                Ok(clipboard) => return Ok(clipboard),
                Err(e) if Instant::now() >= deadline => {
                    debug!("OpenClipboard kept failing: {}", e);
                    return Err(BackendError::Timeout(timeout));
                }
                Err(_) => thread::sleep(RETRY_INTERVAL),
            }
        }
    }

    fn format_id(format: ClipboardFormat) -> Result<u32, BackendError> {
        match format {
            ClipboardFormat::UnicodeText => Ok(formats::CF_UNICODETEXT),
            other => register_format(other.name())
                .map(|id| id.get())
                .ok_or_else(|| BackendError::Os(format!("could not register {}", other.name()))),
        }
    }
}

impl ClipboardBackend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn place(&mut self, request: &PlacementRequest, timeout: Duration) -> Result<(), BackendError> {
        let _clipboard = Self::open(timeout)?;
        raw::empty().map_err(|e| BackendError::Os(format!("EmptyClipboard failed: {}", e)))?;

        for payload in &request.payloads {
            // Readers expect a terminator; two bytes also covers UTF-16.
            let mut data = Vec::with_capacity(payload.bytes.len() + 2);
            data.extend_from_slice(&payload.bytes);
            data.extend_from_slice(&[0, 0]);

            let result = Self::format_id(payload.format).and_then(|id| {
                raw::set_without_clear(id, &data).map_err(|e| {
                    BackendError::Os(format!("SetClipboardData {} failed: {}", payload.format.name(), e))
                })
            });
            match result {
                Ok(()) => debug!("set {} ({} bytes)", payload.format.name(), payload.bytes.len()),
                // Apps still get CF_HTML and plain text without the custom map.
                Err(e) if payload.format == ClipboardFormat::ChromiumCustomMime => {
                    warn!("{}", e)
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}
