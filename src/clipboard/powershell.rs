//! PowerShell + .NET fallback writer.
//!
//! Sets `HTML Format` and Unicode text through `System.Windows.Forms`. It has
//! no way to set the Chromium custom MIME format, so Slack loses nested lists
//! when this tier is used.

use super::{BackendError, ClipboardBackend, ClipboardFormat, PlacementRequest};
use log::{debug, warn};
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Quotes `text` as a single-quoted PowerShell literal.
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Builds the script that loads the CF_HTML bytes from `html_path` and sets
/// them together with `plain_text` in one data object.
pub fn build_script(html_path: &str, plain_text: &str) -> String {
    [
        "Add-Type -AssemblyName System.Windows.Forms".to_string(),
        format!("$bytes = [System.IO.File]::ReadAllBytes({})", quote(html_path)),
        "$stream = New-Object System.IO.MemoryStream(,$bytes)".to_string(),
        "$dataObj = New-Object System.Windows.Forms.DataObject".to_string(),
        "$dataObj.SetData(\"HTML Format\", $stream)".to_string(),
        format!(
            "$dataObj.SetData([System.Windows.Forms.DataFormats]::UnicodeText, {})",
            quote(plain_text)
        ),
        "[System.Windows.Forms.Clipboard]::SetDataObject($dataObj, $true)".to_string(),
    ]
    .join("; ")
}

/// Reads a child pipe to the end on its own thread so the child never blocks
/// on a full pipe while it is being polled.
fn drain(mut pipe: impl Read + Send + 'static) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut bytes) {
            debug!("failed to read powershell stderr: {}", e);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

/// Waits for `child`, killing it once `timeout` has passed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus, BackendError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            if let Err(e) = child.kill() {
                debug!("failed to kill powershell: {}", e);
            }
            let _ = child.wait();
            return Err(BackendError::Timeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Runs `powershell -Command` with the CF_HTML payload staged in a temp file.
#[derive(Debug)]
pub struct PowerShellBackend {
    program: String,
}

impl PowerShellBackend {
    pub fn new() -> Self {
        Self::with_program("powershell")
    }

    /// Runs `program` instead of `powershell` from `PATH`.
    pub fn with_program(program: &str) -> Self {
        PowerShellBackend {
            program: program.to_string(),
        }
    }

    fn command(&self, script: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["-NoProfile", "-NonInteractive", "-Command", script])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }
        command
    }
}

impl Default for PowerShellBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardBackend for PowerShellBackend {
    fn name(&self) -> &'static str {
        "powershell"
    }

    fn place(&mut self, request: &PlacementRequest, timeout: Duration) -> Result<(), BackendError> {
        let html = request
            .payload(ClipboardFormat::Html)
            .ok_or(BackendError::MissingPayload(ClipboardFormat::Html.name()))?;
        let plain_text = request
            .payload(ClipboardFormat::UnicodeText)
            .and_then(|p| p.to_text())
            .ok_or(BackendError::MissingPayload(ClipboardFormat::UnicodeText.name()))?;
        if request.payload(ClipboardFormat::ChromiumCustomMime).is_some() {
            warn!("powershell fallback cannot set the Chromium custom MIME format; skipping it");
        }

        // Removed when dropped, after powershell has exited.
        let mut staged = tempfile::Builder::new()
            .prefix("tabnote-clipboard")
            .suffix(".bin")
            .tempfile()?;
        staged.write_all(&html.bytes)?;
        staged.flush()?;

        let script = build_script(&staged.path().to_string_lossy(), &plain_text);
        let mut child = self.command(&script).spawn()?;
        let stderr_reader = child.stderr.take().map(drain);
        let status = wait_with_timeout(&mut child, timeout)?;

        if !status.success() {
            let stderr = stderr_reader
                .and_then(|reader| reader.join().ok())
                .unwrap_or_default();
            return Err(BackendError::Command {
                command: "powershell",
                status,
                stderr: stderr.trim().to_string(),
            });
        }

        debug!("powershell placed {} bytes of CF_HTML", html.bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::tests::RecordingBackend;
    use crate::clipboard::{
        ClipboardPayload, Placement, PlacementError, PlacementOptions, PlacementStrategy,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    fn html_request() -> PlacementRequest {
        PlacementRequest {
            payloads: vec![
                ClipboardPayload::new(ClipboardFormat::Html, b"Version:0.9".to_vec()),
                ClipboardPayload::unicode_text("text"),
            ],
            last_resort_text: "<p>text</p>".to_string(),
        }
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("it's"), "'it''s'");
        assert_eq!(quote(r"C:\tmp\x.bin"), r"'C:\tmp\x.bin'");
    }

    #[test]
    fn test_build_script() {
        let script = build_script(r"C:\tmp\a.bin", "# Don't\n");
        assert!(script.starts_with("Add-Type -AssemblyName System.Windows.Forms; "));
        assert!(script.contains(r"ReadAllBytes('C:\tmp\a.bin')"));
        assert!(script.contains("UnicodeText, '# Don''t\n')"));
        assert!(script.ends_with("SetDataObject($dataObj, $true)"));
    }

    #[test]
    fn test_missing_html_payload() {
        let request = PlacementRequest {
            payloads: vec![ClipboardPayload::unicode_text("text")],
            last_resort_text: "text".to_string(),
        };
        let result = PowerShellBackend::new().place(&request, Duration::from_millis(10));
        assert!(matches!(
            result,
            Err(BackendError::MissingPayload("HTML Format"))
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_wait_with_timeout_kills_slow_child() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let started = Instant::now();
        let result = wait_with_timeout(&mut child, Duration::from_millis(200));

        assert!(matches!(
            result,
            Err(BackendError::Timeout(timeout)) if timeout == Duration::from_millis(200)
        ));
        assert!(started.elapsed() < Duration::from_secs(2));
        // Killed and reaped, so there is nothing left to wait for.
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    #[cfg(unix)]
    fn test_wait_with_timeout_returns_exit_status() {
        let mut child = Command::new("true").spawn().unwrap();
        let status = wait_with_timeout(&mut child, Duration::from_secs(5)).unwrap();
        assert!(status.success());
    }

    #[test]
    #[cfg(unix)]
    fn test_drain_collects_output_of_chatty_child() {
        let mut child = Command::new("sh")
            .args(["-c", "head -c 200000 /dev/zero | tr '\\0' x >&2; exit 3"])
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        let reader = child.stderr.take().map(drain).unwrap();
        let status = wait_with_timeout(&mut child, Duration::from_secs(5)).unwrap();

        assert_eq!(status.code(), Some(3));
        assert_eq!(reader.join().unwrap().len(), 200_000);
    }

    #[test]
    fn test_missing_program_falls_through_to_plain_text() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut strategy = PlacementStrategy::with_backends(
            None,
            Some(Box::new(PowerShellBackend::with_program(
                "/nonexistent/tabnote/powershell",
            ))),
            Box::new(RecordingBackend {
                name: "text",
                fail: false,
                calls: Rc::clone(&calls),
            }),
            PlacementOptions::default(),
        );

        let report = strategy.place(&html_request()).unwrap();
        assert_eq!(report.placement, Placement::PlainTextOnly);
        assert!(matches!(
            report.failures.as_slice(),
            [PlacementError::FallbackMechanismFailed(_)]
        ));
        assert_eq!(*calls.borrow(), vec!["text"]);
    }
}
