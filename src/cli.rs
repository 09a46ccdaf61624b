use std::fs;
use std::io::{self, Read, Write};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use log::{info, warn};

use crate::clipboard::{PlacementOptions, PlacementStrategy};
use crate::convert::{convert, Conversion};
use crate::generator::OutputType;
use crate::payload::{cf_html, chromium_mime};

/// What to write to the output for a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayloadKind {
    /// The rendered Markdown or HTML text.
    Text,
    /// The CF_HTML payload (HTML and Slack output only).
    CfHtml,
    /// The Chromium custom MIME container (Slack output only).
    Chromium,
}

/// Options for one run of the converter.
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    pub output_type: OutputType,
    pub emit: PayloadKind,
    /// Place the conversion on the system clipboard.
    pub clipboard: bool,
    pub placement: PlacementOptions,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            output_type: OutputType::Markdown,
            emit: PayloadKind::Text,
            clipboard: false,
            placement: PlacementOptions::default(),
        }
    }
}

/// Reads the input file, or stdin for `None` and `-`.
pub fn read_input(input_path: &Option<String>) -> Result<Vec<u8>> {
    match input_path {
        Some(path) if path != "-" => {
            fs::read(path).with_context(|| format!("failed to read {}", path))
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Reads the input as text. Invalid UTF-8 is replaced, never rejected.
pub fn read_input_text(input_path: &Option<String>) -> Result<String> {
    let bytes = read_input(input_path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Returns the bytes of the requested payload for a conversion.
pub fn emit_payload(conversion: &Conversion, kind: PayloadKind) -> Result<Vec<u8>> {
    match (kind, conversion.output_type) {
        (PayloadKind::Text, _) => Ok(conversion.output.clone().into_bytes()),
        (PayloadKind::CfHtml, OutputType::Html | OutputType::Slack) => {
            Ok(cf_html::build(&conversion.output)?.into_bytes())
        }
        (PayloadKind::Chromium, OutputType::Slack) => {
            Ok(chromium_mime::encode_slack_html(&conversion.output)?)
        }
        (kind, output_type) => bail!(
            "Unsupported payload {:?} for output type {}",
            kind,
            output_type.name()
        ),
    }
}

/// Places a conversion on the clipboard and returns the status line.
pub fn place_on_clipboard(conversion: &Conversion, strategy: &mut PlacementStrategy) -> Result<String> {
    let request = conversion.placement_request()?;
    let report = strategy.place(&request)?;
    for failure in &report.failures {
        info!("{}", failure);
    }
    if let Some(notice) = report.notice() {
        warn!("{}", notice);
    }
    Ok(conversion.status_message(&report).to_string())
}

/// Converts `input` and writes the requested payload to `output_writer`.
///
/// # Returns
///
/// The clipboard status line when the conversion was placed on the clipboard.
pub fn run_conversion(
    input: &str,
    output_writer: &mut dyn Write,
    options: &ConversionOptions,
) -> Result<Option<String>> {
    if options.clipboard && input.is_empty() {
        bail!("nothing to convert");
    }

    let conversion = convert(input, options.output_type);

    output_writer.write_all(&emit_payload(&conversion, options.emit)?)?;
    output_writer.flush()?;

    if !options.clipboard {
        return Ok(None);
    }
    let mut strategy = PlacementStrategy::new(options.placement.clone());
    place_on_clipboard(&conversion, &mut strategy).map(Some)
}

/// Decodes a Chromium custom MIME container and writes a readable dump.
pub fn run_decode_pickle(data: &[u8], output_writer: &mut dyn Write) -> Result<()> {
    let entries = chromium_mime::decode(data).context("failed to decode custom MIME data")?;

    writeln!(output_writer, "Total size: {} bytes", data.len())?;
    writeln!(output_writer, "Number of entries: {}", entries.len())?;
    for (i, entry) in entries.iter().enumerate() {
        writeln!(output_writer)?;
        writeln!(output_writer, "--- Entry {} ---", i)?;
        writeln!(output_writer, "MIME type: '{}'", entry.mime_type)?;
        writeln!(
            output_writer,
            "Content length: {} chars",
            entry.content.chars().count()
        )?;
        writeln!(output_writer, "Content:")?;
        writeln!(output_writer, "{}", entry.content)?;
    }
    Ok(())
}
