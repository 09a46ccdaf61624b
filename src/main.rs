use clap::Parser;
use tabnote_conv_rs::cli::{
    read_input, read_input_text, run_conversion, run_decode_pickle, ConversionOptions, PayloadKind,
};
use tabnote_conv_rs::clipboard::PlacementOptions;
use tabnote_conv_rs::generator::OutputType;
use tabnote_conv_rs::get_output_types;

use std::fs::File;
use std::io::{self, Write};
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Type of output
    #[arg(short = 't', long, value_name = "TYPE", value_enum, default_value = "markdown")]
    to_type: OutputType,

    /// Payload to write to the output.
    #[arg(long, value_enum, default_value = "text")]
    emit: PayloadKind,

    /// Place the conversion on the system clipboard.
    #[arg(short = 'c', long)]
    clipboard: bool,

    /// How long one clipboard mechanism may take before the next is tried.
    #[arg(long, value_name = "MS", default_value_t = 5000)]
    timeout_ms: u64,

    /// Decode a Chromium custom MIME container file instead of converting.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["clipboard", "emit"])]
    decode_pickle: Option<String>,

    /// Log clipboard diagnostics to stderr.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Input file (default: stdin)
    input: Option<String>,

    /// Output file (default: stdout, or nothing with --clipboard)
    output: Option<String>,

    /// List available output types
    #[arg(short = 'l', long)]
    list_type: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if cli.list_type {
        println!("type of output:");
        println!("{}", get_output_types().join(" "));
        println!();
        return Ok(());
    }

    // Prepare output writer
    let mut output_writer: Box<dyn Write> = match &cli.output {
        Some(path) if path != "-" => Box::new(File::create(path)?),
        None if cli.clipboard => Box::new(io::sink()),
        _ => Box::new(io::stdout()),
    };

    if let Some(path) = cli.decode_pickle {
        let data = read_input(&Some(path))?;
        return run_decode_pickle(&data, &mut output_writer);
    }

    let input = read_input_text(&cli.input)?;
    let options = ConversionOptions {
        output_type: cli.to_type,
        emit: cli.emit,
        clipboard: cli.clipboard,
        placement: PlacementOptions {
            timeout: Duration::from_millis(cli.timeout_ms),
        },
    };

    if let Some(status) = run_conversion(&input, &mut output_writer, &options)? {
        eprintln!("{}", status);
    }

    Ok(())
}
