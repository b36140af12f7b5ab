//! Canvas Crate command-line driver
//!
//! Thin wrapper around the export/import pipeline. Reads and writes plain
//! JSON files; archive packaging is left to other tools.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `CANVAS_CRATE_CONTEXT`, `CANVAS_CRATE_PROFILE`, `CANVAS_CRATE_VOCAB`: vocabulary overrides
//! - `CANVAS_CRATE_SIDE_PAYLOADS`: "inline" or "files" (default: inline)
//! - `RUST_LOG`: Log level filter (default: canvas_crate=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin canvas_crate --features cli -- export canvas.json --out ro-crate-metadata.json
//! cargo run --bin canvas_crate --features cli -- import ro-crate-metadata.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use canvas_crate::graph::ids;
use canvas_crate::{
    export_document, import_container, validate, CanvasDocument, CodecConfig, DisplayState,
    EncodeOptions, GraphContainer, SidePayloadMode,
};

#[derive(Parser)]
#[command(name = "canvas_crate")]
#[command(about = "Convert automation canvas documents to and from RO-Crate metadata")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate and encode a canvas document
    Export {
        /// Canvas document (JSON)
        canvas: PathBuf,

        /// Display-group state to carry along
        #[arg(long)]
        display: Option<PathBuf>,

        /// Schema version tag recorded on the root dataset
        #[arg(long)]
        schema_version: Option<String>,

        /// Write side payloads as files into this directory
        #[arg(long)]
        side_files: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Decode and normalize crate metadata
    Import {
        /// ro-crate-metadata.json
        metadata: PathBuf,

        /// Directory holding side payload files
        #[arg(long)]
        side_files: Option<PathBuf>,
    },
    /// Run the export validator only
    Validate {
        /// Canvas document (JSON)
        canvas: PathBuf,
    },
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "canvas_crate=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Export {
            canvas,
            display,
            schema_version,
            side_files,
            out,
        } => run_export(&canvas, display.as_deref(), schema_version, side_files.as_deref(), out.as_deref()),
        Command::Import { metadata, side_files } => run_import(&metadata, side_files.as_deref()),
        Command::Validate { canvas } => run_validate(&canvas),
    };

    match result {
        Ok(code) => code,
        Err(message) => {
            error!(%message, "Command failed");
            ExitCode::from(2)
        }
    }
}

fn run_export(
    canvas: &Path,
    display: Option<&Path>,
    schema_version: Option<String>,
    side_dir: Option<&Path>,
    out: Option<&Path>,
) -> Result<ExitCode, String> {
    let document: CanvasDocument = read_json(canvas)?;

    let mut config = CodecConfig::from_env();
    if side_dir.is_some() {
        config = config.with_side_payloads(SidePayloadMode::Files);
    }
    let mut options = EncodeOptions::new(config);
    if let Some(path) = display {
        let state: DisplayState = read_json(path)?;
        options = options.with_display_state(state);
    }
    if let Some(version) = schema_version {
        options = options.with_schema_version(version);
    }

    let output = match export_document(&document, &options) {
        Ok(output) => output,
        Err(refused) => {
            for finding in &refused.findings.findings {
                print_line(finding);
            }
            error!(%refused, "Export refused");
            return Ok(ExitCode::from(1));
        }
    };
    for finding in &output.report.findings {
        print_line(finding);
    }

    if let Some(dir) = side_dir {
        fs::create_dir_all(dir).map_err(|e| format!("{}: {}", dir.display(), e))?;
        for file in &output.side_files {
            let path = dir.join(&file.path);
            write_text(&path, &pretty(&file.content)?)?;
        }
    }

    let text = output.container.to_json_pretty();
    match out {
        Some(path) => write_text(path, &text)?,
        None => println!("{}", text),
    }
    info!(
        nodes = output.container.nodes.len(),
        side_files = output.side_files.len(),
        fingerprint = %output.container.fingerprint(),
        "Exported"
    );
    Ok(ExitCode::SUCCESS)
}

fn run_import(metadata: &Path, side_dir: Option<&Path>) -> Result<ExitCode, String> {
    let text = fs::read_to_string(metadata).map_err(|e| format!("{}: {}", metadata.display(), e))?;
    let container = GraphContainer::from_json(&text).map_err(|e| e.to_string())?;

    let mut side_files: HashMap<String, Value> = HashMap::new();
    if let Some(dir) = side_dir {
        let entries = fs::read_dir(dir).map_err(|e| format!("{}: {}", dir.display(), e))?;
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            if name == ids::DESCRIPTOR || !name.ends_with(".json") {
                continue;
            }
            side_files.insert(name, read_json(&path)?);
        }
    }

    let imported = import_container(&container, &side_files).map_err(|e| e.to_string())?;
    for warning in &imported.warnings {
        print_line(warning);
    }
    println!("{}", pretty(&imported.document)?);
    Ok(ExitCode::SUCCESS)
}

fn run_validate(canvas: &Path) -> Result<ExitCode, String> {
    let document: CanvasDocument = read_json(canvas)?;
    let report = validate(&document);
    for finding in &report.findings {
        print_line(finding);
    }
    Ok(if report.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))
}

fn write_text(path: &Path, text: &str) -> Result<(), String> {
    fs::write(path, text).map_err(|e| format!("{}: {}", path.display(), e))
}

fn pretty<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

/// One JSON object per line on stderr.
fn print_line<T: serde::Serialize>(value: &T) {
    if let Ok(line) = serde_json::to_string(value) {
        eprintln!("{}", line);
    }
}
