//! texdocx CLI - Pandoc JSON filter restoring LaTeX numbering in DOCX output
//!
//! Pandoc runs the filter as `texdocx FORMAT` with the document on stdin and
//! expects the filtered document on stdout, so everything else (logs,
//! warnings) goes to stderr.

#[cfg(feature = "cli")]
use clap::Parser;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use texdocx::{filter_json, FilterError, FilterOptions, FilterResult, OutputFormat};
use tracing::{debug, info};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "texdocx")]
#[command(version)]
#[command(
    about = "Pandoc filter numbering headings, figures, tables, theorems and equations",
    long_about = None
)]
struct Cli {
    /// Output format Pandoc is writing (Pandoc passes it as the first argument)
    format: Option<String>,

    /// Read the Pandoc JSON document from this file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Write the filtered document to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// TOML file with filter options
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory prepended to image paths
    #[arg(long, value_name = "PREFIX")]
    image_prefix: Option<String>,

    /// Indent the first line of top-level paragraphs
    #[arg(long)]
    indent: bool,

    /// Identifier of the bibliography Div
    #[arg(long, value_name = "ID")]
    bibliography_id: Option<String>,

    /// Write a JSON report of assigned numbers and warnings to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Exit with status 1 if any warning was collected
    #[arg(long)]
    strict: bool,

    /// Disable colored warnings
    #[arg(long)]
    no_color: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(feature = "cli")]
fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(!cli.no_color && io::stderr().is_terminal())
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("texdocx: could not install logger: {}", e);
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("texdocx: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "cli")]
fn run(cli: &Cli) -> FilterResult<ExitCode> {
    let options = load_options(cli)?;
    debug!(target_format = ?options.target, "options loaded");

    let input = match cli.input {
        Some(ref path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let output = filter_json(&input, options)?;
    let json = output.to_json()?;

    match cli.output {
        Some(ref path) => {
            fs::write(path, json)?;
            info!(path = %path.display(), "filtered document written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.flush()?;
        }
    }

    let color = !cli.no_color && io::stderr().is_terminal();
    for warning in &output.warnings {
        eprintln!("{}", warning.render(color));
    }

    if let Some(ref path) = cli.report {
        let report = output
            .report()
            .to_json_pretty()
            .map_err(|e| FilterError::json(e.to_string()))?;
        fs::write(path, report)?;
        info!(path = %path.display(), "report written");
    }

    if cli.strict && output.has_warnings() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Option file first, then the format argument, then individual flags.
#[cfg(feature = "cli")]
fn load_options(cli: &Cli) -> FilterResult<FilterOptions> {
    let mut options = match cli.config {
        Some(ref path) => read_options_file(path)?,
        None => FilterOptions::default(),
    };

    if let Some(ref format) = cli.format {
        options.target = OutputFormat::from_pandoc_name(format);
    }
    if let Some(ref prefix) = cli.image_prefix {
        options.image_prefix = prefix.clone();
    }
    if cli.indent {
        options.indent_paragraphs = true;
    }
    if let Some(ref id) = cli.bibliography_id {
        options.bibliography_id = id.clone();
    }
    Ok(options)
}

#[cfg(all(feature = "cli", feature = "config-file"))]
fn read_options_file(path: &std::path::Path) -> FilterResult<FilterOptions> {
    let text = fs::read_to_string(path)?;
    FilterOptions::from_toml_str(&text).map_err(|e| match e {
        FilterError::Config { message } => {
            FilterError::config(format!("{}: {}", path.display(), message))
        }
        other => other,
    })
}

#[cfg(all(feature = "cli", not(feature = "config-file")))]
fn read_options_file(path: &std::path::Path) -> FilterResult<FilterOptions> {
    Err(FilterError::config(format!(
        "cannot read {}: built without the config-file feature",
        path.display()
    )))
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
}
