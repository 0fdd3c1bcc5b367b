//! `html2dream`: read HTML, write dream-html source.

use clap::{ArgAction, Parser, ValueEnum};
use facet::Facet;
use html2dream::{ClassificationTables, MarkupNode, TranspileOptions, Transpiled, Transpiler};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "html2dream", author, version, about)]
struct Cli {
    /// HTML file to read (default: stdin)
    input: Option<PathBuf>,

    /// Write the DSL source here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Built-in classification tables
    #[arg(long, value_enum, default_value_t = TablesChoice::Extended)]
    tables: TablesChoice,

    /// Load classification tables from a JSON file instead
    #[arg(long, value_name = "FILE", conflicts_with = "tables")]
    tables_file: Option<PathBuf>,

    /// Transpile each top-level node of <head> and <body> instead of the <html> root
    #[arg(long)]
    fragment: bool,

    /// Reject <option> elements with neither text nor a value
    #[arg(long)]
    strict: bool,

    /// Drop whitespace-only text nodes
    #[arg(long)]
    skip_blank_text: bool,

    /// Exit with an error if any node was skipped
    #[arg(long)]
    deny_warnings: bool,

    /// More logging (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TablesChoice {
    /// HTML attributes only
    Minimal,
    /// HTML plus Aria and Hx namespaces
    Extended,
}

#[derive(Facet, Debug)]
#[facet(derive(Error))]
#[repr(u8)]
enum CliError {
    /// failed to read {path}: {message}
    Read { path: String, message: String },

    /// failed to write {path}: {message}
    Write { path: String, message: String },

    /// bad tables file {path}: {message}
    Tables { path: String, message: String },

    /// transpile failed: {message}
    Transpile { message: String },

    /// {count} node(s) skipped and --deny-warnings is set
    Warnings { count: usize },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("html2dream: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let tables = load_tables(cli)?;
    let html = read_input(cli.input.as_deref())?;

    let mut options = TranspileOptions::new();
    if cli.strict {
        options = options.require_option_labels();
    }
    if cli.skip_blank_text {
        options = options.skip_blank_text();
    }
    let transpiler = Transpiler::new(&tables).with_options(options);

    let out = if cli.fragment {
        transpile_fragment(&transpiler, &html, cli.skip_blank_text)?
    } else {
        let doc = html2dream::parse_document(&html);
        tracing::debug!(doctype = ?doc.doctype, "parsed document");
        transpiler
            .transpile_document(&doc)
            .map_err(|e| CliError::Transpile { message: e.to_string() })?
    };

    check_warnings(&out, cli.deny_warnings)?;
    write_output(cli.output.as_deref(), &out.source)
}

fn check_warnings(out: &Transpiled, deny: bool) -> Result<(), CliError> {
    if deny && !out.warnings.is_empty() {
        return Err(CliError::Warnings {
            count: out.warnings.len(),
        });
    }
    Ok(())
}

fn load_tables(cli: &Cli) -> Result<ClassificationTables, CliError> {
    let Some(path) = &cli.tables_file else {
        return Ok(match cli.tables {
            TablesChoice::Minimal => ClassificationTables::minimal(),
            TablesChoice::Extended => ClassificationTables::extended(),
        });
    };

    let json = std::fs::read_to_string(path).map_err(|e| CliError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let tables = ClassificationTables::from_json(&json).map_err(|e| CliError::Tables {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), "loaded tables");
    Ok(tables)
}

/// Transpile every top-level head and body node and join them with blank lines.
fn transpile_fragment(
    transpiler: &Transpiler<'_>,
    html: &str,
    skip_blank_text: bool,
) -> Result<Transpiled, CliError> {
    let mut combined = Transpiled::default();

    for node in html2dream::parse_fragment(html) {
        if skip_blank_text && matches!(&node, MarkupNode::Text(t) if t.trim().is_empty()) {
            continue;
        }
        let out = transpiler
            .transpile(&node)
            .map_err(|e| CliError::Transpile { message: e.to_string() })?;
        if out.source.is_empty() {
            combined.warnings.extend(out.warnings);
            continue;
        }
        if !combined.source.is_empty() {
            combined.source.push_str("\n\n");
        }
        combined.source.push_str(&out.source);
        combined.warnings.extend(out.warnings);
    }

    Ok(combined)
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|e| CliError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
        _ => {
            let mut html = String::new();
            io::stdin()
                .read_to_string(&mut html)
                .map_err(|e| CliError::Read {
                    path: "<stdin>".to_string(),
                    message: e.to_string(),
                })?;
            Ok(html)
        }
    }
}

fn write_output(path: Option<&Path>, source: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, source).map_err(|e| CliError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(source.as_bytes())
                .and_then(|()| stdout.write_all(b"\n"))
                .and_then(|()| stdout.flush())
                .map_err(|e| CliError::Write {
                    path: "<stdout>".to_string(),
                    message: e.to_string(),
                })
        }
    }
}
