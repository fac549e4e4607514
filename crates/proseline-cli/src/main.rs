use anyhow::{Context as _, Result};
use clap::Parser;
use proseline_config::Config;
use proseline_engine::convert::{AsciidocConverter, RstConverter};
use proseline_engine::{
    ConvertError, Document, ExtractOptions, ExtractedSpan, Format, ProseSink, Renderers, io,
    lint_document,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

/// Extract lintable prose from HTML, Markdown, reStructuredText and AsciiDoc files.
#[derive(Debug, Parser)]
#[command(name = "proseline")]
#[command(version)]
struct Cli {
    /// Config file to use instead of ~/.config/proseline/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print one JSON object per span instead of plain text.
    #[arg(long)]
    json: bool,

    /// Added to every reported line number.
    #[arg(long, value_name = "N", default_value_t = 0)]
    line_offset: usize,

    /// Files or directories to extract prose from.
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<PathBuf>,
}

/// Prints spans as they are extracted from one document.
struct Printer<'a, W: Write> {
    path: &'a Path,
    json: bool,
    out: W,
    failed: bool,
}

impl<W: Write> Printer<'_, W> {
    fn print(&mut self, span: &ExtractedSpan) {
        let written = if self.json {
            serde_json::to_string(span)
                .map_err(std::io::Error::from)
                .and_then(|line| writeln!(self.out, "{line}"))
        } else {
            writeln!(
                self.out,
                "{}:{}:{} {} {}",
                self.path.display(),
                span.line,
                span.column,
                span.scope,
                span.text.replace('\n', " ")
            )
        };
        if let Err(e) = written {
            log::error!("failed to write output: {e}");
        }
    }
}

impl<W: Write> ProseSink for Printer<'_, W> {
    fn lint_prose(&mut self, _context: &str, span: ExtractedSpan) {
        self.print(&span);
    }

    fn lint_heading(&mut self, _context: &str, _label: &str, span: ExtractedSpan) {
        self.print(&span);
    }

    fn accumulate_comment(&mut self, text: &str) {
        log::trace!("{}: comment {text:?}", self.path.display());
    }

    fn report_error(&mut self, error: &ConvertError) {
        eprintln!("Warning: skipping {}: {error}", self.path.display());
        self.failed = true;
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("config file not found: {}", path.display()))?,
        None => Config::load()?.unwrap_or_default(),
    };
    Ok(loaded)
}

fn build_renderers(config: &Config) -> Renderers {
    Renderers {
        rst: RstConverter::new(
            config.renderers.python.clone(),
            config.renderers.resolve_rst2html(),
        ),
        asciidoc: AsciidocConverter::new(config.renderers.resolve_asciidoctor()),
        ..Renderers::default()
    }
}

fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(io::scan_documents(path)?);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn read(path: &Path, config: &Config) -> Result<Document> {
    let format = config
        .format_for(path)
        .map(str::parse::<Format>)
        .transpose()?;
    Ok(io::read_document(path, format)?)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let options = ExtractOptions::new(&config.skip_tags, &config.skip_classes);
    let renderers = build_renderers(&config);

    let mut unreadable = 0;
    let stdout = std::io::stdout();
    for path in collect_files(&cli.paths)? {
        let doc = match read(&path, &config) {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("Error: {}: {e}", path.display());
                unreadable += 1;
                continue;
            }
        };

        let mut printer = Printer {
            path: &path,
            json: cli.json,
            out: stdout.lock(),
            failed: false,
        };
        lint_document(&doc, &renderers, cli.line_offset, &options, &mut printer);
        if printer.failed {
            log::info!("no spans extracted from {}", path.display());
        }
    }

    if unreadable > 0 {
        process::exit(1);
    }
    Ok(())
}
