//! Format adapters that render a document's markup to HTML.
//!
//! HTML and Markdown are converted in-process and cannot fail. reStructuredText
//! and AsciiDoc are piped through external renderers, so their conversion can
//! fail; callers skip the document when it does.

mod asciidoc;
mod html;
mod markdown;
mod process;
mod rst;

use std::path::PathBuf;
use std::process::ExitStatus;

pub use asciidoc::{ASCIIDOCTOR_ARGS, AsciidocConverter};
pub use html::HtmlConverter;
pub use markdown::MarkdownConverter;
pub use process::run_renderer;
pub use rst::{RST_ARGS, RstConverter};

use crate::models::Format;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Failed to start renderer {program}: {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },
    #[error("Renderer {program} exited with {status}: {stderr}")]
    Exit {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
    #[error("IO error while talking to renderer {program}: {source}")]
    Io {
        program: PathBuf,
        source: std::io::Error,
    },
}

/// Turns document content into an HTML byte stream.
pub trait Converter {
    fn convert(&self, content: &str) -> Result<Vec<u8>, ConvertError>;
}

/// One converter per supported format, configured once per run.
#[derive(Debug, Clone)]
pub struct Renderers {
    pub html: HtmlConverter,
    pub markdown: MarkdownConverter,
    pub rst: RstConverter,
    pub asciidoc: AsciidocConverter,
}

impl Default for Renderers {
    fn default() -> Self {
        Self {
            html: HtmlConverter,
            markdown: MarkdownConverter::default(),
            rst: RstConverter::default(),
            asciidoc: AsciidocConverter::default(),
        }
    }
}

impl Renderers {
    pub fn for_format(&self, format: Format) -> &dyn Converter {
        match format {
            Format::Html => &self.html,
            Format::Markdown => &self.markdown,
            Format::ReStructuredText => &self.rst,
            Format::AsciiDoc => &self.asciidoc,
        }
    }
}
