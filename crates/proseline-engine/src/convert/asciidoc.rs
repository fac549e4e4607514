use std::path::PathBuf;

use super::{ConvertError, Converter, run_renderer};

/// Flags passed to `asciidoctor`: body only, quiet, secure safe mode, read stdin.
pub const ASCIIDOCTOR_ARGS: [&str; 5] = ["-s", "--quiet", "--safe-mode", "secure", "-"];

/// AsciiDoc rendered by piping through `asciidoctor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciidocConverter {
    pub program: PathBuf,
}

impl Default for AsciidocConverter {
    fn default() -> Self {
        Self {
            program: PathBuf::from("asciidoctor"),
        }
    }
}

impl AsciidocConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Converter for AsciidocConverter {
    fn convert(&self, content: &str) -> Result<Vec<u8>, ConvertError> {
        run_renderer(&self.program, &ASCIIDOCTOR_ARGS, content.as_bytes())
    }
}
