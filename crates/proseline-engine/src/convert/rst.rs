use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use super::{ConvertError, Converter, run_renderer};

/// Flags passed to `rst2html`: quiet, never halt or report, no file
/// inclusion, no backlinks and no section numbering.
pub const RST_ARGS: [&str; 8] = [
    "--quiet",
    "--halt=5",
    "--report=5",
    "--link-stylesheet",
    "--no-file-insertion",
    "--no-toc-backlinks",
    "--no-footnote-backlinks",
    "--no-section-numbering",
];

fn code_directive() -> &'static Regex {
    static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    DIRECTIVE.get_or_init(|| {
        Regex::new(r"\.\. (?:raw|code(?:-block)?)::(?:[ \t]+\w+)?")
            .expect("Invalid code directive regex")
    })
}

/// reStructuredText rendered by piping through `python rst2html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RstConverter {
    pub python: PathBuf,
    pub script: PathBuf,
}

impl Default for RstConverter {
    fn default() -> Self {
        Self {
            python: PathBuf::from("python"),
            script: PathBuf::from("rst2html.py"),
        }
    }
}

impl RstConverter {
    pub fn new(python: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            script: script.into(),
        }
    }

    /// Replace Sphinx-only code directives with a plain literal block marker
    /// so a stock docutils renders them as `<pre>`.
    pub fn rewrite_directives(content: &str) -> String {
        code_directive().replace_all(content, "::").into_owned()
    }
}

impl Converter for RstConverter {
    fn convert(&self, content: &str) -> Result<Vec<u8>, ConvertError> {
        let script = self.script.to_string_lossy();
        let mut args: Vec<&str> = Vec::with_capacity(RST_ARGS.len() + 1);
        args.push(&script);
        args.extend(RST_ARGS);

        let input = Self::rewrite_directives(content);
        run_renderer(&self.python, &args, input.as_bytes())
    }
}
