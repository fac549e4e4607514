use std::fmt;
use std::str::FromStr;

/// Markup dialects the engine knows how to render to HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Html,
    Markdown,
    ReStructuredText,
    AsciiDoc,
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Unknown markup format: {0}")]
    UnknownFormat(String),
}

impl Format {
    /// Map a file extension (with or without the leading dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" | "xhtml" => Some(Format::Html),
            "md" | "markdown" | "mdown" | "mkd" => Some(Format::Markdown),
            "rst" | "rest" => Some(Format::ReStructuredText),
            "adoc" | "asciidoc" | "asc" => Some(Format::AsciiDoc),
            _ => None,
        }
    }

    /// The extension label used when a document has no real extension.
    pub fn default_extension(self) -> &'static str {
        match self {
            Format::Html => ".html",
            Format::Markdown => ".md",
            Format::ReStructuredText => ".rst",
            Format::AsciiDoc => ".adoc",
        }
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Format::Html),
            "markdown" | "md" => Ok(Format::Markdown),
            "rst" | "restructuredtext" => Ok(Format::ReStructuredText),
            "asciidoc" | "adoc" => Ok(Format::AsciiDoc),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Html => "html",
            Format::Markdown => "markdown",
            Format::ReStructuredText => "rst",
            Format::AsciiDoc => "asciidoc",
        };
        f.write_str(name)
    }
}

/// A source document together with an index of where each line starts.
///
/// The line index is the positional source of truth for extracted spans:
/// the reconciler maps rendered text back to a byte offset in `content`,
/// and [`Document::position`] turns that offset into a line and column.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    content: String,
    line_starts: Vec<usize>,
    real_ext: String,
    format: Format,
}

impl Document {
    /// Create a document, labelling it with the format's default extension.
    pub fn new(content: impl Into<String>, format: Format) -> Self {
        Self::with_extension(content, format, format.default_extension())
    }

    /// Create a document with an explicit extension label such as `.markdown`.
    pub fn with_extension(content: impl Into<String>, format: Format, ext: &str) -> Self {
        let content = content.into();
        let line_starts = Self::index_lines(&content);
        let real_ext = if ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{ext}")
        };

        Self {
            content,
            line_starts,
            real_ext,
            format,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Extension label (with leading dot) used to build span scopes.
    pub fn real_ext(&self) -> &str {
        &self.real_ext
    }

    /// Number of lines; a trailing newline does not open a new line.
    pub fn line_count(&self) -> usize {
        if self.content.is_empty() {
            return 0;
        }
        if self.content.ends_with('\n') {
            self.line_starts.len() - 1
        } else {
            self.line_starts.len()
        }
    }

    /// Convert a byte offset into a 1-based line and a 0-based character column.
    ///
    /// Offsets past the end of the content clamp to the end; offsets inside a
    /// multi-byte character are rounded down to the character boundary.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let mut offset = offset.min(self.content.len());
        while !self.content.is_char_boundary(offset) {
            offset -= 1;
        }

        let index = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert - 1,
        };
        let line_start = self.line_starts[index];
        let column = self.content[line_start..offset].chars().count();

        (index + 1, column)
    }

    fn index_lines(content: &str) -> Vec<usize> {
        std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect()
    }
}
