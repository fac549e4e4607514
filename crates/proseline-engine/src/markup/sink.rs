use crate::convert::ConvertError;
use crate::models::ExtractedSpan;

/// Receiver for everything an extraction pass produces.
///
/// `context` is the still-unconsumed source text at the moment the span was
/// found, for checks that need to match patterns against the original markup.
pub trait ProseSink {
    fn lint_prose(&mut self, context: &str, span: ExtractedSpan);

    /// `label` is the heading scope, e.g. `text.heading.md`.
    fn lint_heading(&mut self, context: &str, label: &str, span: ExtractedSpan);

    fn accumulate_comment(&mut self, text: &str);

    /// Called instead of any span callbacks when a document cannot be rendered.
    fn report_error(&mut self, error: &ConvertError) {
        log::warn!("skipping document: {error}");
    }
}

/// A [`ProseSink`] that simply records what it is given.
#[derive(Debug, Default)]
pub struct SpanCollector {
    pub spans: Vec<ExtractedSpan>,
    pub comments: Vec<String>,
    pub errors: Vec<String>,
}

impl SpanCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

impl ProseSink for SpanCollector {
    fn lint_prose(&mut self, _context: &str, span: ExtractedSpan) {
        self.spans.push(span);
    }

    fn lint_heading(&mut self, _context: &str, _label: &str, span: ExtractedSpan) {
        self.spans.push(span);
    }

    fn accumulate_comment(&mut self, text: &str) {
        self.comments.push(text.to_string());
    }

    fn report_error(&mut self, error: &ConvertError) {
        log::warn!("skipping document: {error}");
        self.errors.push(error.to_string());
    }
}
