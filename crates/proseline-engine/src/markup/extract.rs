use crate::convert::Renderers;
use crate::models::{Document, ExtractedSpan, Role};

use super::classify::{BlockClassifier, Class, ExtractOptions};
use super::reconcile::Context;
use super::sink::{ProseSink, SpanCollector};
use super::tokenizer::{Token, TokenKind, tokenize};

/// Attributes whose values appear in the source as text and must be consumed
/// from the context even though they never become spans.
const TEXT_ATTRIBUTES: [&str; 2] = ["alt", "href"];

/// Run one extraction pass over `html`, the rendered form of `doc`.
///
/// Spans are dispatched to `sink` in document order. `line_offset` is added to
/// every line number, for documents embedded in a larger file.
pub fn extract_spans<S: ProseSink + ?Sized>(
    doc: &Document,
    html: &str,
    line_offset: usize,
    options: &ExtractOptions,
    sink: &mut S,
) {
    let mut classifier = BlockClassifier::new(options);
    let mut context = Context::new(doc.content());
    // Source offset of the last text matched; fallback position for spans
    // whose text cannot be found in the remaining context.
    let mut cursor = 0;

    for token in tokenize(html) {
        consume_attributes(&mut context, &token);

        match classifier.classify(&token) {
            Class::Comment => sink.accumulate_comment(&token.text),
            Class::Prose => {
                let span = make_span(doc, &context, &token, Role::Prose, cursor, line_offset);
                sink.lint_prose(context.remaining(), span);
            }
            Class::Heading => {
                let span = make_span(doc, &context, &token, Role::Heading, cursor, line_offset);
                let label = span.scope.clone();
                sink.lint_heading(context.remaining(), &label, span);
            }
            _ => {}
        }

        if matches!(token.kind, TokenKind::Text | TokenKind::Comment)
            && let Some(origin) = context.consume(&token.text)
        {
            cursor = origin;
        }
    }
}

/// Render `doc` with the matching converter and extract its spans.
///
/// A document that fails to render produces no spans; the failure goes to
/// [`ProseSink::report_error`] and the caller carries on with other documents.
pub fn lint_document<S: ProseSink + ?Sized>(
    doc: &Document,
    renderers: &Renderers,
    line_offset: usize,
    options: &ExtractOptions,
    sink: &mut S,
) {
    log::debug!("extracting {} document ({} lines)", doc.format(), doc.line_count());

    match renderers.for_format(doc.format()).convert(doc.content()) {
        Ok(html) => {
            let html = String::from_utf8_lossy(&html);
            extract_spans(doc, &html, line_offset, options, sink);
        }
        Err(error) => sink.report_error(&error),
    }
}

/// Convenience wrapper around [`lint_document`] that collects the results.
pub fn extract_document(
    doc: &Document,
    renderers: &Renderers,
    line_offset: usize,
    options: &ExtractOptions,
) -> SpanCollector {
    let mut collector = SpanCollector::new();
    lint_document(doc, renderers, line_offset, options, &mut collector);
    collector
}

fn consume_attributes(context: &mut Context, token: &Token) {
    if token.kind != TokenKind::StartTag || !matches!(token.name.as_str(), "img" | "a") {
        return;
    }
    for key in TEXT_ATTRIBUTES {
        if let Some(value) = token.attribute(key) {
            context.consume(value);
        }
    }
}

fn make_span(
    doc: &Document,
    context: &Context,
    token: &Token,
    role: Role,
    cursor: usize,
    line_offset: usize,
) -> ExtractedSpan {
    let origin = context.locate(&token.text).unwrap_or(cursor);
    let (line, column) = doc.position(origin);

    ExtractedSpan {
        text: token.text.clone(),
        role,
        scope: role.scope(doc.real_ext()),
        line: line + line_offset,
        column,
    }
}
