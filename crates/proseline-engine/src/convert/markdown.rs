use std::ops::Range;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use super::{ConvertError, Converter};

/// In-process Markdown rendering with tables and fenced code.
///
/// Void elements are written XHTML-style (`<br />`, `<hr />`). Emphasis never
/// starts or ends inside a word: CommonMark already refuses it for `_`, and
/// `*` delimiters touching a letter or digit are written back as text.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownConverter {
    options: Options,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES,
        }
    }
}

impl MarkdownConverter {
    pub fn render(&self, content: &str) -> String {
        let parser = Parser::new_ext(content, self.options).into_offset_iter();
        let mut out = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut out, literal_intra_word_emphasis(content, parser));
        out
    }
}

fn literal_intra_word_emphasis<'a>(
    source: &'a str,
    events: impl Iterator<Item = (Event<'a>, Range<usize>)>,
) -> impl Iterator<Item = Event<'a>> {
    // One entry per open emphasis; `Some` holds the delimiter emitted as text.
    let mut open: Vec<Option<&'a str>> = Vec::new();

    events.map(move |(event, range)| match event {
        Event::Start(tag @ (Tag::Emphasis | Tag::Strong)) => {
            let width = if matches!(tag, Tag::Strong) { 2 } else { 1 };
            let delimiter = intra_word_delimiter(source, &range, width);
            open.push(delimiter);
            match delimiter {
                Some(delimiter) => Event::Text(CowStr::Borrowed(delimiter)),
                None => Event::Start(tag),
            }
        }
        Event::End(end @ (TagEnd::Emphasis | TagEnd::Strong)) => match open.pop().flatten() {
            Some(delimiter) => Event::Text(CowStr::Borrowed(delimiter)),
            None => Event::End(end),
        },
        other => other,
    })
}

/// The opening delimiter of the emphasis spanning `range`, if a letter or digit
/// sits directly outside it.
fn intra_word_delimiter<'a>(
    source: &'a str,
    range: &Range<usize>,
    width: usize,
) -> Option<&'a str> {
    let before = source.get(..range.start).and_then(|s| s.chars().next_back());
    let after = source.get(range.end..).and_then(|s| s.chars().next());
    if !before.into_iter().chain(after).any(char::is_alphanumeric) {
        return None;
    }
    source
        .get(range.start..range.start + width)
        .filter(|delimiter| delimiter.chars().all(|c| c == '*' || c == '_'))
}

impl Converter for MarkdownConverter {
    fn convert(&self, content: &str) -> Result<Vec<u8>, ConvertError> {
        Ok(self.render(content).into_bytes())
    }
}
