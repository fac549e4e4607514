use std::collections::BTreeMap;

use html5gum::{DefaultEmitter, Token as RawToken, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    StartTag,
    EndTag,
    Text,
    Comment,
    Doctype,
}

/// A single token from the rendered HTML stream.
///
/// `text` is entity-decoded and whitespace-trimmed; it is empty for tags.
/// Tag names are lowercase as produced by the HTML tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
}

impl Token {
    fn tag(kind: TokenKind, name: &[u8], attributes: BTreeMap<String, String>) -> Self {
        Self {
            kind,
            name: String::from_utf8_lossy(name).into_owned(),
            attributes,
            text: String::new(),
        }
    }

    fn content(kind: TokenKind, text: &[u8]) -> Self {
        Self {
            kind,
            name: String::new(),
            attributes: BTreeMap::new(),
            text: String::from_utf8_lossy(text).trim().to_string(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or_default().split_whitespace()
    }

    pub fn is_tag(&self) -> bool {
        matches!(self.kind, TokenKind::StartTag | TokenKind::EndTag)
    }
}

/// Forward-only token stream over rendered HTML.
///
/// Parse errors reported by the underlying tokenizer are recoverable and are
/// skipped; the stream ends when the input is exhausted.
pub struct MarkupTokens<'a> {
    inner: Box<dyn Iterator<Item = RawToken> + 'a>,
}

impl<'a> MarkupTokens<'a> {
    pub fn new(html: &'a str) -> Self {
        let mut emitter = DefaultEmitter::default();
        // Treat <script>/<style> bodies as raw text the way a browser would.
        emitter.naively_switch_states(true);

        Self {
            inner: Box::new(
                Tokenizer::new_with_emitter(html, emitter).map(|result| match result {
                    Ok(token) => token,
                    Err(never) => match never {},
                }),
            ),
        }
    }
}

impl Iterator for MarkupTokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let token = match self.inner.next()? {
                RawToken::StartTag(tag) => {
                    let attributes = tag
                        .attributes
                        .iter()
                        .map(|(key, value)| {
                            (
                                String::from_utf8_lossy(key.as_slice()).into_owned(),
                                String::from_utf8_lossy(value.as_slice()).into_owned(),
                            )
                        })
                        .collect();
                    Token::tag(TokenKind::StartTag, tag.name.as_slice(), attributes)
                }
                RawToken::EndTag(tag) => {
                    Token::tag(TokenKind::EndTag, tag.name.as_slice(), BTreeMap::new())
                }
                RawToken::String(text) => Token::content(TokenKind::Text, text.as_slice()),
                RawToken::Comment(text) => Token::content(TokenKind::Comment, text.as_slice()),
                RawToken::Doctype(_) => Token::content(TokenKind::Doctype, b""),
                RawToken::Error(error) => {
                    log::trace!("tolerated HTML tokenizer error: {error:?}");
                    continue;
                }
            };
            return Some(token);
        }
    }
}

/// Tokenize a complete HTML string.
pub fn tokenize(html: &str) -> MarkupTokens<'_> {
    MarkupTokens::new(html)
}
