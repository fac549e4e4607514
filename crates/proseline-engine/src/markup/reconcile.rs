/// The unconsumed remainder of a document's original source.
///
/// Rendering can reorder, decode or strip content, so rendered text cannot be
/// mapped onto source offsets directly. Instead every piece of rendered text
/// is searched for in the remainder and removed once found, which moves an
/// implicit cursor through the source. Each remaining byte remembers its
/// offset in the original document so a match can be reported as a position.
///
/// The remainder only ever shrinks.
#[derive(Debug, Clone)]
pub struct Context {
    remaining: String,
    origins: Vec<usize>,
}

impl Context {
    pub fn new(source: &str) -> Self {
        Self {
            remaining: source.to_string(),
            origins: (0..source.len()).collect(),
        }
    }

    /// The source text not yet matched by any token.
    pub fn remaining(&self) -> &str {
        &self.remaining
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Original offset of the first line of `text` (or failing that, of its
    /// first word) within the remainder, without consuming anything.
    pub fn locate(&self, text: &str) -> Option<usize> {
        let line = text.lines().map(str::trim).find(|line| !line.is_empty())?;
        self.find(line).or_else(|| {
            line.split_whitespace()
                .flat_map(|word| std::iter::once(word).chain(sub_words(word)))
                .find_map(|word| self.find(word))
        })
    }

    /// Remove `text` from the remainder line by line, returning the original
    /// offset of the first piece that matched.
    ///
    /// A line found verbatim is removed whole. Otherwise each whitespace
    /// separated word is removed on its own. A word that still does not match
    /// is split at punctuation and only its last piece present in the
    /// remainder is removed; earlier pieces are left for later tokens.
    /// Text that cannot be found leaves the remainder untouched.
    pub fn consume(&mut self, text: &str) -> Option<usize> {
        let mut first = None;

        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if let Some(origin) = self.remove(line) {
                first = first.or(Some(origin));
                continue;
            }

            for word in line.split_whitespace() {
                let origin = match self.remove(word) {
                    Some(origin) => Some(origin),
                    None => sub_words(word).rev().find_map(|piece| self.remove(piece)),
                };
                if origin.is_none() {
                    log::trace!("no source match for {word:?}");
                }
                first = first.or(origin);
            }
        }

        first
    }

    fn find(&self, needle: &str) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        self.remaining.find(needle).map(|idx| self.origins[idx])
    }

    fn remove(&mut self, needle: &str) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let start = self.remaining.find(needle)?;
        let end = start + needle.len();
        let origin = self.origins[start];

        self.remaining.replace_range(start..end, "");
        self.origins.drain(start..end);
        Some(origin)
    }
}

/// Alphanumeric runs inside a word, e.g. `Hello` and `world` in `Hello-world`.
/// Yields nothing when the word has no inner punctuation.
fn sub_words(word: &str) -> impl DoubleEndedIterator<Item = &str> {
    let pieces: Vec<&str> = word
        .split(|c: char| !c.is_alphanumeric())
        .filter(|piece| !piece.is_empty())
        .collect();
    let split = pieces.len() > 1 || pieces.first().is_some_and(|piece| *piece != word);
    pieces.into_iter().filter(move |_| split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_whole_line_is_removed() {
        let mut ctx = Context::new("Intro\nHello world\nOutro");

        assert_eq!(ctx.consume("Hello world"), Some(6));
        assert!(!ctx.remaining().contains("Hello world"));
        assert_eq!(ctx.remaining(), "Intro\n\nOutro");
    }

    #[test]
    fn test_word_fallback_when_line_does_not_match() {
        let mut ctx = Context::new("Hello world is great");

        assert_eq!(ctx.consume("Hello-world"), Some(6));
        assert!(!ctx.remaining().contains("world"));
        assert!(ctx.remaining().contains("Hello"));
        assert!(ctx.remaining().contains("is"));
        assert!(ctx.remaining().contains("great"));
        assert_eq!(ctx.remaining(), "Hello  is great");
    }

    #[test]
    fn test_punctuated_word_falls_back_to_earlier_piece() {
        let mut ctx = Context::new("see the note here");

        // "it" is absent, so the piece before it is the one removed.
        assert_eq!(ctx.consume("note/it"), Some(8));
        assert_eq!(ctx.remaining(), "see the  here");
    }

    #[test]
    fn test_words_are_removed_independently_of_order() {
        let mut ctx = Context::new("alpha beta gamma");

        // Rendered text reordered the words, so no whole-line match exists.
        assert_eq!(ctx.consume("gamma alpha"), Some(11));
        assert_eq!(ctx.remaining(), " beta ");
    }

    #[test]
    fn test_multi_line_text_is_matched_per_line() {
        let mut ctx = Context::new("* first item\n* second item\n");

        assert_eq!(ctx.consume("first item\nsecond item"), Some(2));
        assert_eq!(ctx.remaining(), "* \n* \n");
    }

    #[test]
    fn test_miss_leaves_context_unchanged() {
        let mut ctx = Context::new("Some source text");

        assert_eq!(ctx.consume("unrelated"), None);
        assert_eq!(ctx.remaining(), "Some source text");
        assert_eq!(ctx.consume(""), None);
        assert_eq!(ctx.consume("   \n  "), None);
        assert_eq!(ctx.len(), 16);
    }

    #[test]
    fn test_context_never_grows() {
        let mut ctx = Context::new("a b c a b c");
        let mut previous = ctx.len();

        for text in ["a", "b c", "zzz", "c a", "a b c", "b"] {
            ctx.consume(text);
            assert!(ctx.len() <= previous);
            previous = ctx.len();
        }
        assert!(!ctx.is_empty());
    }

    #[test]
    fn test_exhausted_context() {
        let mut ctx = Context::new("done");

        assert_eq!(ctx.consume("done"), Some(0));
        assert!(ctx.is_empty());
        assert_eq!(ctx.consume("done"), None);
        assert_eq!(ctx.locate("done"), None);
    }

    #[test]
    fn test_origins_survive_earlier_removals() {
        let mut ctx = Context::new("one two one two");

        assert_eq!(ctx.consume("one"), Some(0));
        assert_eq!(ctx.consume("one"), Some(8));
        assert_eq!(ctx.locate("two"), Some(4));
        assert_eq!(ctx.consume("two"), Some(4));
        assert_eq!(ctx.locate("two"), Some(12));
    }

    #[test]
    fn test_locate_does_not_consume() {
        let ctx = Context::new("# Title\n\nBody text");

        assert_eq!(ctx.locate("Body text"), Some(9));
        assert_eq!(ctx.locate("Title"), Some(2));
        assert_eq!(ctx.locate("Body, text"), Some(9));
        assert_eq!(ctx.locate("missing"), None);
        assert_eq!(ctx.remaining(), "# Title\n\nBody text");
    }

    #[test]
    fn test_sub_words() {
        assert_eq!(sub_words("Hello-world").collect::<Vec<_>>(), vec!["Hello", "world"]);
        assert_eq!(sub_words("(note)").collect::<Vec<_>>(), vec!["note"]);
        assert!(sub_words("plain").next().is_none());
        assert!(sub_words("--").next().is_none());
    }
}
