use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::tokenizer::{Token, TokenKind};

/// Tags whose contents are never treated as prose.
pub const DEFAULT_SKIP_TAGS: [&str; 6] = ["script", "style", "pre", "code", "tt", "figure"];

/// Which regions of a rendered document to exclude from extraction.
///
/// Built once and shared by reference across every document in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub skip_tags: BTreeSet<String>,
    pub skip_classes: BTreeSet<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            skip_tags: DEFAULT_SKIP_TAGS.iter().map(|t| t.to_string()).collect(),
            skip_classes: BTreeSet::new(),
        }
    }
}

impl ExtractOptions {
    pub fn new<T, C>(skip_tags: T, skip_classes: C) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            skip_tags: skip_tags
                .into_iter()
                .map(|t| t.into().to_ascii_lowercase())
                .collect(),
            skip_classes: skip_classes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Skip and heading state for one pass over a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockState {
    /// Currently inside a skip region.
    pub in_block: bool,
    pub is_heading: bool,
}

/// What the classifier decided about a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    EnterSkip,
    ExitSkip,
    EnterHeading,
    ExitHeading,
    Comment,
    Heading,
    Prose,
    Ignore,
}

fn heading_pattern() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"^h[1-9]$").expect("Invalid heading regex"))
}

/// Decides, token by token, whether text is prose, heading text or excluded.
///
/// Skip tracking is a toggle rather than a depth counter: a nested skip start
/// tag keeps skip mode on, and the first skip end tag turns it off again.
#[derive(Debug)]
pub struct BlockClassifier<'a> {
    options: &'a ExtractOptions,
    state: BlockState,
    // Element name that opened a skip region through its class attribute;
    // its end tag closes the region like a skip tag would.
    class_skip_tag: Option<String>,
}

impl<'a> BlockClassifier<'a> {
    pub fn new(options: &'a ExtractOptions) -> Self {
        Self {
            options,
            state: BlockState::default(),
            class_skip_tag: None,
        }
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Apply the first matching rule for `token`, updating the block state.
    pub fn classify(&mut self, token: &Token) -> Class {
        let skip = self.matches_skip(token);

        if token.kind == TokenKind::StartTag && skip {
            if !self.options.skip_tags.contains(&token.name) {
                self.class_skip_tag = Some(token.name.clone());
            }
            self.state.in_block = true;
            Class::EnterSkip
        } else if skip && self.state.in_block {
            self.state.in_block = false;
            self.class_skip_tag = None;
            Class::ExitSkip
        } else if token.kind == TokenKind::StartTag && heading_pattern().is_match(&token.name) {
            self.state.is_heading = true;
            Class::EnterHeading
        } else if token.kind == TokenKind::Comment {
            Class::Comment
        } else if token.kind == TokenKind::EndTag && self.state.is_heading {
            self.state.is_heading = false;
            Class::ExitHeading
        } else if token.kind == TokenKind::Text
            && !self.state.in_block
            && !token.text.is_empty()
        {
            if self.state.is_heading {
                Class::Heading
            } else {
                Class::Prose
            }
        } else {
            Class::Ignore
        }
    }

    fn matches_skip(&self, token: &Token) -> bool {
        match token.kind {
            TokenKind::StartTag => {
                self.options.skip_tags.contains(&token.name)
                    || token
                        .classes()
                        .any(|class| self.options.skip_classes.contains(class))
            }
            TokenKind::EndTag => {
                self.options.skip_tags.contains(&token.name)
                    || self.class_skip_tag.as_deref() == Some(token.name.as_str())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::tokenizer::tokenize;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn classes_of(html: &str, options: &ExtractOptions) -> Vec<(Class, String)> {
        let mut classifier = BlockClassifier::new(options);
        tokenize(html)
            .map(|t| {
                let class = classifier.classify(&t);
                (class, t.text)
            })
            .filter(|(class, _)| matches!(class, Class::Prose | Class::Heading | Class::Comment))
            .collect()
    }

    #[test]
    fn test_plain_text_is_prose() {
        let options = ExtractOptions::default();
        assert_eq!(
            classes_of("<p>One</p><p>Two <b>three</b></p>", &options),
            vec![
                (Class::Prose, "One".to_string()),
                (Class::Prose, "Two".to_string()),
                (Class::Prose, "three".to_string()),
            ]
        );
    }

    #[rstest]
    #[case("<pre><code>let x = 1;</code></pre>")]
    #[case("<script>var x = 1;</script>")]
    #[case("<style>p { color: red }</style>")]
    #[case("<tt>fixed</tt>")]
    #[case("<figure>diagram</figure>")]
    fn test_skip_tags_exclude_text(#[case] html: &str) {
        let options = ExtractOptions::default();
        assert!(classes_of(html, &options).is_empty());
    }

    #[test]
    fn test_heading_text() {
        let options = ExtractOptions::default();
        assert_eq!(
            classes_of("<h2>Example</h2><p>Body</p>", &options),
            vec![
                (Class::Heading, "Example".to_string()),
                (Class::Prose, "Body".to_string()),
            ]
        );
    }

    #[test]
    fn test_heading_ends_at_first_end_tag() {
        let options = ExtractOptions::default();
        // Headings are assumed not to nest markup; the inline end tag closes it.
        assert_eq!(
            classes_of("<h1>Big <em>deal</em> here</h1>", &options),
            vec![
                (Class::Heading, "Big".to_string()),
                (Class::Heading, "deal".to_string()),
                (Class::Prose, "here".to_string()),
            ]
        );
    }

    #[test]
    fn test_heading_inside_skip_region_is_excluded() {
        let options = ExtractOptions::default();
        assert!(classes_of("<figure><h3>Caption</h3></figure>", &options).is_empty());
    }

    #[rstest]
    #[case("<!-- hidden -->")]
    #[case("<pre><!-- hidden --></pre>")]
    #[case("<h1><!-- hidden --></h1>")]
    fn test_comments_are_never_prose(#[case] html: &str) {
        let options = ExtractOptions::default();
        assert_eq!(
            classes_of(html, &options),
            vec![(Class::Comment, "hidden".to_string())]
        );
    }

    #[test]
    fn test_nested_skip_tags_use_toggle_semantics() {
        let options = ExtractOptions::default();
        // The inner </code> leaves skip mode even though <pre> is still open.
        assert_eq!(
            classes_of("<pre><code>hidden</code>leaked</pre><p>after</p>", &options),
            vec![
                (Class::Prose, "leaked".to_string()),
                (Class::Prose, "after".to_string()),
            ]
        );
    }

    #[test]
    fn test_skip_class_region() {
        let options = ExtractOptions::new(DEFAULT_SKIP_TAGS, ["no-lint"]);
        assert_eq!(
            classes_of(
                r#"<p>Before</p><div class="note no-lint">Ignored <b>text</b></div><p>After</p>"#,
                &options
            ),
            vec![
                (Class::Prose, "Before".to_string()),
                (Class::Prose, "After".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_skip_tags_replace_defaults() {
        let options = ExtractOptions::new(["KBD"], Vec::<String>::new());
        assert_eq!(
            classes_of("<kbd>Ctrl</kbd><code>shown</code>", &options),
            vec![(Class::Prose, "shown".to_string())]
        );
    }

    #[test]
    fn test_state_is_tracked() {
        let options = ExtractOptions::default();
        let mut classifier = BlockClassifier::new(&options);
        let tokens: Vec<Token> = tokenize("<h4><code>x").collect();

        assert_eq!(classifier.classify(&tokens[0]), Class::EnterHeading);
        assert_eq!(classifier.classify(&tokens[1]), Class::EnterSkip);
        assert_eq!(
            classifier.state(),
            BlockState {
                in_block: true,
                is_heading: true
            }
        );
        assert_eq!(classifier.classify(&tokens[2]), Class::Ignore);
    }
}
