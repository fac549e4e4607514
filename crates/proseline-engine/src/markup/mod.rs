//! Pulling prose out of rendered HTML.
//!
//! One pass walks the token stream once: the [`classify::BlockClassifier`]
//! decides what each text token is, the [`reconcile::Context`] tracks which
//! part of the original source has been accounted for, and the results are
//! dispatched to a [`sink::ProseSink`].

pub mod classify;
pub mod extract;
pub mod reconcile;
pub mod sink;
pub mod tokenizer;

pub use classify::{BlockClassifier, BlockState, Class, DEFAULT_SKIP_TAGS, ExtractOptions};
pub use extract::{extract_document, extract_spans, lint_document};
pub use reconcile::Context;
pub use sink::{ProseSink, SpanCollector};
pub use tokenizer::{MarkupTokens, Token, TokenKind, tokenize};
