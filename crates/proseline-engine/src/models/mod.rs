pub mod document;
pub mod span;

pub use document::{Document, Format, FormatError};
pub use span::{ExtractedSpan, Role};
