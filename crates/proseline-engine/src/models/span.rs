use serde::Serialize;

/// How an extracted piece of text should be linted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Prose,
    Heading,
}

impl Role {
    /// Scope label for this role in a document with the given extension,
    /// e.g. `text.md` or `text.heading.md`.
    pub fn scope(self, real_ext: &str) -> String {
        match self {
            Role::Prose => format!("text{real_ext}"),
            Role::Heading => format!("text.heading{real_ext}"),
        }
    }
}

/// A run of human-readable text pulled out of a rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedSpan {
    pub text: String,
    pub role: Role,
    pub scope: String,
    /// 1-based line in the source document, including any caller offset.
    pub line: usize,
    /// 0-based character column within `line`.
    pub column: usize,
}
