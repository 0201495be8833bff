use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// `[` without a closing `]` at the end of the line.
    UnterminatedSection,
    /// A section header whose name was already seen.
    DuplicateSection,
    /// A non-header line without `=`, or with nothing before it.
    MissingSplitter,
    /// A key-value line before the first section header.
    KeyBeforeSection,
    /// A key repeated within one section.
    DuplicateKey,
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UnterminatedSection => "section header is missing a closing `]`".fmt(f),
            Self::DuplicateSection => "section is already defined".fmt(f),
            Self::MissingSplitter => "expected `key = value`".fmt(f),
            Self::KeyBeforeSection => "key appears before any section header".fmt(f),
            Self::DuplicateKey => "key is already defined in this section".fmt(f),
        }
    }
}

/// Parse failure with the 1-indexed line it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}: {text:?}")]
pub struct FormatError {
    pub kind: FormatErrorKind,
    pub line: usize,
    /// The offending line, trimmed.
    pub text: String,
}

impl FormatError {
    pub(crate) fn new(kind: FormatErrorKind, line: usize, text: &str) -> Self {
        Self {
            kind,
            line,
            text: text.to_string(),
        }
    }
}
