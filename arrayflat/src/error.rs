//! All error types for the arrayflat crate.
//!
//! These are returned from all fallible operations (parsing, name derivation,
//! tree rewrites, directory discovery). Nothing in the crate recovers locally:
//! every error travels up to the caller and aborts the run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown mode `{0}`")]
    UnknownMode(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("report serialization error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("string-array `{array}` in `{language}` is not present in the base language")]
    UnknownArray { array: String, language: String },

    #[error("string-array `{0}` not found")]
    MissingArray(String),

    #[error("string entry `{0}` not found")]
    MissingEntry(String),

    #[error(
        "string-array `{array}` in `{language}` has {actual} items, base language has {expected}"
    )]
    ItemCountMismatch {
        array: String,
        language: String,
        expected: usize,
        actual: usize,
    },

    #[error("identifier `{identifier}` derived twice (string-array `{first}` and `{second}`)")]
    DuplicateIdentifier {
        identifier: String,
        first: String,
        second: String,
    },
}

impl Error {
    /// Creates a new malformed-document error
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::Malformed(message.into())
    }
}
