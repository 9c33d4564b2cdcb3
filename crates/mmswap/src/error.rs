//! Error types for swap extraction.

use thiserror::Error;

/// Errors from resolving or configuring an extraction.
///
/// Only the document-level variants can come out of [`crate::extract`]; the
/// header and body scans recover from malformed input on their own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The container holds no entry with the tool-path extension.
    #[error("no {0} document found in container")]
    MissingDocument(String),

    /// The bytes could not be turned into text.
    #[error("unreadable document: {0}")]
    UnreadableDocument(String),

    /// Settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Coarse classification of an [`ExtractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`ExtractError::MissingDocument`].
    MissingDocument,
    /// See [`ExtractError::UnreadableDocument`].
    UnreadableDocument,
    /// See [`ExtractError::InvalidSettings`].
    InvalidSettings,
}

impl ExtractError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::MissingDocument(_) => ErrorKind::MissingDocument,
            ExtractError::UnreadableDocument(_) => ErrorKind::UnreadableDocument,
            ExtractError::InvalidSettings(_) => ErrorKind::InvalidSettings,
        }
    }
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            ExtractError::MissingDocument(".gcode".into()).kind(),
            ErrorKind::MissingDocument
        );
        assert_eq!(
            ExtractError::UnreadableDocument("bad utf-8".into()).kind(),
            ErrorKind::UnreadableDocument
        );
    }

    #[test]
    fn display_names_extension() {
        let err = ExtractError::MissingDocument(".gcode".into());
        assert_eq!(err.to_string(), "no .gcode document found in container");
    }
}
