//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("A question is required for this divination")]
    EmptyQuestion,

    #[error("Astrology needs either a question or a birth date")]
    MissingBirthDate,

    #[error("Unknown divination kind: {0}")]
    UnknownKind(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_display() {
        let error = DomainError::UnknownKind("palmistry".to_string());
        assert_eq!(error.to_string(), "Unknown divination kind: palmistry");
    }
}
