//! DOMException taxonomy

use thiserror::Error;

/// Script-catchable DOM error with a stable name and legacy code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomException {
    #[error("IndexSizeError: {0}")]
    IndexSize(String),

    #[error("HierarchyRequestError: {0}")]
    HierarchyRequest(String),

    #[error("WrongDocumentError: {0}")]
    WrongDocument(String),

    #[error("InvalidCharacterError: {0}")]
    InvalidCharacter(String),

    #[error("NotFoundError: {0}")]
    NotFound(String),

    #[error("NotSupportedError: {0}")]
    NotSupported(String),

    #[error("InvalidStateError: {0}")]
    InvalidState(String),

    #[error("SyntaxError: {0}")]
    Syntax(String),

    #[error("InvalidNodeTypeError: {0}")]
    InvalidNodeType(String),
}

impl DomException {
    /// DOMException `name`
    pub fn name(&self) -> &'static str {
        match self {
            DomException::IndexSize(_) => "IndexSizeError",
            DomException::HierarchyRequest(_) => "HierarchyRequestError",
            DomException::WrongDocument(_) => "WrongDocumentError",
            DomException::InvalidCharacter(_) => "InvalidCharacterError",
            DomException::NotFound(_) => "NotFoundError",
            DomException::NotSupported(_) => "NotSupportedError",
            DomException::InvalidState(_) => "InvalidStateError",
            DomException::Syntax(_) => "SyntaxError",
            DomException::InvalidNodeType(_) => "InvalidNodeTypeError",
        }
    }

    /// Legacy numeric code (`DOMException.INDEX_SIZE_ERR` etc.)
    pub fn code(&self) -> u16 {
        match self {
            DomException::IndexSize(_) => 1,
            DomException::HierarchyRequest(_) => 3,
            DomException::WrongDocument(_) => 4,
            DomException::InvalidCharacter(_) => 5,
            DomException::NotFound(_) => 8,
            DomException::NotSupported(_) => 9,
            DomException::InvalidState(_) => 11,
            DomException::Syntax(_) => 12,
            DomException::InvalidNodeType(_) => 24,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DomException::IndexSize(m)
            | DomException::HierarchyRequest(m)
            | DomException::WrongDocument(m)
            | DomException::InvalidCharacter(m)
            | DomException::NotFound(m)
            | DomException::NotSupported(m)
            | DomException::InvalidState(m)
            | DomException::Syntax(m)
            | DomException::InvalidNodeType(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_size_code() {
        let err = DomException::IndexSize("Invalid range index: 3".to_string());
        assert_eq!(err.name(), "IndexSizeError");
        assert_eq!(err.code(), 1);
        assert_eq!(err.message(), "Invalid range index: 3");
        assert!(err.to_string().starts_with("IndexSizeError"));
    }
}
