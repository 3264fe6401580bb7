//! Error types

use emu_dom::DomException;

use crate::MemberKind;

/// JavaScript error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsError {
    #[error("JavaScript error: {0}")]
    Runtime(String),

    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Reference error: {0}")]
    Reference(String),

    /// A `DOMException` thrown to script
    #[error("{name}: {message}")]
    Dom { name: String, code: u16, message: String },
}

impl JsError {
    /// Script-visible error name
    pub fn name(&self) -> &str {
        match self {
            JsError::Runtime(_) => "Error",
            JsError::Syntax(_) => "SyntaxError",
            JsError::TypeError(_) => "TypeError",
            JsError::Reference(_) => "ReferenceError",
            JsError::Dom { name, .. } => name,
        }
    }

    /// Legacy DOMException code, if this is one
    pub fn code(&self) -> Option<u16> {
        match self {
            JsError::Dom { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            JsError::Runtime(m) | JsError::Syntax(m) | JsError::TypeError(m) | JsError::Reference(m) => m,
            JsError::Dom { message, .. } => message,
        }
    }

    pub(crate) fn illegal_invocation() -> Self {
        JsError::TypeError("Illegal invocation".to_string())
    }
}

impl From<DomException> for JsError {
    fn from(e: DomException) -> Self {
        JsError::Dom {
            name: e.name().to_string(),
            code: e.code(),
            message: e.message().to_string(),
        }
    }
}

impl From<rquickjs::Error> for JsError {
    fn from(e: rquickjs::Error) -> Self {
        JsError::Runtime(e.to_string())
    }
}

impl From<serde_json::Error> for JsError {
    fn from(e: serde_json::Error) -> Self {
        JsError::Runtime(format!("Malformed host payload: {}", e))
    }
}

/// Malformed capability declarations; fatal at startup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("Class {0} is declared more than once")]
    DuplicateClass(&'static str),

    #[error("Member {owner}.{member} ({kind:?}) is declared more than once")]
    DuplicateMember {
        owner: &'static str,
        member: &'static str,
        kind: MemberKind,
    },

    #[error("Class {class} extends unknown class {parent}")]
    UnknownParent { class: &'static str, parent: &'static str },

    #[error("Class {0} is part of an inheritance cycle")]
    Cycle(&'static str),

    #[error("{} is exposed on no browser version", qualified(.owner, .member))]
    EmptyVersionSet {
        owner: &'static str,
        member: Option<&'static str>,
    },

    #[error("Member {owner}.{member} is exposed on versions where its class is not")]
    MemberOutsideClass { owner: &'static str, member: &'static str },

    #[error("Class {class} is exposed on versions where its parent {parent} is not")]
    ParentNotExposed { class: &'static str, parent: &'static str },
}

fn qualified(owner: &str, member: &Option<&str>) -> String {
    match member {
        Some(member) => format!("{}.{}", owner, member),
        None => owner.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_exception_conversion() {
        let err: JsError = DomException::IndexSize("Invalid range index: 3".to_string()).into();
        assert_eq!(err.name(), "IndexSizeError");
        assert_eq!(err.code(), Some(1));
        assert_eq!(err.message(), "Invalid range index: 3");
        assert_eq!(err.to_string(), "IndexSizeError: Invalid range index: 3");
    }

    #[test]
    fn test_capability_error_message() {
        let err = CapabilityError::EmptyVersionSet {
            owner: "Range",
            member: Some("constructor"),
        };
        assert_eq!(err.to_string(), "Range.constructor is exposed on no browser version");
    }
}
