//! Resolution error taxonomy.

use std::fmt;

/// What went wrong while resolving or continuing a method call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The method name is absent everywhere in the receiver's chain.
    NoMethod { receiver: String, method: String },
    /// A `call_next` was requested beyond the last candidate.
    NoSuperMethod { origin: String, method: String },
    /// A handle from a different engine, or out of range for this one.
    InvalidReference { expected: &'static str },
}

fn format_kind(kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::NoMethod { receiver, method } => {
            format!("Unknown method '{}' for {}", method, receiver)
        }
        ErrorKind::NoSuperMethod { origin, method } => {
            format!("No next implementation of '{}' beyond {}", method, origin)
        }
        ErrorKind::InvalidReference { expected } => {
            format!("{} handle does not belong to this engine", expected)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineError {
    kind: ErrorKind,
}

impl EngineError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    pub fn no_method(receiver: impl Into<String>, method: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoMethod {
            receiver: receiver.into(),
            method: method.into(),
        })
    }

    pub fn no_super_method(origin: impl Into<String>, method: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoSuperMethod {
            origin: origin.into(),
            method: method.into(),
        })
    }

    pub fn invalid_reference(expected: &'static str) -> Self {
        Self::new(ErrorKind::InvalidReference { expected })
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_no_method(&self) -> bool {
        matches!(self.kind, ErrorKind::NoMethod { .. })
    }

    pub fn is_no_super_method(&self) -> bool {
        matches!(self.kind, ErrorKind::NoSuperMethod { .. })
    }

    pub fn is_invalid_reference(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidReference { .. })
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_kind(&self.kind))
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_method_and_site() {
        let e = EngineError::no_method("#<B:1>", "quux");
        assert_eq!(e.to_string(), "Unknown method 'quux' for #<B:1>");
        assert!(e.is_no_method());

        let e = EngineError::no_super_method("C#foo (included in A)", "foo");
        assert_eq!(
            e.to_string(),
            "No next implementation of 'foo' beyond C#foo (included in A)"
        );
        assert!(e.is_no_super_method());

        let e = EngineError::invalid_reference("module");
        assert_eq!(e.to_string(), "module handle does not belong to this engine");
        assert!(e.is_invalid_reference());
    }
}
