//! Runtime errors.
//!
//! Grounded on `ori_patterns/src/errors.rs`'s hand-rolled struct plus
//! grouped `#[cold]` constructor functions (not a `thiserror` derive — the
//! error set here is an open collection of one-off cases keyed by call
//! site), narrowed to spec §3's three-kind `EvalError`. The teacher's
//! `ControlFlow`/`propagated_value`/`span` fields are dropped: this
//! language has no break/continue/return/try as expression forms, so every
//! error is a hard abort.

use std::fmt;

use ml_ir::{Name, SharedInterner};

#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    TypeError(String),
    NameError(Name),
    Unsupported(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: ErrorKind,
    pub call_stack: Vec<(Name, Name)>,
}

impl EvalError {
    #[must_use]
    pub fn new(kind: ErrorKind, call_stack: &[(Name, Name)]) -> Self {
        EvalError {
            kind,
            call_stack: call_stack.to_vec(),
        }
    }

    /// Renders the error the way spec §7 prescribes:
    /// `"<kind>: <message>\nCall stack:\n - <frame>\n - ..."`, frames in
    /// the order they were entered.
    #[must_use]
    pub fn display(&self, interner: &SharedInterner) -> String {
        let (kind_label, message) = match &self.kind {
            ErrorKind::TypeError(msg) => ("TypeError", msg.clone()),
            ErrorKind::NameError(name) => ("NameError", interner.lookup(*name).to_string()),
            ErrorKind::Unsupported(msg) => ("Unsupported", msg.clone()),
        };
        let mut out = format!("{kind_label}: {message}\nCall stack:");
        for (module, name) in &self.call_stack {
            out.push_str("\n - ");
            if interner.lookup(*module).is_empty() {
                out.push_str(&interner.lookup(*name));
            } else {
                out.push_str(&interner.lookup(*module));
                out.push('.');
                out.push_str(&interner.lookup(*name));
            }
        }
        out
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)
    }
}

impl std::error::Error for EvalError {}

pub type EvalResult<T = crate::value::Value> = Result<T, EvalError>;

#[cold]
#[must_use]
pub fn type_error(message: impl Into<String>, call_stack: &[(Name, Name)]) -> EvalError {
    EvalError::new(ErrorKind::TypeError(message.into()), call_stack)
}

#[cold]
#[must_use]
pub fn name_error(name: Name, call_stack: &[(Name, Name)]) -> EvalError {
    EvalError::new(ErrorKind::NameError(name), call_stack)
}

#[cold]
#[must_use]
pub fn unsupported(message: impl Into<String>, call_stack: &[(Name, Name)]) -> EvalError {
    EvalError::new(ErrorKind::Unsupported(message.into()), call_stack)
}

/// The driver-level error union (spec §6): either a parse diagnostic,
/// surfaced verbatim, or an `EvalError`.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    ParsingError(String),
    Eval(EvalError),
}

impl From<EvalError> for Error {
    fn from(err: EvalError) -> Self {
        Error::Eval(err)
    }
}

impl Error {
    #[must_use]
    pub fn display(&self, interner: &SharedInterner) -> String {
        match self {
            Error::ParsingError(diagnostic) => diagnostic.clone(),
            Error::Eval(err) => err.display(interner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_type_error_with_call_stack() {
        let interner = SharedInterner::new();
        let main = interner.intern("Main");
        let fib = interner.intern("fib");
        let err = type_error("not a number", &[(main, fib)]);
        let rendered = err.display(&interner);
        assert!(rendered.starts_with("TypeError: not a number"));
        assert!(rendered.contains("Main.fib"));
    }

    #[test]
    fn renders_name_error() {
        let interner = SharedInterner::new();
        let missing = interner.intern("doesNotExist");
        let err = name_error(missing, &[]);
        assert_eq!(err.display(&interner), "NameError: doesNotExist\nCall stack:");
    }
}
