// ABOUTME: Runtime error variants for the interpreter, reported through Diagnostics with a source line

use thiserror::Error;

/// A runtime error, always paired with the source line of the operation
/// that triggered it. Scan/parse/resolve errors are reported directly
/// through `Diagnostics` as they're found and never become a `LoxError`;
/// this type exists purely for the interpreter's evaluation path, where
/// the error has to unwind back up to the top-level statement dispatch
/// before it can be reported.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct LoxError {
    pub line: usize,
    pub kind: LoxErrorKind,
}

impl LoxError {
    pub fn new(line: usize, kind: LoxErrorKind) -> Self {
        LoxError { line, kind }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoxErrorKind {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,

    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,

    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings,

    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),

    #[error("Can only call functions and classes.")]
    NotCallable,

    #[error("Expected {expected} arguments but got {actual}.")]
    ArityMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_message_only() {
        let err = LoxError::new(7, LoxErrorKind::OperandMustBeNumber);
        assert_eq!(format!("{}", err), "Operand must be a number.");
        assert_eq!(err.line, 7);
    }

    #[test]
    fn test_undefined_variable_message() {
        let err = LoxErrorKind::UndefinedVariable("x".to_string());
        assert_eq!(format!("{}", err), "Undefined variable 'x'.");
    }

    #[test]
    fn test_operands_must_be_numbers_is_plural_and_distinct_from_unary() {
        assert_eq!(format!("{}", LoxErrorKind::OperandsMustBeNumbers), "Operands must be numbers.");
        assert_ne!(
            format!("{}", LoxErrorKind::OperandsMustBeNumbers),
            format!("{}", LoxErrorKind::OperandMustBeNumber)
        );
    }
}
