// ABOUTME: Shared diagnostics sink threaded through scanner, parser, resolver, and interpreter

use crate::token::{Token, TokenType};
use std::cell::Cell;

/// Collects reported errors and tracks whether a run saw a static error or
/// a runtime error, so the driver can decide the process exit code without
/// any global mutable state.
///
/// A single `Diagnostics` is shared (by reference) across the scan/parse/
/// resolve passes of one run; the REPL creates a fresh one per line.
#[derive(Default)]
pub struct Diagnostics {
    had_error: Cell<bool>,
    had_runtime_error: Cell<bool>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error.get()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error.get()
    }

    /// Report a scanner/resolver-style error: no token, just a line.
    pub fn error(&self, line: usize, message: &str) {
        self.report(line, "", message);
    }

    /// Report a parser-style error anchored to a token (EOF renders as
    /// "at end", anything else as "at '<lexeme>'").
    pub fn token_error(&self, token: &Token, message: &str) {
        if token.token_type == TokenType::Eof {
            self.report(token.line, " at end", message);
        } else {
            self.report(token.line, &format!(" at '{}'", token.lexeme), message);
        }
    }

    /// Report a runtime error anchored to a token's line. Uses the same
    /// `"[line N] Error<where>: message"` format as scan/parse/resolve
    /// errors, but flags the run as a runtime failure rather than a static
    /// one.
    pub fn runtime_error(&self, line: usize, message: &str) {
        self.print_report(line, "", message);
        self.had_runtime_error.set(true);
    }

    fn report(&self, line: usize, location: &str, message: &str) {
        self.print_report(line, location, message);
        self.had_error.set(true);
    }

    fn print_report(&self, line: usize, location: &str, message: &str) {
        eprintln!("[line {}] Error{}: {}", line, location, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Literal;

    #[test]
    fn test_fresh_diagnostics_has_no_errors() {
        let diag = Diagnostics::new();
        assert!(!diag.had_error());
        assert!(!diag.had_runtime_error());
    }

    #[test]
    fn test_error_sets_had_error() {
        let diag = Diagnostics::new();
        diag.error(3, "bad thing");
        assert!(diag.had_error());
        assert!(!diag.had_runtime_error());
    }

    #[test]
    fn test_runtime_error_sets_had_runtime_error_only() {
        let diag = Diagnostics::new();
        diag.runtime_error(5, "Undefined variable 'x'.");
        assert!(diag.had_runtime_error());
        assert!(!diag.had_error());
    }

    #[test]
    fn test_token_error_at_eof() {
        let diag = Diagnostics::new();
        let eof = Token::new(TokenType::Eof, "", Literal::None, 1);
        diag.token_error(&eof, "Expect expression.");
        assert!(diag.had_error());
    }
}
