// ABOUTME: Integration-level tests for the scanner's public token stream

use lox::diagnostics::Diagnostics;
use lox::scanner::Scanner;
use lox::token::{Literal, TokenType};

fn scan(source: &str) -> (Vec<lox::token::Token>, bool) {
    let diagnostics = Diagnostics::new();
    let tokens = Scanner::new(source, &diagnostics).scan_tokens();
    (tokens, diagnostics.had_error())
}

#[test]
fn test_full_program_tokenizes_without_error() {
    let (tokens, had_error) = scan(
        r#"
        fun add(a, b) {
            return a + b; // comment
        }
        print add(1, 2.5);
        "#,
    );
    assert!(!had_error);
    assert_eq!(tokens.last().unwrap().token_type, TokenType::Eof);
}

#[test]
fn test_string_spanning_multiple_lines_tracks_line_count() {
    let (tokens, had_error) = scan("\"line one\nline two\" 1");
    assert!(!had_error);
    assert_eq!(tokens[0].literal, Literal::String("line one\nline two".to_string()));
    // the `1` after the string starts on line 2
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn test_unterminated_block_comment_reports_error() {
    let (_, had_error) = scan("/* never closed");
    assert!(had_error);
}

#[test]
fn test_reserved_words_get_keyword_token_types() {
    let (tokens, _) = scan("class super this");
    assert_eq!(tokens[0].token_type, TokenType::Class);
    assert_eq!(tokens[1].token_type, TokenType::Super);
    assert_eq!(tokens[2].token_type, TokenType::This);
}
