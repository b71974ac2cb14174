// ABOUTME: Integration-level tests for the resolver's depth table and diagnostics

use lox::diagnostics::Diagnostics;
use lox::parser::Parser;
use lox::resolver::Resolver;
use lox::scanner::Scanner;

fn resolve(source: &str) -> bool {
    let diagnostics = Diagnostics::new();
    let tokens = Scanner::new(source, &diagnostics).scan_tokens();
    let stmts = Parser::new(tokens, &diagnostics).parse();
    Resolver::new(&diagnostics).resolve(&stmts);
    diagnostics.had_error()
}

#[test]
fn test_function_parameter_shadowing_outer_local_is_fine() {
    assert!(!resolve("{ var a = 1; fun f(a) { print a; } }"));
}

#[test]
fn test_class_name_is_declared_in_its_own_scope() {
    assert!(!resolve("class Thing {} print Thing;"));
}

#[test]
fn test_deeply_nested_blocks_resolve_without_error() {
    assert!(!resolve("{ { { { var a = 1; print a; } } } }"));
}

#[test]
fn test_reassigning_an_undeclared_name_is_not_a_resolve_error() {
    // Assignment to a name absent from every tracked scope is left
    // unresolved (global); whether it actually exists is a runtime concern.
    assert!(!resolve("x = 1;"));
}

#[test]
fn test_nested_function_return_is_fine_even_though_outer_is_not_a_function() {
    assert!(!resolve("fun outer() { fun inner() { return 1; } return inner(); }"));
}
