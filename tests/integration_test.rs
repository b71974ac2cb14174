// ABOUTME: End-to-end integration tests exercising the full scan/parse/resolve/interpret pipeline

use lox::diagnostics::Diagnostics;
use lox::interpreter::Interpreter;
use lox::parser::Parser;
use lox::resolver::Resolver;
use lox::scanner::Scanner;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

struct RunResult {
    output: String,
    had_static_error: bool,
    had_runtime_error: bool,
}

fn run(source: &str) -> RunResult {
    let diagnostics = Diagnostics::new();
    let tokens = Scanner::new(source, &diagnostics).scan_tokens();
    let statements = Parser::new(tokens, &diagnostics).parse();
    let locals = Resolver::new(&diagnostics).resolve(&statements);

    let buffer = SharedBuffer::default();
    let mut interpreter = Interpreter::new(Box::new(buffer.clone()));
    interpreter.add_resolution(locals);

    if !diagnostics.had_error() {
        interpreter.interpret(&statements, &diagnostics);
    }

    RunResult {
        output: String::from_utf8(buffer.0.borrow().clone()).unwrap(),
        had_static_error: diagnostics.had_error(),
        had_runtime_error: diagnostics.had_runtime_error(),
    }
}

#[test]
fn scenario_arithmetic_precedence() {
    let result = run("print 1 + 2 * 3;");
    assert_eq!(result.output, "7\n");
}

#[test]
fn scenario_global_shadowed_by_later_local_is_invisible_to_earlier_closure() {
    let result = run(
        r#"var a = "global"; { fun show() { print a; } show(); var a = "local"; show(); }"#,
    );
    assert_eq!(result.output, "global\nglobal\n");
}

#[test]
fn scenario_closure_over_mutable_counter() {
    let result = run(
        "fun make(){ var i=0; fun inc(){ i=i+1; print i; } return inc; } var c=make(); c(); c(); c();",
    );
    assert_eq!(result.output, "1\n2\n3\n");
}

#[test]
fn scenario_for_loop_desugaring() {
    let result = run("for (var i=1;i<=3;i=i+1) print i;");
    assert_eq!(result.output, "1\n2\n3\n");
}

#[test]
fn scenario_short_circuit_or() {
    let result = run(r#"if (nil or "ok") print "y"; else print "n";"#);
    assert_eq!(result.output, "y\n");
}

#[test]
fn scenario_string_plus_number_runtime_error() {
    let result = run(r#"print "a" + 1;"#);
    assert!(result.had_runtime_error);
    assert!(!result.had_static_error);
    assert_eq!(result.output, "");
}

#[test]
fn invariant_for_loop_counts_exactly_n_for_any_nonnegative_n() {
    for n in [0, 1, 5, 20] {
        let source = format!("for (var i=0;i<{};i=i+1) print i;", n);
        let result = run(&source);
        let expected: String = (0..n).map(|i| format!("{}\n", i)).collect();
        assert_eq!(result.output, expected, "n = {}", n);
    }
}

#[test]
fn invariant_and_never_evaluates_right_when_left_is_falsy() {
    let result = run("fun f() { print \"should not run\"; return true; } false and f();");
    assert_eq!(result.output, "");
}

#[test]
fn invariant_or_never_evaluates_right_when_left_is_truthy() {
    let result = run("fun f() { print \"should not run\"; return true; } true or f();");
    assert_eq!(result.output, "");
}

#[test]
fn invariant_redefining_captured_global_is_visible_to_closure() {
    let result = run("var a = 1; fun show() { print a; } show(); a = 2; show();");
    assert_eq!(result.output, "1\n2\n");
}

#[test]
fn static_error_suppresses_interpretation() {
    let result = run("print 1 +;");
    assert!(result.had_static_error);
    assert!(!result.had_runtime_error);
    assert_eq!(result.output, "");
}

#[test]
fn self_referential_initializer_is_a_resolve_error_not_a_panic() {
    let result = run("{ var a = a; }");
    assert!(result.had_static_error);
}
