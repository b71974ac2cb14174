// ABOUTME: Static pass binding each variable reference to a lexical scope depth before evaluation

use crate::ast::{Expr, ExprId, FunctionDecl, Stmt};
use crate::diagnostics::Diagnostics;
use crate::token::Token;
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq)]
enum FunctionKind {
    None,
    Function,
}

/// Walks the parsed tree once, before any statement runs, recording how
/// many enclosing scopes separate a variable use from its declaration.
/// The interpreter consumes the resulting table instead of re-deriving
/// scope depth at evaluation time.
pub struct Resolver<'a> {
    diagnostics: &'a Diagnostics,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionKind,
    locals: HashMap<ExprId, usize>,
}

impl<'a> Resolver<'a> {
    pub fn new(diagnostics: &'a Diagnostics) -> Self {
        Resolver {
            diagnostics,
            scopes: Vec::new(),
            current_function: FunctionKind::None,
            locals: HashMap::new(),
        }
    }

    pub fn resolve(mut self, statements: &[Stmt]) -> HashMap<ExprId, usize> {
        self.resolve_stmts(statements);
        self.locals
    }

    fn resolve_stmts(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) => self.resolve_expr(expr),
            Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(init) = initializer {
                    self.resolve_expr(init);
                }
                self.define(name);
            }
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_stmts(statements);
                self.end_scope();
            }
            Stmt::If { condition, then_branch, else_branch } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
            Stmt::Function(decl) => {
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionKind::Function);
            }
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    self.diagnostics.token_error(keyword, "Can't return from top-level code.");
                }
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
            Stmt::Class { name, methods } => {
                self.declare(name);
                self.define(name);
                for method in methods {
                    self.resolve_function(method, FunctionKind::Function);
                }
            }
        }
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionKind) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &decl.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&decl.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal { .. } => {}
            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        self.diagnostics
                            .token_error(name, "Can't read local variable in its own initializer.");
                    }
                }
                self.resolve_local(*id, &name.lexeme);
            }
            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, &name.lexeme);
            }
            Expr::Unary { right, .. } => self.resolve_expr(right),
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Grouping { inner, .. } => self.resolve_expr(inner),
            Expr::Call { callee, arguments, .. } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }
        }
    }

    fn resolve_local(&mut self, id: ExprId, name: &str) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                self.locals.insert(id, depth);
                return;
            }
        }
        // Not found in any tracked scope: treated as global at runtime.
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else {
            return; // global scope is untracked
        };
        if scope.contains_key(&name.lexeme) {
            self.diagnostics
                .token_error(name, "Already a variable with this name in this scope.");
        }
        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn resolve(source: &str) -> (HashMap<ExprId, usize>, Diagnostics) {
        let diag = Diagnostics::new();
        let tokens = Scanner::new(source, &diag).scan_tokens();
        let stmts = Parser::new(tokens, &diag).parse();
        let locals = Resolver::new(&diag).resolve(&stmts);
        (locals, diag)
    }

    #[test]
    fn test_global_reference_is_unrecorded() {
        let (locals, diag) = resolve("var a = 1; print a;");
        assert!(!diag.had_error());
        assert!(locals.is_empty());
    }

    #[test]
    fn test_local_reference_recorded_at_depth_zero() {
        let (locals, diag) = resolve("{ var a = 1; print a; }");
        assert!(!diag.had_error());
        assert_eq!(locals.len(), 1);
        assert_eq!(*locals.values().next().unwrap(), 0);
    }

    #[test]
    fn test_nested_scope_depth_counts_hops() {
        let (locals, diag) = resolve("{ var a = 1; { var b = 2; print a; } }");
        assert!(!diag.had_error());
        // `a` is one scope out from where it's printed.
        assert!(locals.values().any(|&d| d == 1));
    }

    #[test]
    fn test_self_referential_initializer_is_an_error() {
        let (_, diag) = resolve("{ var a = a; }");
        assert!(diag.had_error());
    }

    #[test]
    fn test_duplicate_local_is_an_error() {
        let (_, diag) = resolve("{ var a = 1; var a = 2; }");
        assert!(diag.had_error());
    }

    #[test]
    fn test_return_at_top_level_is_an_error() {
        let (_, diag) = resolve("return 1;");
        assert!(diag.had_error());
    }

    #[test]
    fn test_return_inside_function_is_fine() {
        let (_, diag) = resolve("fun f() { return 1; }");
        assert!(!diag.had_error());
    }

    #[test]
    fn test_shadowing_inner_block_does_not_error_in_outer() {
        let (_, diag) = resolve("var a = \"global\"; { fun show() { print a; } show(); var a = \"local\"; show(); }");
        assert!(!diag.had_error());
    }
}
