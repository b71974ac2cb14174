// ABOUTME: Tree-walking evaluator/executor consuming the resolver's scope-depth side-table

use crate::ast::{Expr, ExprId, Stmt};
use crate::callable::{Callable, LoxClass, LoxFunction, NativeClock};
use crate::diagnostics::Diagnostics;
use crate::environment::Environment;
use crate::error::{LoxError, LoxErrorKind};
use crate::token::{Token, TokenType};
use crate::value::Value;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

/// A non-local exit from statement execution: either a runtime error
/// surfacing from expression evaluation, or a `return` unwinding toward
/// the enclosing function-call frame. Both pop through any number of
/// nested block scopes on their way out.
enum Unwind {
    Error(LoxError),
    Return(Value),
}

impl From<LoxError> for Unwind {
    fn from(err: LoxError) -> Self {
        Unwind::Error(err)
    }
}

pub struct Interpreter {
    globals: Rc<Environment>,
    environment: Rc<Environment>,
    locals: HashMap<ExprId, usize>,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(output: Box<dyn Write>) -> Self {
        let globals = Environment::new();
        globals.define("clock".to_string(), Value::Callable(Rc::new(NativeClock)));
        Interpreter {
            environment: globals.clone(),
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    /// Merges in a resolution pass's side-table. Expression ids are unique
    /// for the life of the process, so repeated REPL lines each contribute
    /// their own entries without colliding.
    pub fn add_resolution(&mut self, locals: HashMap<ExprId, usize>) {
        self.locals.extend(locals);
    }

    /// Runs a sequence of top-level statements, reporting at most the first
    /// runtime error encountered; a runtime error aborts the rest of this run.
    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &Diagnostics) {
        for stmt in statements {
            if let Err(unwind) = self.execute(stmt) {
                match unwind {
                    Unwind::Error(err) => {
                        diagnostics.runtime_error(err.line, &err.to_string());
                        return;
                    }
                    Unwind::Return(_) => {
                        unreachable!("resolver rejects return outside a function body")
                    }
                }
            }
        }
    }

    /// Entry point used by `LoxFunction::call`: runs a function body as a
    /// block in the given environment, converting the unwind signal into a
    /// plain result the way a function call does.
    pub fn execute_block(&mut self, statements: &[Stmt], env: Rc<Environment>) -> Result<Value, LoxError> {
        match self.run_block(statements, env) {
            Ok(()) => Ok(Value::Nil),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(err)) => Err(err),
        }
    }

    fn run_block(&mut self, statements: &[Stmt], env: Rc<Environment>) -> Result<(), Unwind> {
        let previous = self.environment.clone();
        self.environment = env;

        let mut result = Ok(());
        for stmt in statements {
            if let Err(err) = self.execute(stmt) {
                result = Err(err);
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                let _ = writeln!(self.output, "{}", value);
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block(statements) => {
                let scope = Environment::with_enclosing(self.environment.clone());
                self.run_block(statements, scope)
            }
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function(decl) => {
                let function = LoxFunction::new(decl.clone(), self.environment.clone());
                self.environment
                    .define(decl.name.lexeme.clone(), Value::Callable(Rc::new(function)));
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }
            Stmt::Class { name, methods } => {
                // Declared before its methods are built so a method body
                // that (eventually) refers to the class by name sees a
                // binding, matching the two-step declare/assign the
                // resolver already expects for recursive definitions.
                self.environment.define(name.lexeme.clone(), Value::Nil);
                let mut method_table = HashMap::new();
                for method in methods {
                    method_table.insert(method.name.lexeme.clone(), method.clone());
                }
                let class = LoxClass::new(name.lexeme.clone(), method_table);
                self.environment.assign(name, Value::Callable(Rc::new(class)))?;
                Ok(())
            }
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, LoxError> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Grouping { inner, .. } => self.evaluate(inner),
            Expr::Unary { operator, right, .. } => self.evaluate_unary(operator, right),
            Expr::Binary { left, operator, right, .. } => self.evaluate_binary(left, operator, right),
            Expr::Logical { left, operator, right, .. } => self.evaluate_logical(left, operator, right),
            Expr::Variable { id, name } => self.look_up_variable(*id, name),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&depth) => self.environment.assign_at(depth, name, value.clone()),
                    None => self.globals.assign(name, value.clone())?,
                }
                Ok(value)
            }
            Expr::Call { callee, paren, arguments, .. } => self.evaluate_call(callee, paren, arguments),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value, LoxError> {
        let right = self.evaluate(right)?;
        match operator.token_type {
            TokenType::Minus => {
                let n = as_number(&right, operator.line)?;
                Ok(Value::Number(-n))
            }
            TokenType::Bang => Ok(Value::Boolean(!right.is_truthy())),
            _ => unreachable!("parser only produces unary ! and -"),
        }
    }

    fn evaluate_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value, LoxError> {
        let left = self.evaluate(left)?;
        match operator.token_type {
            TokenType::Or => {
                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }
            TokenType::And => {
                if !left.is_truthy() {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }
            _ => unreachable!("parser only produces logical and/or"),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value, LoxError> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;
        let line = operator.line;

        match operator.token_type {
            TokenType::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
                _ => Err(LoxError::new(line, LoxErrorKind::OperandsMustBeNumbersOrStrings)),
            },
            TokenType::Minus => {
                let (a, b) = as_number_pair(&left, &right, line)?;
                Ok(Value::Number(a - b))
            }
            TokenType::Star => {
                let (a, b) = as_number_pair(&left, &right, line)?;
                Ok(Value::Number(a * b))
            }
            TokenType::Slash => {
                let (a, b) = as_number_pair(&left, &right, line)?;
                Ok(Value::Number(a / b))
            }
            TokenType::Greater => {
                let (a, b) = as_number_pair(&left, &right, line)?;
                Ok(Value::Boolean(a > b))
            }
            TokenType::GreaterEqual => {
                let (a, b) = as_number_pair(&left, &right, line)?;
                Ok(Value::Boolean(a >= b))
            }
            TokenType::Less => {
                let (a, b) = as_number_pair(&left, &right, line)?;
                Ok(Value::Boolean(a < b))
            }
            TokenType::LessEqual => {
                let (a, b) = as_number_pair(&left, &right, line)?;
                Ok(Value::Boolean(a <= b))
            }
            TokenType::EqualEqual => Ok(Value::Boolean(left == right)),
            TokenType::BangEqual => Ok(Value::Boolean(left != right)),
            _ => unreachable!("parser only produces the above binary operators"),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> Result<Value, LoxError> {
        let callee = self.evaluate(callee)?;

        let mut args = Vec::with_capacity(arguments.len());
        for arg in arguments {
            args.push(self.evaluate(arg)?);
        }

        let callable = match callee {
            Value::Callable(c) => c,
            _ => return Err(LoxError::new(paren.line, LoxErrorKind::NotCallable)),
        };

        if args.len() != callable.arity() {
            return Err(LoxError::new(
                paren.line,
                LoxErrorKind::ArityMismatch { expected: callable.arity(), actual: args.len() },
            ));
        }

        callable.call(self, args)
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value, LoxError> {
        match self.locals.get(&id) {
            Some(&depth) => Ok(self.environment.get_at(depth, &name.lexeme)),
            None => self.globals.get(name),
        }
    }
}

fn as_number(value: &Value, line: usize) -> Result<f64, LoxError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(LoxError::new(line, LoxErrorKind::OperandMustBeNumber)),
    }
}

/// Like `as_number`, but for the binary numeric operators, which report the
/// plural "Operands must be numbers." regardless of which side is at fault.
fn as_number_pair(left: &Value, right: &Value, line: usize) -> Result<(f64, f64), LoxError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(LoxError::new(line, LoxErrorKind::OperandsMustBeNumbers)),
    }
}
