// ABOUTME: Things a Lox value can call - user functions, classes, and the native clock()

use crate::ast::FunctionDecl;
use crate::environment::Environment;
use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Anything `Value::Callable` can wrap: user-defined functions, classes
/// (called to construct an instance), and native functions like `clock`.
pub trait Callable: fmt::Debug {
    fn arity(&self) -> usize;
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, LoxError>;
    /// Short text used by `Value`'s `Display` impl, e.g. `<fn add>`.
    fn describe(&self) -> String;
}

/// A user-defined function (or, in principle, a method) paired with the
/// environment it closed over at declaration time.
#[derive(Debug)]
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: Rc<Environment>,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<Environment>) -> Self {
        LoxFunction { declaration, closure }
    }
}

impl Callable for LoxFunction {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, LoxError> {
        let env = Environment::with_enclosing(self.closure.clone());
        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            env.define(param.lexeme.clone(), arg);
        }
        interpreter.execute_block(&self.declaration.body, env)
    }

    fn describe(&self) -> String {
        format!("<fn {}>", self.declaration.name.lexeme)
    }
}

/// A class declaration. Lox classes are callable: calling one constructs a
/// bare instance. Method lookup and `this`/`super` binding are out of scope
/// here, so the method table is carried for completeness but never consulted
/// at call time.
#[derive(Debug)]
pub struct LoxClass {
    pub name: String,
    #[allow(dead_code)]
    methods: HashMap<String, Rc<FunctionDecl>>,
}

impl LoxClass {
    pub fn new(name: String, methods: HashMap<String, Rc<FunctionDecl>>) -> Self {
        LoxClass { name, methods }
    }
}

impl Callable for LoxClass {
    fn arity(&self) -> usize {
        0
    }

    fn call(&self, _interpreter: &mut Interpreter, _arguments: Vec<Value>) -> Result<Value, LoxError> {
        Ok(Value::Instance(std::rc::Rc::new(std::cell::RefCell::new(
            LoxInstance::new(self.name.clone()),
        ))))
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// An instance of a `LoxClass`: a name (for display) plus its own field
/// table. Fields exist because `Value::Instance` must hold something, but
/// without `Get`/`Set` expressions there's no surface syntax that reads or
/// writes them yet.
#[derive(Debug)]
pub struct LoxInstance {
    pub class_name: String,
    #[allow(dead_code)]
    fields: HashMap<String, Value>,
}

impl LoxInstance {
    fn new(class_name: String) -> Self {
        LoxInstance {
            class_name,
            fields: HashMap::new(),
        }
    }
}

/// `clock()`: seconds since the Unix epoch, as a float. The only native
/// function the language exposes.
#[derive(Debug)]
pub struct NativeClock;

impl Callable for NativeClock {
    fn arity(&self) -> usize {
        0
    }

    fn call(&self, _interpreter: &mut Interpreter, _arguments: Vec<Value>) -> Result<Value, LoxError> {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Ok(Value::Number(seconds))
    }

    fn describe(&self) -> String {
        "<native fn clock>".to_string()
    }
}
