// ABOUTME: Nested variable scopes - the chain the resolver's depths are indices into

use crate::error::{LoxError, LoxErrorKind};
use crate::token::Token;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A single scope frame plus a link to its enclosing frame. Environments
/// are reference-counted rather than stack-allocated: a closure keeps its
/// capture environment alive for as long as the closure itself lives, even
/// after the frame that declared it has returned.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    enclosing: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates the global environment, with no enclosing scope.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            enclosing: None,
        })
    }

    /// Creates a child scope nested inside `enclosing`.
    pub fn with_enclosing(enclosing: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            enclosing: Some(enclosing),
        })
    }

    /// Binds `name` in this scope, unconditionally. Redefining an existing
    /// global is allowed; redefining an existing local is caught earlier,
    /// by the resolver.
    pub fn define(&self, name: String, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Looks up `name` starting in this scope and walking outward.
    pub fn get(&self, name: &Token) -> Result<Value, LoxError> {
        if let Some(value) = self.bindings.borrow().get(&name.lexeme) {
            return Ok(value.clone());
        }
        if let Some(ref enclosing) = self.enclosing {
            return enclosing.get(name);
        }
        Err(LoxError::new(
            name.line,
            LoxErrorKind::UndefinedVariable(name.lexeme.clone()),
        ))
    }

    /// Overwrites an existing binding for `name`, walking outward until one
    /// is found. Unlike `define`, this fails if the name isn't bound
    /// anywhere in the chain.
    pub fn assign(&self, name: &Token, value: Value) -> Result<(), LoxError> {
        if self.bindings.borrow().contains_key(&name.lexeme) {
            self.bindings.borrow_mut().insert(name.lexeme.clone(), value);
            return Ok(());
        }
        if let Some(ref enclosing) = self.enclosing {
            return enclosing.assign(name, value);
        }
        Err(LoxError::new(
            name.line,
            LoxErrorKind::UndefinedVariable(name.lexeme.clone()),
        ))
    }

    /// Walks exactly `depth` enclosing hops and looks up `name` directly in
    /// that scope. The resolver guarantees this lookup succeeds; a miss here
    /// is a bug in the resolver/interpreter agreement, not a user error.
    pub fn get_at(&self, depth: usize, name: &str) -> Value {
        self.ancestor(depth)
            .bindings
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_else(|| {
                panic!(
                    "resolver invariant violated: '{}' not found at depth {}",
                    name, depth
                )
            })
    }

    pub fn assign_at(&self, depth: usize, name: &Token, value: Value) {
        self.ancestor(depth)
            .bindings
            .borrow_mut()
            .insert(name.lexeme.clone(), value);
    }

    /// Returns `self` after walking `depth` enclosing hops. `depth == 0`
    /// returns an environment equivalent to this one, but since `ancestor`
    /// needs an owned `Rc` to recurse through `enclosing`, callers go
    /// through `Rc<Environment>` methods below instead of calling this
    /// directly on a bare reference past depth 0.
    fn ancestor(&self, depth: usize) -> &Environment {
        let mut env = self;
        for _ in 0..depth {
            env = env
                .enclosing
                .as_deref()
                .expect("resolver invariant violated: not enough enclosing scopes");
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Literal, TokenType};

    fn tok(name: &str) -> Token {
        Token::new(TokenType::Identifier, name, Literal::None, 1)
    }

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define("x".to_string(), Value::Number(42.0));
        assert_eq!(env.get(&tok("x")).unwrap(), Value::Number(42.0));
    }

    #[test]
    fn test_undefined_variable_errors() {
        let env = Environment::new();
        assert!(env.get(&tok("missing")).is_err());
    }

    #[test]
    fn test_child_shadows_parent() {
        let parent = Environment::new();
        parent.define("x".to_string(), Value::Number(1.0));
        let child = Environment::with_enclosing(parent);
        child.define("x".to_string(), Value::Number(2.0));
        assert_eq!(child.get(&tok("x")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_child_sees_parent_binding() {
        let parent = Environment::new();
        parent.define("x".to_string(), Value::Number(1.0));
        let child = Environment::with_enclosing(parent);
        assert_eq!(child.get(&tok("x")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_assign_updates_enclosing_scope() {
        let parent = Environment::new();
        parent.define("x".to_string(), Value::Number(1.0));
        let child = Environment::with_enclosing(parent.clone());
        child.assign(&tok("x"), Value::Number(9.0)).unwrap();
        assert_eq!(parent.get(&tok("x")).unwrap(), Value::Number(9.0));
    }

    #[test]
    fn test_assign_to_undefined_errors() {
        let env = Environment::new();
        assert!(env.assign(&tok("missing"), Value::Nil).is_err());
    }

    #[test]
    fn test_get_at_and_assign_at_use_exact_depth() {
        let global = Environment::new();
        global.define("x".to_string(), Value::Number(1.0));
        let inner = Environment::with_enclosing(global.clone());
        inner.define("x".to_string(), Value::Number(2.0));

        // depth 0 finds inner's own binding
        assert_eq!(inner.get_at(0, "x"), Value::Number(2.0));
        // depth 1 skips inner and finds global's binding
        assert_eq!(inner.get_at(1, "x"), Value::Number(1.0));

        inner.assign_at(1, &tok("x"), Value::Number(42.0));
        assert_eq!(global.get(&tok("x")).unwrap(), Value::Number(42.0));
    }
}
