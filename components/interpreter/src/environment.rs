//! Environments and bindings
//!
//! Environments form a parent chain. A function value keeps its defining
//! environment alive through an `Rc`, so any number of invocations and
//! escaped closures can share one parent.
//!
//! A function stored in a binding of its own defining environment forms a
//! reference cycle. The evaluator breaks these with [`Environment::release`]
//! once a program finishes.

use crate::value::Value;
use core_types::{JsError, SourcePosition};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to an environment
pub type EnvRef = Rc<RefCell<Environment>>;

/// A named storage cell
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Current value
    pub value: Value,
    /// False while a `let`/`const` is in its temporal dead zone
    pub initialized: bool,
    /// Set for `const` and the built-in globals
    pub read_only: bool,
}

impl Binding {
    /// An initialized, writable binding
    pub fn mutable(value: Value) -> Self {
        Self {
            value,
            initialized: true,
            read_only: false,
        }
    }

    /// A declared binding whose declaration has not executed yet
    pub fn uninitialized(read_only: bool) -> Self {
        Self {
            value: Value::Undefined,
            initialized: false,
            read_only,
        }
    }
}

/// One scope's bindings
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
    parent: Option<EnvRef>,
    /// `with` object consulted before the bindings
    object: Option<Value>,
    function_scope: bool,
}

/// Where a name resolved to
enum Location {
    Binding(EnvRef),
    Property(Value),
}

impl Environment {
    /// Root environment holding `undefined`, `NaN` and `Infinity`
    pub fn new_global() -> EnvRef {
        let mut global = Environment {
            function_scope: true,
            ..Default::default()
        };
        for (name, value) in [
            ("undefined", Value::Undefined),
            ("NaN", Value::Number(f64::NAN)),
            ("Infinity", Value::Number(f64::INFINITY)),
        ] {
            global.bindings.insert(
                name.to_string(),
                Binding {
                    value,
                    initialized: true,
                    read_only: true,
                },
            );
        }
        Rc::new(RefCell::new(global))
    }

    /// Environment for a function invocation or the program body
    pub fn new_function_scope(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            parent: Some(Rc::clone(parent)),
            function_scope: true,
            ..Default::default()
        }))
    }

    /// Environment for a block
    pub fn new_block(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            parent: Some(Rc::clone(parent)),
            ..Default::default()
        }))
    }

    /// Environment for the body of `with (object)`
    pub fn new_object_scope(parent: &EnvRef, object: Value) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            parent: Some(Rc::clone(parent)),
            object: Some(object),
            ..Default::default()
        }))
    }

    /// Enclosing environment
    pub fn parent(&self) -> Option<EnvRef> {
        self.parent.clone()
    }

    /// Look up a binding in this environment only
    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Drop every binding and any `with` object. Values that reached this
    /// environment only through its own bindings are freed with them.
    pub fn release(&mut self) {
        self.bindings.clear();
        self.object = None;
    }

    /// Hoist a `var`: Undefined unless already declared here
    pub fn declare_var(&mut self, name: &str) {
        self.bindings
            .entry(name.to_string())
            .or_insert_with(|| Binding::mutable(Value::Undefined));
    }

    /// Hoist a `let`/`const` in its dead zone
    pub fn declare_lexical(&mut self, name: &str, read_only: bool) {
        self.bindings
            .insert(name.to_string(), Binding::uninitialized(read_only));
    }

    /// Bind a name to a value, replacing any binding of that name here
    pub fn define(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), Binding::mutable(value));
    }

    /// Run a `let`/`const` declaration: set the value and end the dead zone
    pub fn initialize(&mut self, name: &str, value: Value) {
        match self.bindings.get_mut(name) {
            Some(binding) => {
                binding.value = value;
                binding.initialized = true;
            }
            None => self.define(name, value),
        }
    }

    /// Nearest enclosing function (or program) environment
    pub fn function_scope(env: &EnvRef) -> EnvRef {
        let mut current = Rc::clone(env);
        loop {
            let parent = {
                let scope = current.borrow();
                if scope.function_scope {
                    None
                } else {
                    scope.parent()
                }
            };
            match parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    fn locate(env: &EnvRef, name: &str) -> Option<Location> {
        let mut current = Rc::clone(env);
        loop {
            let parent = {
                let scope = current.borrow();
                if let Some(object) = &scope.object {
                    if object.has_own_property(name) {
                        return Some(Location::Property(object.clone()));
                    }
                }
                if scope.binding(name).is_some() {
                    return Some(Location::Binding(Rc::clone(&current)));
                }
                scope.parent()
            };
            current = parent?;
        }
    }

    /// Read a name. Fails for undeclared names and for bindings in their
    /// dead zone.
    pub fn lookup(env: &EnvRef, name: &str, position: SourcePosition) -> Result<Value, JsError> {
        match Self::locate(env, name) {
            Some(Location::Property(object)) => object.get_property(name, position),
            Some(Location::Binding(scope)) => {
                let scope = scope.borrow();
                match scope.binding(name) {
                    Some(binding) if binding.initialized => Ok(binding.value.clone()),
                    _ => Err(dead_zone(name, position)),
                }
            }
            None => Err(not_defined(name, position)),
        }
    }

    /// Read a name for `typeof`: `None` instead of an error when the name
    /// is undeclared or uninitialized
    pub fn lookup_for_typeof(env: &EnvRef, name: &str, position: SourcePosition) -> Option<Value> {
        Self::lookup(env, name, position).ok()
    }

    /// Write an existing binding
    pub fn assign(
        env: &EnvRef,
        name: &str,
        value: Value,
        position: SourcePosition,
    ) -> Result<(), JsError> {
        match Self::locate(env, name) {
            Some(Location::Property(object)) => object.set_property(name, value, position),
            Some(Location::Binding(scope)) => {
                let mut scope = scope.borrow_mut();
                let Some(binding) = scope.bindings.get_mut(name) else {
                    return Err(not_defined(name, position));
                };
                if !binding.initialized {
                    return Err(dead_zone(name, position));
                }
                if binding.read_only {
                    return Err(JsError::type_error(
                        "Assignment to constant variable.",
                        Some(position),
                    ));
                }
                binding.value = value;
                Ok(())
            }
            None => Err(not_defined(name, position)),
        }
    }
}

fn not_defined(name: &str, position: SourcePosition) -> JsError {
    JsError::reference(format!("{} is not defined", name), Some(position))
}

fn dead_zone(name: &str, position: SourcePosition) -> JsError {
    JsError::reference(
        format!("Cannot access '{}' before initialization", name),
        Some(position),
    )
}
