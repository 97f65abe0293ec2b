//! Declaration tracking during parsing
//!
//! Every function body and block gets a [`Scope`] recording the names it
//! declares. Conflicting declarations are rejected as soon as they are seen,
//! so a program with a bad redeclaration never reaches evaluation.

use crate::ast::VariableKind;
use crate::error::syntax_error;
use core_types::{JsError, SourcePosition};
use std::collections::BTreeSet;
use tracing::trace;

/// Names declared in one lexical region.
///
/// A name appears in at most one of the three sets, with one exception:
/// a block's `vars` also lists `var` names declared in nested blocks, so
/// that a later `let` in the enclosing block sees the conflict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    /// `var` names (and function declarations and parameters)
    pub vars: BTreeSet<String>,
    /// `let` names
    pub lets: BTreeSet<String>,
    /// `const` names
    pub consts: BTreeSet<String>,
}

impl Scope {
    /// Whether the name is declared here in any form
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains(name) || self.is_lexical(name)
    }

    /// Whether the name is declared here with `let` or `const`
    pub fn is_lexical(&self, name: &str) -> bool {
        self.lets.contains(name) || self.consts.contains(name)
    }

    /// Whether the scope declares nothing
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty() && self.lets.is_empty() && self.consts.is_empty()
    }
}

#[derive(Debug)]
struct Frame {
    scope: Scope,
    is_function: bool,
}

/// Stack of open scopes while the parser walks the source.
///
/// The bottom frame is the program scope, which behaves like a function
/// scope for `var` purposes.
#[derive(Debug)]
pub struct ScopeTracker {
    frames: Vec<Frame>,
}

impl Default for ScopeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTracker {
    /// Create a tracker with the program scope open
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                scope: Scope::default(),
                is_function: true,
            }],
        }
    }

    /// Open a function scope
    pub fn enter_function(&mut self) {
        self.frames.push(Frame {
            scope: Scope::default(),
            is_function: true,
        });
    }

    /// Open a block scope
    pub fn enter_block(&mut self) {
        self.frames.push(Frame {
            scope: Scope::default(),
            is_function: false,
        });
    }

    /// Close the innermost scope and return its declarations. Closing the
    /// program scope hands it back too, leaving a fresh one in its place.
    pub fn exit(&mut self) -> Scope {
        match self.frames.pop() {
            Some(frame) if !self.frames.is_empty() => frame.scope,
            Some(frame) => {
                *self = Self::new();
                frame.scope
            }
            None => Scope::default(),
        }
    }

    /// Register a declaration in the current scope.
    ///
    /// - `var` may repeat a `var`, but not a `let`/`const` in any scope it
    ///   passes through on its way up to the enclosing function scope.
    /// - `let`/`const` may not repeat any name already in the current scope.
    pub fn declare(
        &mut self,
        name: &str,
        kind: VariableKind,
        position: SourcePosition,
    ) -> Result<(), JsError> {
        trace!(name, ?kind, depth = self.frames.len(), "declare");
        match kind {
            VariableKind::Var => self.declare_var(name, position),
            VariableKind::Let | VariableKind::Const => {
                let Some(frame) = self.frames.last_mut() else {
                    return Ok(());
                };
                if frame.scope.contains(name) {
                    return Err(already_declared(name, position));
                }
                let set = if kind == VariableKind::Let {
                    &mut frame.scope.lets
                } else {
                    &mut frame.scope.consts
                };
                set.insert(name.to_string());
                Ok(())
            }
        }
    }

    fn declare_var(&mut self, name: &str, position: SourcePosition) -> Result<(), JsError> {
        for frame in self.frames.iter().rev() {
            if frame.scope.is_lexical(name) {
                return Err(already_declared(name, position));
            }
            if frame.is_function {
                break;
            }
        }
        for frame in self.frames.iter_mut().rev() {
            frame.scope.vars.insert(name.to_string());
            if frame.is_function {
                break;
            }
        }
        Ok(())
    }
}

fn already_declared(name: &str, position: SourcePosition) -> JsError {
    syntax_error(
        format!("Identifier '{}' has already been declared", name),
        Some(position),
    )
}
