//! Script Parser Component
//!
//! Provides the contextual lexer, the statement and expression parser, and
//! declaration scope tracking.
//!
//! # Overview
//!
//! - [`Lexer`] - Tokenizes source on demand under a caller-chosen [`Grammar`]
//! - [`Token`] - Token kind, raw text and position
//! - [`Parser`] - Recursive descent statements, precedence-climbing expressions
//! - [`Program`] - Root of the Abstract Syntax Tree
//! - [`ScopeTracker`] - Rejects conflicting `var`/`let`/`const` declarations
//!
//! # Example
//!
//! ```
//! use parser::Parser;
//!
//! let program = Parser::new("let x = 42;").parse_program().unwrap();
//! assert_eq!(program.body.len(), 1);
//! assert!(program.scope.lets.contains("x"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod precedence;
pub mod scope;

pub use ast::{Expression, FunctionDefinition, Program, Statement};
pub use lexer::{Grammar, Keyword, Lexer, Punctuator, Token, TokenKind};
pub use parser::Parser;
pub use scope::{Scope, ScopeTracker};
