//! Statement completion records

use crate::value::Value;

/// Outcome of executing a statement.
///
/// `Return` unwinds through blocks and loops until a function call absorbs
/// it. `Break` and `Continue` unwind to the nearest loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Ran to the end; carries the value of the last expression statement, if any
    Normal(Option<Value>),
    /// `return` with its value
    Return(Value),
    /// `break`
    Break,
    /// `continue`
    Continue,
}

impl Completion {
    /// Whether execution should stop running sibling statements
    pub fn is_abrupt(&self) -> bool {
        !matches!(self, Completion::Normal(_))
    }
}
