//! Interpreter configuration

/// Default limit on nested function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Settings fixed when an [`Interpreter`](crate::Interpreter) is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Nested calls allowed before a RangeError
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl InterpreterConfig {
    /// Set the call depth limit
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }
}
