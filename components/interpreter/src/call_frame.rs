//! Call frame for function call stack management

use core_types::{SourcePosition, StackFrame};

/// Call frame representing a function invocation
///
/// Pushed for the duration of a call so runtime errors can report the
/// chain of calls that led to them.
#[derive(Debug, Clone, PartialEq)]
pub struct CallFrame {
    /// Name of the called function, if it has one
    pub function_name: Option<String>,
    /// Where the call was made
    pub call_site: SourcePosition,
}

impl CallFrame {
    /// Create a new call frame
    pub fn new(function_name: Option<String>, call_site: SourcePosition) -> Self {
        Self {
            function_name,
            call_site,
        }
    }

    /// Stack trace entry for this frame
    pub fn to_stack_frame(&self) -> StackFrame {
        StackFrame {
            function_name: self.function_name.clone(),
            line: self.call_site.line,
            column: self.call_site.column,
        }
    }
}
