//! Contract compliance tests for core_types
//!
//! These tests pin the public surface the parser and interpreter rely on.

use core_types::{ErrorKind, JsError, SourcePosition, StackFrame};

mod error_contract_tests {
    use super::*;

    /// Contract: JsError exposes kind, message, stack and source_position
    #[test]
    fn test_js_error_fields() {
        let error = JsError {
            kind: ErrorKind::TypeError,
            message: "x is not a function".to_string(),
            stack: vec![StackFrame {
                function_name: None,
                line: 1,
                column: 1,
            }],
            source_position: Some(SourcePosition::default()),
        };
        assert_eq!(error.kind, ErrorKind::TypeError);
        assert_eq!(error.stack.len(), 1);
    }

    /// Contract: syntax failures are distinguishable from runtime failures
    #[test]
    fn test_syntax_error_is_distinguishable() {
        let runtime_kinds = [
            ErrorKind::ReferenceError,
            ErrorKind::TypeError,
            ErrorKind::RangeError,
            ErrorKind::Uncaught,
            ErrorKind::InternalError,
        ];
        for kind in runtime_kinds {
            assert!(!JsError::new(kind, "m", None).is_syntax_error());
        }
        assert!(JsError::new(ErrorKind::SyntaxError, "m", None).is_syntax_error());
    }

    /// Contract: errors are cloneable and comparable
    #[test]
    fn test_js_error_clone_eq() {
        let error = JsError::syntax("Unexpected token", None);
        assert_eq!(error.clone(), error);
    }
}
