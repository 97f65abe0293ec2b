//! Unit tests for JsError and ErrorKind

use core_types::{ErrorKind, JsError, SourcePosition, StackFrame};

mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_equality() {
        assert_eq!(ErrorKind::TypeError, ErrorKind::TypeError);
        assert_ne!(ErrorKind::TypeError, ErrorKind::RangeError);
    }

    #[test]
    fn test_error_kind_names() {
        let names: Vec<String> = [
            ErrorKind::SyntaxError,
            ErrorKind::ReferenceError,
            ErrorKind::TypeError,
            ErrorKind::RangeError,
            ErrorKind::Uncaught,
            ErrorKind::InternalError,
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();

        assert_eq!(
            names,
            vec![
                "SyntaxError",
                "ReferenceError",
                "TypeError",
                "RangeError",
                "Uncaught",
                "InternalError"
            ]
        );
    }
}

mod js_error_tests {
    use super::*;

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(JsError::syntax("a", None).kind, ErrorKind::SyntaxError);
        assert_eq!(JsError::reference("b", None).kind, ErrorKind::ReferenceError);
        assert_eq!(JsError::type_error("c", None).kind, ErrorKind::TypeError);
        assert_eq!(JsError::range("d", None).kind, ErrorKind::RangeError);
        assert_eq!(JsError::uncaught("e", None).kind, ErrorKind::Uncaught);
    }

    #[test]
    fn test_constructor_starts_with_empty_stack() {
        let error = JsError::type_error("undefined is not a function", None);
        assert!(error.stack.is_empty());
        assert!(error.source_position.is_none());
        assert_eq!(error.message, "undefined is not a function");
    }

    #[test]
    fn test_display_without_position() {
        let error = JsError::reference("x is not defined", None);
        assert_eq!(error.to_string(), "ReferenceError: x is not defined");
    }

    #[test]
    fn test_display_with_position() {
        let error = JsError::syntax(
            "Unterminated string literal",
            Some(SourcePosition {
                line: 3,
                column: 14,
                offset: 40,
            }),
        );
        assert_eq!(
            error.to_string(),
            "SyntaxError: Unterminated string literal at 3:14"
        );
    }

    #[test]
    fn test_error_with_stack_frames() {
        let mut error = JsError::range("Maximum call stack size exceeded", None);
        error.stack = (0..3)
            .map(|i| StackFrame {
                function_name: Some(format!("fn_{}", i)),
                line: i + 1,
                column: 1,
            })
            .collect();

        assert_eq!(error.stack.len(), 3);
        assert_eq!(error.stack[0].function_name.as_deref(), Some("fn_0"));
    }

    #[test]
    fn test_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&JsError::uncaught("boom", None));
    }

    #[test]
    fn test_is_syntax_error() {
        assert!(JsError::syntax("bad", None).is_syntax_error());
        assert!(!JsError::type_error("bad", None).is_syntax_error());
        assert!(!JsError::uncaught("bad", None).is_syntax_error());
    }
}
