//! Unit tests for SourcePosition and StackFrame

use core_types::{SourcePosition, StackFrame};

mod source_position_tests {
    use super::*;

    #[test]
    fn test_source_position_creation() {
        let pos = SourcePosition {
            line: 10,
            column: 5,
            offset: 150,
        };

        assert_eq!(pos.line, 10);
        assert_eq!(pos.column, 5);
        assert_eq!(pos.offset, 150);
    }

    #[test]
    fn test_source_position_is_copy() {
        let pos1 = SourcePosition {
            line: 42,
            column: 7,
            offset: 1000,
        };
        let pos2 = pos1;

        assert_eq!(pos1, pos2);
    }

    #[test]
    fn test_source_position_display() {
        let pos = SourcePosition {
            line: 1,
            column: 2,
            offset: 3,
        };
        assert_eq!(pos.to_string(), "1:2");
    }
}

mod stack_frame_tests {
    use super::*;

    #[test]
    fn test_named_frame_display() {
        let frame = StackFrame {
            function_name: Some("fib".to_string()),
            line: 4,
            column: 12,
        };
        assert_eq!(frame.to_string(), "at fib (4:12)");
    }

    #[test]
    fn test_anonymous_frame_display() {
        let frame = StackFrame {
            function_name: None,
            line: 9,
            column: 3,
        };
        assert_eq!(frame.to_string(), "at <anonymous> (9:3)");
    }
}
