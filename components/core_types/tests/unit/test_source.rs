//! Unit tests for StackFrame

use core_types::StackFrame;

#[test]
fn test_named_frame_display() {
    let frame = StackFrame::new(Some("outer".to_string()), 5);
    assert_eq!(frame.to_string(), "[line 5] in outer()");
}

#[test]
fn test_script_frame_display() {
    let frame = StackFrame::new(None, 1);
    assert_eq!(frame.to_string(), "[line 1] in script");
}

#[test]
fn test_frame_equality() {
    let a = StackFrame::new(Some("f".to_string()), 2);
    let b = StackFrame::new(Some("f".to_string()), 2);
    let c = StackFrame::new(Some("f".to_string()), 3);
    assert_eq!(a, b);
    assert_ne!(a, c);
}
