//! Stack frame type for runtime error traces.

use std::fmt;

/// Represents a single frame in a call-stack trace.
///
/// # Examples
///
/// ```
/// use core_types::StackFrame;
///
/// let frame = StackFrame::new(Some("fib".to_string()), 12);
/// assert_eq!(frame.to_string(), "[line 12] in fib()");
///
/// let script = StackFrame::new(None, 3);
/// assert_eq!(script.to_string(), "[line 3] in script");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Name of the function, or None for the top-level script
    pub function_name: Option<String>,
    /// Source line of the instruction being executed in this frame
    pub line: u32,
}

impl StackFrame {
    /// Create a new stack frame
    pub fn new(function_name: Option<String>, line: u32) -> Self {
        Self {
            function_name,
            line,
        }
    }

    /// Returns true if this frame belongs to the implicit top-level script
    pub fn is_script(&self) -> bool {
        self.function_name.is_none()
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function_name {
            Some(name) => write!(f, "[line {}] in {}()", self.line, name),
            None => write!(f, "[line {}] in script", self.line),
        }
    }
}
