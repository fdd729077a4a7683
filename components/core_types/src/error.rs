//! Error types and error handling.
//!
//! This module provides the error taxonomy of the virtual machine: compile
//! errors reported by the external compiler and runtime errors raised by the
//! dispatch loop, along with the call-stack trace captured when they occur.

use crate::StackFrame;
use thiserror::Error;

/// The kind of a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeErrorKind {
    /// Operand kinds do not fit the operation (e.g. `1 + "a"`)
    TypeError,
    /// Read of, or assignment to, a global that was never defined
    UndefinedVariable,
    /// A closure was called with the wrong number of arguments
    ArityMismatch,
    /// Attempt to call something that is neither a closure nor a native
    NotCallable,
    /// The frame stack is full
    StackOverflow,
}

impl std::fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RuntimeErrorKind::TypeError => "TypeError",
            RuntimeErrorKind::UndefinedVariable => "UndefinedVariable",
            RuntimeErrorKind::ArityMismatch => "ArityMismatch",
            RuntimeErrorKind::NotCallable => "NotCallable",
            RuntimeErrorKind::StackOverflow => "StackOverflow",
        };
        f.write_str(name)
    }
}

/// A runtime error with message and stack trace.
///
/// The stack is ordered innermost (the frame that failed) first, ending with
/// the top-level script frame.
///
/// # Examples
///
/// ```
/// use core_types::{RuntimeError, RuntimeErrorKind};
///
/// let error = RuntimeError::new(RuntimeErrorKind::TypeError, "Operands must be numbers.");
///
/// assert_eq!(error.kind, RuntimeErrorKind::TypeError);
/// assert_eq!(error.to_string(), "Operands must be numbers.");
/// assert!(error.stack.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct RuntimeError {
    /// The type of error
    pub kind: RuntimeErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Stack trace at the time of the error, innermost frame first
    pub stack: Vec<StackFrame>,
}

impl RuntimeError {
    /// Create an error without a stack trace yet attached
    pub fn new(kind: RuntimeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stack: Vec::new(),
        }
    }

    /// Attach the captured stack trace
    pub fn with_stack(mut self, stack: Vec<StackFrame>) -> Self {
        self.stack = stack;
        self
    }
}

/// Failure reported by the compiler before any execution starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("compile error: {message}")]
pub struct CompileError {
    /// Human-readable description produced by the compiler
    pub message: String,
}

impl CompileError {
    /// Create a compile error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
