//! Core value types and error handling.
//!
//! This crate provides the foundational types for the virtual machine,
//! including value representation, the object handle, error types, and
//! stack-trace frames.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of runtime values
//! - [`ObjRef`] - Non-owning handle to a heap object
//! - [`RuntimeError`] - Runtime errors with stack traces
//! - [`RuntimeErrorKind`] - Types of runtime errors
//! - [`CompileError`] - Failure signalled by the compiler
//! - [`StackFrame`] - Call stack frame information
//!
//! # Examples
//!
//! ```
//! use core_types::{RuntimeError, RuntimeErrorKind, Value};
//!
//! let zero = Value::Number(0.0);
//! assert!(!zero.is_falsey());
//! assert_eq!(zero.type_name(), "number");
//!
//! let error = RuntimeError::new(RuntimeErrorKind::NotCallable, "Can only call functions and classes.");
//! assert_eq!(error.kind, RuntimeErrorKind::NotCallable);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;
mod value;

pub use error::{CompileError, RuntimeError, RuntimeErrorKind};
pub use source::StackFrame;
pub use value::{ObjRef, Value};
