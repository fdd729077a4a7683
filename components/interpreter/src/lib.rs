//! Bytecode interpreter
//!
//! This crate provides a stack-based bytecode virtual machine with:
//! - A fetch-decode-execute loop over one chunk per call frame
//! - Closures with shared, lazily closed upvalues
//! - Globals keyed by interned name
//! - Runtime error reports carrying a trace of every active frame
//! - Host functions registered as globals
//!
//! Source text is turned into bytecode by an external [`Compiler`]. All
//! objects allocated while running stay in the VM's heap until
//! [`VM::teardown`] releases them together.
//!
//! # Example
//!
//! ```
//! use bytecode_system::{Chunk, OpCode};
//! use core_types::Value;
//! use interpreter::VM;
//! use memory_manager::ObjFunction;
//!
//! let mut vm = VM::new();
//! let heap = vm.heap_mut();
//! let name = heap.intern("sum");
//!
//! let mut chunk = Chunk::new();
//! chunk.emit_constant(Value::Number(1.0), 1).unwrap();
//! chunk.emit_constant(Value::Number(2.0), 1).unwrap();
//! chunk.write_op(OpCode::Add, 1);
//! let idx = chunk.add_constant(Value::Object(name)).unwrap();
//! chunk.write_op_with(OpCode::DefineGlobal, idx, 1);
//! chunk.write_op(OpCode::Nil, 1);
//! chunk.write_op(OpCode::Return, 1);
//! let script = heap.alloc_function(ObjFunction::script(chunk));
//!
//! vm.run_function(script).unwrap();
//! assert_eq!(vm.get_global("sum"), Some(Value::Number(3.0)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod call_frame;
pub mod compiler;
pub mod config;
mod dispatch;
pub mod globals;
pub mod natives;
mod report;
pub mod upvalue;
pub mod vm;

// Re-export main types at crate root
pub use call_frame::{CallFrame, FRAMES_MAX, STACK_MAX};
pub use compiler::Compiler;
pub use config::{ConfigError, VmConfig};
pub use globals::Globals;
pub use report::render_report;
pub use upvalue::OpenUpvalues;
pub use vm::{InterpretError, VM};
