//! Bytecode system for the stack VM
//!
//! This crate provides the instruction set and the bytecode container a
//! compiler fills and the interpreter executes.
//!
//! # Features
//!
//! - Stack-based bytecode with one-byte operands and 16-bit big-endian jumps
//! - Constants pool addressable by a single byte
//! - Line table parallel to the instruction stream for diagnostics
//! - Single-instruction disassembly for execution tracing
//!
//! # Example
//!
//! ```
//! use bytecode_system::{Chunk, OpCode};
//! use core_types::Value;
//!
//! let mut chunk = Chunk::new();
//!
//! chunk.emit_constant(Value::Number(42.0), 1).unwrap();
//! chunk.write_op(OpCode::Return, 1);
//!
//! assert_eq!(chunk.opcode_at(0), Ok(OpCode::Constant));
//! assert_eq!(chunk.line_at(2), Some(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod debug;
pub mod opcode;

// Re-export main types at crate root
pub use chunk::{Chunk, ChunkError, MAX_CONSTANTS};
pub use debug::disassemble_instruction;
pub use opcode::OpCode;
