//! Bytecode chunk - compiled bytecode container
//!
//! Contains the instruction stream, the constants pool, and a line table
//! parallel to the instruction stream.

use core_types::Value;
use thiserror::Error;

use crate::opcode::OpCode;

/// Maximum number of constants addressable by a one-byte operand
pub const MAX_CONSTANTS: usize = u8::MAX as usize + 1;

/// Errors raised while building or decoding a chunk
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The constants pool already holds 256 entries
    #[error("Too many constants in one chunk.")]
    TooManyConstants,
    /// A jump offset does not fit in 16 bits
    #[error("Too much code to jump over.")]
    JumpTooLarge,
    /// A loop body does not fit in 16 bits
    #[error("Loop body too large.")]
    LoopTooLarge,
    /// A byte in opcode position is not a valid opcode
    #[error("Unknown opcode {byte} at offset {offset}.")]
    UnknownOpcode {
        /// The offending byte
        byte: u8,
        /// Offset of the byte in the instruction stream
        offset: usize,
    },
    /// Execution ran past the last byte of the instruction stream
    #[error("Unexpected end of code at offset {offset}.")]
    UnexpectedEnd {
        /// Offset that was read
        offset: usize,
    },
    /// An operand names a constant slot the pool does not have, or one of
    /// the wrong kind
    #[error("Invalid constant index {idx}.")]
    MissingConstant {
        /// The constant index operand
        idx: u8,
    },
    /// An operand names an upvalue the running closure does not capture
    #[error("Invalid upvalue index {idx}.")]
    MissingUpvalue {
        /// The upvalue index operand
        idx: usize,
    },
}

/// A compiled bytecode chunk containing instructions and constants
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    /// Instruction stream: opcodes followed by their inline operands
    pub code: Vec<u8>,
    /// Source line of every byte in `code`
    pub lines: Vec<u32>,
    /// Constant pool for literal values and nested functions
    pub constants: Vec<Value>,
}

impl Chunk {
    /// Create a new empty bytecode chunk
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw byte with its source line
    pub fn write(&mut self, byte: u8, line: u32) {
        self.code.push(byte);
        self.lines.push(line);
    }

    /// Append an opcode with its source line
    pub fn write_op(&mut self, op: OpCode, line: u32) {
        self.write(op.into(), line);
    }

    /// Append an opcode followed by a one-byte operand
    pub fn write_op_with(&mut self, op: OpCode, operand: u8, line: u32) {
        self.write_op(op, line);
        self.write(operand, line);
    }

    /// Add a constant to the pool and return its index
    pub fn add_constant(&mut self, value: Value) -> Result<u8, ChunkError> {
        if self.constants.len() >= MAX_CONSTANTS {
            return Err(ChunkError::TooManyConstants);
        }
        self.constants.push(value);
        Ok((self.constants.len() - 1) as u8)
    }

    /// Add a constant and emit the instruction that loads it
    pub fn emit_constant(&mut self, value: Value, line: u32) -> Result<u8, ChunkError> {
        let idx = self.add_constant(value)?;
        self.write_op_with(OpCode::Constant, idx, line);
        Ok(idx)
    }

    /// Emit a forward jump with a placeholder offset.
    ///
    /// Returns the position of the placeholder, to be passed to
    /// [`Chunk::patch_jump`] once the target is known.
    pub fn emit_jump(&mut self, op: OpCode, line: u32) -> usize {
        self.write_op(op, line);
        self.write(0xff, line);
        self.write(0xff, line);
        self.code.len() - 2
    }

    /// Point a previously emitted jump at the current end of the chunk
    pub fn patch_jump(&mut self, placeholder: usize) -> Result<(), ChunkError> {
        // -2 to account for the offset bytes themselves
        let jump = self.code.len() - placeholder - 2;
        if jump > u16::MAX as usize {
            return Err(ChunkError::JumpTooLarge);
        }
        let [hi, lo] = (jump as u16).to_be_bytes();
        self.code[placeholder] = hi;
        self.code[placeholder + 1] = lo;
        Ok(())
    }

    /// Emit a backward jump to `loop_start`
    pub fn emit_loop(&mut self, loop_start: usize, line: u32) -> Result<(), ChunkError> {
        self.write_op(OpCode::Loop, line);
        let offset = self.code.len() - loop_start + 2;
        if offset > u16::MAX as usize {
            return Err(ChunkError::LoopTooLarge);
        }
        let [hi, lo] = (offset as u16).to_be_bytes();
        self.write(hi, line);
        self.write(lo, line);
        Ok(())
    }

    /// Read a big-endian 16-bit operand at `offset`
    #[inline]
    pub fn read_u16(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.code[offset], self.code[offset + 1]])
    }

    /// Decode the opcode at `offset`
    pub fn opcode_at(&self, offset: usize) -> Result<OpCode, ChunkError> {
        let byte = self.code[offset];
        OpCode::try_from(byte).map_err(|byte| ChunkError::UnknownOpcode { byte, offset })
    }

    /// Source line of the byte at `offset`
    pub fn line_at(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied()
    }

    /// Constant at `idx`
    pub fn constant(&self, idx: u8) -> Option<Value> {
        self.constants.get(idx as usize).copied()
    }

    /// Get the number of bytes in the instruction stream
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check whether the instruction stream is empty
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Get the number of constants
    pub fn constant_count(&self) -> usize {
        self.constants.len()
    }
}
