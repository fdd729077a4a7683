//! Single-instruction disassembly, used for execution tracing

use crate::chunk::Chunk;
use crate::opcode::OpCode;

/// Render the instruction at `offset` as one line of text.
///
/// Operands are shown raw: constant indices are not resolved against the
/// heap, and `Closure` capture pairs are not listed because their count is
/// a property of the referenced function.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> String {
    let line = match (offset, chunk.line_at(offset)) {
        (0, Some(line)) => format!("{:4}", line),
        (_, Some(line)) if chunk.line_at(offset - 1) == Some(line) => "   |".to_string(),
        (_, Some(line)) => format!("{:4}", line),
        (_, None) => "   ?".to_string(),
    };

    let op = match chunk.opcode_at(offset) {
        Ok(op) => op,
        Err(err) => return format!("{:04} {} {}", offset, line, err),
    };

    let operands = if op.is_jump() {
        if offset + 2 < chunk.len() {
            let jump = chunk.read_u16(offset + 1) as usize;
            let target = if op == OpCode::Loop {
                (offset + 3).wrapping_sub(jump)
            } else {
                offset + 3 + jump
            };
            format!(" {:4} -> {}", offset, target)
        } else {
            String::new()
        }
    } else if op.operand_width() == 1 {
        format!(" {:4}", chunk.code.get(offset + 1).copied().unwrap_or(0))
    } else {
        String::new()
    };

    format!("{:04} {} {:<16}{}", offset, line, op.mnemonic(), operands)
}
