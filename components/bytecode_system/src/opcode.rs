//! Bytecode opcodes for the stack VM
//!
//! Defines the instruction set and the width of each instruction's inline
//! operands. Constant, local-slot, upvalue and argument-count operands are a
//! single byte; jump offsets are two bytes, big-endian.

/// Bytecode opcodes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // Literals
    /// Push constant from the pool (operand: constant index)
    Constant,
    /// Push nil
    Nil,
    /// Push boolean true
    True,
    /// Push boolean false
    False,
    /// Discard the top of the stack
    Pop,

    // Variables
    /// Push a local from the frame window (operand: slot)
    GetLocal,
    /// Store top of stack into a local, leaving it on the stack (operand: slot)
    SetLocal,
    /// Push a global by name (operand: name constant)
    GetGlobal,
    /// Define or redefine a global, popping its value (operand: name constant)
    DefineGlobal,
    /// Assign an existing global, leaving the value on the stack (operand: name constant)
    SetGlobal,
    /// Push a captured variable (operand: upvalue index)
    GetUpvalue,
    /// Store into a captured variable (operand: upvalue index)
    SetUpvalue,

    // Comparison
    /// Equality over all value kinds
    Equal,
    /// Numeric greater-than
    Greater,
    /// Numeric less-than
    Less,

    // Arithmetic
    /// Numeric addition or string concatenation
    Add,
    /// Numeric subtraction
    Subtract,
    /// Numeric multiplication
    Multiply,
    /// Numeric division
    Divide,
    /// Push whether the popped value is falsey
    Not,
    /// Numeric negation
    Negate,

    // Output
    /// Pop and print a value
    Print,

    // Control flow
    /// Unconditional forward jump (operand: u16 offset)
    Jump,
    /// Forward jump if top of stack is falsey, without popping (operand: u16 offset)
    JumpIfFalse,
    /// Unconditional backward jump (operand: u16 offset)
    Loop,

    // Functions
    /// Call the value below the arguments (operand: argument count)
    Call,
    /// Wrap a function constant in a closure (operand: function constant,
    /// followed by one `(is_local, index)` byte pair per upvalue)
    Closure,
    /// Hoist the top stack slot into its upvalue and pop it
    CloseUpvalue,
    /// Return from the current function
    Return,
}

impl OpCode {
    /// Every opcode, in encoding order
    pub const ALL: [OpCode; 29] = [
        OpCode::Constant,
        OpCode::Nil,
        OpCode::True,
        OpCode::False,
        OpCode::Pop,
        OpCode::GetLocal,
        OpCode::SetLocal,
        OpCode::GetGlobal,
        OpCode::DefineGlobal,
        OpCode::SetGlobal,
        OpCode::GetUpvalue,
        OpCode::SetUpvalue,
        OpCode::Equal,
        OpCode::Greater,
        OpCode::Less,
        OpCode::Add,
        OpCode::Subtract,
        OpCode::Multiply,
        OpCode::Divide,
        OpCode::Not,
        OpCode::Negate,
        OpCode::Print,
        OpCode::Jump,
        OpCode::JumpIfFalse,
        OpCode::Loop,
        OpCode::Call,
        OpCode::Closure,
        OpCode::CloseUpvalue,
        OpCode::Return,
    ];

    /// Number of fixed operand bytes following the opcode.
    ///
    /// `Closure` additionally carries two bytes per captured upvalue; that
    /// count depends on the referenced function and is not included here.
    pub fn operand_width(self) -> usize {
        match self {
            OpCode::Constant
            | OpCode::GetLocal
            | OpCode::SetLocal
            | OpCode::GetGlobal
            | OpCode::DefineGlobal
            | OpCode::SetGlobal
            | OpCode::GetUpvalue
            | OpCode::SetUpvalue
            | OpCode::Call
            | OpCode::Closure => 1,
            OpCode::Jump | OpCode::JumpIfFalse | OpCode::Loop => 2,
            _ => 0,
        }
    }

    /// Check if this opcode transfers control
    pub fn is_jump(self) -> bool {
        matches!(self, OpCode::Jump | OpCode::JumpIfFalse | OpCode::Loop)
    }

    /// Check if this opcode takes two numeric operands
    pub fn is_binary_arithmetic(self) -> bool {
        matches!(
            self,
            OpCode::Subtract | OpCode::Multiply | OpCode::Divide | OpCode::Greater | OpCode::Less
        )
    }

    /// Upper-case mnemonic used by the disassembler
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Constant => "OP_CONSTANT",
            OpCode::Nil => "OP_NIL",
            OpCode::True => "OP_TRUE",
            OpCode::False => "OP_FALSE",
            OpCode::Pop => "OP_POP",
            OpCode::GetLocal => "OP_GET_LOCAL",
            OpCode::SetLocal => "OP_SET_LOCAL",
            OpCode::GetGlobal => "OP_GET_GLOBAL",
            OpCode::DefineGlobal => "OP_DEFINE_GLOBAL",
            OpCode::SetGlobal => "OP_SET_GLOBAL",
            OpCode::GetUpvalue => "OP_GET_UPVALUE",
            OpCode::SetUpvalue => "OP_SET_UPVALUE",
            OpCode::Equal => "OP_EQUAL",
            OpCode::Greater => "OP_GREATER",
            OpCode::Less => "OP_LESS",
            OpCode::Add => "OP_ADD",
            OpCode::Subtract => "OP_SUBTRACT",
            OpCode::Multiply => "OP_MULTIPLY",
            OpCode::Divide => "OP_DIVIDE",
            OpCode::Not => "OP_NOT",
            OpCode::Negate => "OP_NEGATE",
            OpCode::Print => "OP_PRINT",
            OpCode::Jump => "OP_JUMP",
            OpCode::JumpIfFalse => "OP_JUMP_IF_FALSE",
            OpCode::Loop => "OP_LOOP",
            OpCode::Call => "OP_CALL",
            OpCode::Closure => "OP_CLOSURE",
            OpCode::CloseUpvalue => "OP_CLOSE_UPVALUE",
            OpCode::Return => "OP_RETURN",
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        op as u8
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    /// Decode a byte, returning the byte itself when it is not an opcode
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        OpCode::ALL.get(byte as usize).copied().ok_or(byte)
    }
}
