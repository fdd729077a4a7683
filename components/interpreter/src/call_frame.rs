//! Call frame for function call stack management

use core_types::ObjRef;

/// Maximum depth of the frame stack
pub const FRAMES_MAX: usize = 64;

/// Default operand stack size: a full frame stack of 256-slot windows
pub const STACK_MAX: usize = FRAMES_MAX * (u8::MAX as usize + 1);

/// One active invocation of a closure
///
/// The frame's window starts at `base`, where slot 0 holds the callee and
/// the arguments follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFrame {
    /// Closure being executed
    pub closure: ObjRef,
    /// Function wrapped by `closure`, cached to avoid a lookup per byte
    pub function: ObjRef,
    /// Offset of the next byte to execute in the function's chunk
    pub ip: usize,
    /// Operand stack index of slot 0 of this frame's window
    pub base: usize,
}

impl CallFrame {
    /// Create a frame positioned at the start of the function's code
    pub fn new(closure: ObjRef, function: ObjRef, base: usize) -> Self {
        Self {
            closure,
            function,
            ip: 0,
            base,
        }
    }

    /// Offset of the instruction currently executing.
    ///
    /// The cursor has already moved past at least the opcode, so the byte
    /// before it belongs to the current instruction.
    pub fn current_offset(&self) -> usize {
        self.ip.saturating_sub(1)
    }
}
