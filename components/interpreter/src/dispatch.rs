//! Instruction dispatch loop
//!
//! Fetch-decode-execute over the chunk of the innermost frame. Every
//! instruction reads its operands from the byte stream that follows the
//! opcode; see [`OpCode::operand_width`].

use std::io::Write;

use bytecode_system::{ChunkError, OpCode};
use core_types::{ObjRef, RuntimeErrorKind, Value};
use memory_manager::{Object, ObjectKind};
use tracing::warn;

use crate::call_frame::CallFrame;
use crate::upvalue;
use crate::vm::{InterpretError, VM};

type DispatchResult<T = ()> = Result<T, InterpretError>;

impl VM {
    // ==================== Stack ====================

    pub(crate) fn push(&mut self, value: Value) -> DispatchResult {
        if self.stack.len() >= self.config.stack_capacity {
            return Err(self.runtime_error(RuntimeErrorKind::StackOverflow, "Stack overflow."));
        }
        self.stack.push(value);
        Ok(())
    }

    #[inline]
    fn pop(&mut self) -> Value {
        self.stack.pop().unwrap_or_default()
    }

    /// Value `distance` slots below the top, without removing it
    #[inline]
    fn peek(&self, distance: usize) -> Value {
        self.stack
            .len()
            .checked_sub(distance + 1)
            .map(|idx| self.stack[idx])
            .unwrap_or_default()
    }

    // ==================== Operand fetch ====================

    #[inline]
    fn frame(&self) -> &CallFrame {
        &self.frames[self.frames.len() - 1]
    }

    #[inline]
    fn frame_mut(&mut self) -> &mut CallFrame {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    fn read_byte(&mut self) -> DispatchResult<u8> {
        let frame = self.frame_mut();
        let (function, offset) = (frame.function, frame.ip);
        frame.ip += 1;
        self.heap
            .function(function)
            .chunk
            .code
            .get(offset)
            .copied()
            .ok_or(InterpretError::Bytecode(ChunkError::UnexpectedEnd { offset }))
    }

    fn read_u16(&mut self) -> DispatchResult<u16> {
        let hi = self.read_byte()?;
        let lo = self.read_byte()?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    fn read_constant(&mut self) -> DispatchResult<Value> {
        let idx = self.read_byte()?;
        let function = self.frame().function;
        self.heap
            .function(function)
            .chunk
            .constant(idx)
            .ok_or(InterpretError::Bytecode(ChunkError::MissingConstant { idx }))
    }

    /// Read a constant that must reference an object of `kind`: a string
    /// for global names, a function for `Closure`
    fn read_object(&mut self, kind: ObjectKind) -> DispatchResult<ObjRef> {
        let idx = self.read_byte()?;
        let function = self.frame().function;
        self.heap
            .function(function)
            .chunk
            .constant(idx)
            .and_then(|value| value.as_object())
            .filter(|&handle| self.heap.try_get(handle).map(Object::kind) == Some(kind))
            .ok_or(InterpretError::Bytecode(ChunkError::MissingConstant { idx }))
    }

    // ==================== Calls ====================

    /// Push a frame for `closure` whose callee and `arg_count` arguments are
    /// the top of the stack
    pub(crate) fn call(&mut self, closure: ObjRef, arg_count: usize) -> DispatchResult {
        let function = self.heap.closure(closure).function;
        let arity = self.heap.function(function).arity as usize;
        if arg_count != arity {
            return Err(self.runtime_error(
                RuntimeErrorKind::ArityMismatch,
                format!("Expected {} arguments but got {}.", arity, arg_count),
            ));
        }
        if self.frames.is_full() {
            return Err(self.runtime_error(RuntimeErrorKind::StackOverflow, "Stack overflow."));
        }
        let base = self.stack.len() - arg_count - 1;
        self.frames.push(CallFrame::new(closure, function, base));
        Ok(())
    }

    fn call_value(&mut self, callee: Value, arg_count: usize) -> DispatchResult {
        let handle = match callee {
            Value::Object(handle) => handle,
            _ => return Err(self.not_callable()),
        };
        match self.heap.get(handle) {
            Object::Closure(_) => self.call(handle, arg_count),
            Object::Native(native) => {
                let function = native.function;
                let args_start = self.stack.len() - arg_count;
                let result = function(&mut self.heap, &self.stack[args_start..]);
                // drop the arguments and the callee
                self.stack.truncate(args_start - 1);
                self.push(result)
            }
            _ => Err(self.not_callable()),
        }
    }

    fn not_callable(&mut self) -> InterpretError {
        self.runtime_error(
            RuntimeErrorKind::NotCallable,
            "Can only call functions and classes.",
        )
    }

    // ==================== Operators ====================

    fn binary_number_op(&mut self, op: OpCode) -> DispatchResult {
        debug_assert!(op.is_binary_arithmetic(), "{:?}", op);
        let (a, b) = match (self.peek(1), self.peek(0)) {
            (Value::Number(a), Value::Number(b)) => (a, b),
            _ => {
                return Err(
                    self.runtime_error(RuntimeErrorKind::TypeError, "Operands must be numbers.")
                )
            }
        };
        self.pop();
        self.pop();
        let result = match op {
            OpCode::Greater => Value::Bool(a > b),
            OpCode::Less => Value::Bool(a < b),
            OpCode::Subtract => Value::Number(a - b),
            OpCode::Multiply => Value::Number(a * b),
            OpCode::Divide => Value::Number(a / b),
            other => unreachable!("{:?} is not a binary numeric operator", other),
        };
        self.push(result)
    }

    fn add(&mut self) -> DispatchResult {
        let (a, b) = (self.peek(1), self.peek(0));
        let result = match (a, b) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
            (Value::Object(a), Value::Object(b))
                if self.heap.is_string(Value::Object(a)) && self.heap.is_string(Value::Object(b)) =>
            {
                Value::Object(
                    self.heap
                        .concatenate(a, b, self.config.intern_concatenations),
                )
            }
            _ => {
                return Err(self.runtime_error(
                    RuntimeErrorKind::TypeError,
                    "Operands must be two numbers or two strings.",
                ))
            }
        };
        self.pop();
        self.pop();
        self.push(result)
    }

    // ==================== Run loop ====================

    /// Execute until the outermost frame returns
    pub(crate) fn run(&mut self) -> DispatchResult {
        loop {
            #[cfg(feature = "trace_execution")]
            self.trace_instruction();

            let offset = self.frame().ip;
            let byte = self.read_byte()?;
            let op = OpCode::try_from(byte)
                .map_err(|byte| InterpretError::Bytecode(ChunkError::UnknownOpcode { byte, offset }))?;

            match op {
                OpCode::Constant => {
                    let value = self.read_constant()?;
                    self.push(value)?;
                }
                OpCode::Nil => self.push(Value::Nil)?,
                OpCode::True => self.push(Value::Bool(true))?,
                OpCode::False => self.push(Value::Bool(false))?,
                OpCode::Pop => {
                    self.pop();
                }
                OpCode::GetLocal => {
                    let local = self.read_byte()? as usize;
                    let slot = self.frame().base + local;
                    let value = self.stack.get(slot).copied().unwrap_or_default();
                    self.push(value)?;
                }
                OpCode::SetLocal => {
                    let local = self.read_byte()? as usize;
                    let slot = self.frame().base + local;
                    let value = self.peek(0);
                    if let Some(target) = self.stack.get_mut(slot) {
                        *target = value;
                    }
                }
                OpCode::GetGlobal => {
                    let name = self.read_object(ObjectKind::String)?;
                    match self.globals.get(name) {
                        Some(value) => self.push(value)?,
                        None => return Err(self.undefined_variable(name)),
                    }
                }
                OpCode::DefineGlobal => {
                    let name = self.read_object(ObjectKind::String)?;
                    let value = self.peek(0);
                    self.globals.set(name, value);
                    self.pop();
                }
                OpCode::SetGlobal => {
                    let name = self.read_object(ObjectKind::String)?;
                    let value = self.peek(0);
                    if self.globals.set(name, value) {
                        // assignment never creates a global
                        self.globals.delete(name);
                        return Err(self.undefined_variable(name));
                    }
                }
                OpCode::GetUpvalue => {
                    let idx = self.read_byte()? as usize;
                    let captured = self.frame_upvalue(idx)?;
                    let value = upvalue::read(&self.heap, &self.stack, captured);
                    self.push(value)?;
                }
                OpCode::SetUpvalue => {
                    let idx = self.read_byte()? as usize;
                    let captured = self.frame_upvalue(idx)?;
                    let value = self.peek(0);
                    upvalue::write(&mut self.heap, &mut self.stack, captured, value);
                }
                OpCode::Equal => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(Value::Bool(a == b))?;
                }
                OpCode::Greater
                | OpCode::Less
                | OpCode::Subtract
                | OpCode::Multiply
                | OpCode::Divide => self.binary_number_op(op)?,
                OpCode::Add => self.add()?,
                OpCode::Not => {
                    let value = self.pop();
                    self.push(Value::Bool(value.is_falsey()))?;
                }
                OpCode::Negate => match self.peek(0) {
                    Value::Number(n) => {
                        self.pop();
                        self.push(Value::Number(-n))?;
                    }
                    _ => {
                        return Err(self
                            .runtime_error(RuntimeErrorKind::TypeError, "Operand must be a number."))
                    }
                },
                OpCode::Print => {
                    let value = self.pop();
                    if let Err(err) = writeln!(self.out, "{}", self.heap.display(value)) {
                        warn!(%err, "print output failed");
                    }
                }
                OpCode::Jump => {
                    let jump = self.read_u16()? as usize;
                    self.frame_mut().ip += jump;
                }
                OpCode::JumpIfFalse => {
                    let jump = self.read_u16()? as usize;
                    if self.peek(0).is_falsey() {
                        self.frame_mut().ip += jump;
                    }
                }
                OpCode::Loop => {
                    let jump = self.read_u16()? as usize;
                    let frame = self.frame_mut();
                    frame.ip = frame.ip.saturating_sub(jump);
                }
                OpCode::Call => {
                    let arg_count = self.read_byte()? as usize;
                    let callee = self.peek(arg_count);
                    self.call_value(callee, arg_count)?;
                }
                OpCode::Closure => self.make_closure()?,
                OpCode::CloseUpvalue => {
                    let top = self.stack.len().saturating_sub(1);
                    self.open_upvalues.close_from(&mut self.heap, &self.stack, top);
                    self.pop();
                }
                OpCode::Return => {
                    let result = self.pop();
                    let base = self.frame().base;
                    self.open_upvalues.close_from(&mut self.heap, &self.stack, base);
                    self.frames.pop();
                    self.stack.truncate(base);
                    if self.frames.is_empty() {
                        return Ok(());
                    }
                    self.push(result)?;
                }
            }
        }
    }

    fn frame_upvalue(&self, idx: usize) -> DispatchResult<ObjRef> {
        self.heap
            .closure(self.frame().closure)
            .upvalues
            .get(idx)
            .copied()
            .ok_or(InterpretError::Bytecode(ChunkError::MissingUpvalue { idx }))
    }

    /// `Closure` operand: the function constant, then one `(is_local, index)`
    /// pair per upvalue the function declares
    fn make_closure(&mut self) -> DispatchResult {
        let function = self.read_object(ObjectKind::Function)?;
        let upvalue_count = self.heap.function(function).upvalue_count;
        let mut upvalues = Vec::with_capacity(upvalue_count);
        for _ in 0..upvalue_count {
            let is_local = self.read_byte()? != 0;
            let index = self.read_byte()? as usize;
            let captured = if is_local {
                let slot = self.frame().base + index;
                self.open_upvalues.capture(&mut self.heap, slot)
            } else {
                self.frame_upvalue(index)?
            };
            upvalues.push(captured);
        }
        let closure = self.heap.alloc_closure(function, upvalues.into_boxed_slice());
        self.push(Value::Object(closure))
    }

    fn undefined_variable(&mut self, name: ObjRef) -> InterpretError {
        let message = format!("Undefined variable '{}'.", self.heap.string(name).as_str());
        self.runtime_error(RuntimeErrorKind::UndefinedVariable, message)
    }

    #[cfg(feature = "trace_execution")]
    fn trace_instruction(&self) {
        let stack = self
            .stack
            .iter()
            .map(|value| format!("[ {} ]", self.heap.display(*value)))
            .collect::<String>();
        let frame = self.frame();
        let chunk = &self.heap.function(frame.function).chunk;
        if frame.ip < chunk.len() {
            tracing::trace!(
                stack = %stack,
                "{}",
                bytecode_system::disassemble_instruction(chunk, frame.ip)
            );
        }
    }
}
