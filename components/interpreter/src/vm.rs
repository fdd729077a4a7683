//! Virtual Machine for bytecode execution
//!
//! Main entry point for running compiled scripts. The [`VM`] value owns all
//! execution state: the operand stack, the frame stack, the globals, the
//! open upvalues and the heap with every allocated object.

use std::fmt;
use std::io::{self, Write};

use arrayvec::ArrayVec;
use core_types::{CompileError, ObjRef, RuntimeError, RuntimeErrorKind, Value};
use memory_manager::{Heap, NativeFn, Object, ReclaimStats};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::call_frame::{CallFrame, FRAMES_MAX};
use crate::compiler::Compiler;
use crate::config::{ConfigError, VmConfig};
use crate::globals::Globals;
use crate::natives;
use crate::upvalue::OpenUpvalues;

/// Why [`VM::interpret`] did not complete
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    /// The compiler rejected the source; nothing was executed
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// Execution aborted with a runtime error
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// The instruction stream is malformed
    #[error("malformed bytecode: {0}")]
    Bytecode(#[from] bytecode_system::ChunkError),
}

impl InterpretError {
    /// Kind of the runtime error, if this is one
    pub fn runtime_kind(&self) -> Option<RuntimeErrorKind> {
        match self {
            InterpretError::Runtime(err) => Some(err.kind),
            _ => None,
        }
    }
}

/// Virtual Machine for executing bytecode
///
/// # Examples
///
/// ```
/// use bytecode_system::{Chunk, OpCode};
/// use core_types::{CompileError, ObjRef, Value};
/// use interpreter::VM;
/// use memory_manager::{Heap, ObjFunction};
///
/// // A stand-in compiler that ignores its input and emits `answer = 42`.
/// let mut compiler = |_source: &str, heap: &mut Heap| -> Result<ObjRef, CompileError> {
///     let name = heap.intern("answer");
///     let mut chunk = Chunk::new();
///     chunk.emit_constant(Value::Number(42.0), 1).unwrap();
///     let idx = chunk.add_constant(Value::Object(name)).unwrap();
///     chunk.write_op_with(OpCode::DefineGlobal, idx, 1);
///     chunk.write_op(OpCode::Nil, 1);
///     chunk.write_op(OpCode::Return, 1);
///     Ok(heap.alloc_function(ObjFunction::script(chunk)))
/// };
///
/// let mut vm = VM::new();
/// vm.interpret(&mut compiler, "var answer = 42;").unwrap();
/// assert_eq!(vm.get_global("answer"), Some(Value::Number(42.0)));
/// ```
pub struct VM {
    pub(crate) config: VmConfig,
    pub(crate) heap: Heap,
    /// Operand stack; never grows past `config.stack_capacity`
    pub(crate) stack: Vec<Value>,
    pub(crate) frames: ArrayVec<CallFrame, FRAMES_MAX>,
    pub(crate) globals: Globals,
    pub(crate) open_upvalues: OpenUpvalues,
    /// Sink for `Print`
    pub(crate) out: Box<dyn Write>,
    /// Sink for runtime error reports
    pub(crate) err: Box<dyn Write>,
}

impl fmt::Debug for VM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VM")
            .field("config", &self.config)
            .field("stack_len", &self.stack.len())
            .field("frame_depth", &self.frames.len())
            .field("globals", &self.globals.len())
            .field("open_upvalues", &self.open_upvalues.len())
            .field("live_objects", &self.heap.live_count())
            .finish()
    }
}

impl VM {
    /// Create a VM with the default configuration.
    ///
    /// Output goes to stdout and error reports to stderr. The native
    /// functions are defined as globals.
    pub fn new() -> Self {
        Self::build(VmConfig::default())
    }

    /// Create a VM with a validated configuration
    pub fn with_config(config: VmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: VmConfig) -> Self {
        let mut vm = Self {
            stack: Vec::with_capacity(config.stack_capacity),
            frames: ArrayVec::new(),
            globals: Globals::new(),
            open_upvalues: OpenUpvalues::new(),
            heap: Heap::new(),
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
            config,
        };
        natives::register_all(&mut vm);
        vm
    }

    /// Redirect `Print` output
    pub fn with_output(mut self, out: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    /// Redirect runtime error reports
    pub fn with_error_output(mut self, err: impl Write + 'static) -> Self {
        self.err = Box::new(err);
        self
    }

    /// Compile `source` and run it to completion.
    ///
    /// Compile errors leave the VM untouched. After a runtime error the
    /// stacks are reset but every allocated object stays registered until
    /// [`VM::teardown`].
    pub fn interpret<C>(&mut self, compiler: &mut C, source: &str) -> Result<(), InterpretError>
    where
        C: Compiler + ?Sized,
    {
        info!(bytes = source.len(), "interpret");
        let function = compiler.compile(source, &mut self.heap).map_err(|err| {
            error!(message = %err.message, "compilation failed");
            InterpretError::Compile(err)
        })?;
        self.run_function(function)
    }

    /// Run an already compiled top-level function
    pub fn run_function(&mut self, function: ObjRef) -> Result<(), InterpretError> {
        let result = self.start(function).and_then(|()| self.run());
        match &result {
            Ok(()) => info!(live_objects = self.heap.live_count(), "interpret finished"),
            Err(err) => {
                if let InterpretError::Bytecode(fault) = err {
                    error!(%fault, "malformed bytecode");
                }
                self.reset_stacks();
            }
        }
        result
    }

    /// Wrap the script function in a closure and push its frame
    fn start(&mut self, function: ObjRef) -> Result<(), InterpretError> {
        if !matches!(self.heap.try_get(function), Some(Object::Function(_))) {
            return Err(self.runtime_error(
                RuntimeErrorKind::NotCallable,
                "Can only call functions and classes.",
            ));
        }
        let closure = self.heap.alloc_closure(function, Box::new([]));
        self.push(Value::Object(closure))?;
        self.call(closure, 0)
    }

    /// Release every object the VM allocated.
    ///
    /// Stacks and globals are cleared first so no value refers to a freed
    /// object. Calling it again releases nothing.
    pub fn teardown(&mut self) -> ReclaimStats {
        self.reset_stacks();
        self.globals.clear();
        let stats = self.heap.free_objects();
        debug!(freed = stats.freed.total(), "vm torn down");
        stats
    }

    /// Register a host function under `name`
    pub fn define_native(&mut self, name: &str, function: NativeFn) {
        let name_ref = self.heap.intern(name);
        let native = self.heap.alloc_native(function);
        self.globals.set(name_ref, Value::Object(native));
        debug!(name, "native registered");
    }

    /// Value of the global `name`
    pub fn get_global(&self, name: &str) -> Option<Value> {
        let name = self.heap.find_interned(name)?;
        self.globals.get(name)
    }

    /// Number of active call frames
    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of values on the operand stack
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// The heap
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The heap, for hosts that allocate before running code
    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// Active configuration
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Empty both stacks. Open upvalues are closed first; a closure that
    /// escaped the aborted run keeps the values it captured.
    pub(crate) fn reset_stacks(&mut self) {
        self.open_upvalues.close_from(&mut self.heap, &self.stack, 0);
        self.stack.clear();
        self.frames.clear();
    }
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}
