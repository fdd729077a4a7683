//! Heap object representation
//!
//! Every object kind the VM allocates. Objects refer to each other only
//! through [`ObjRef`] handles, so no object owns another: ownership of all of
//! them rests with the heap registry.

use bytecode_system::Chunk;
use core_types::{ObjRef, Value};

use crate::heap::Heap;

/// Host function callable from scripts.
///
/// Receives the heap (so it can allocate strings) and the argument window;
/// the argument count is `args.len()`.
pub type NativeFn = fn(&mut Heap, &[Value]) -> Value;

/// Kind tag of a heap object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Immutable string
    String,
    /// Compiled function
    Function,
    /// Host function wrapper
    Native,
    /// Function plus captured variables
    Closure,
    /// Captured variable
    Upvalue,
}

/// A heap-allocated object
#[derive(Debug)]
pub enum Object {
    /// Immutable string
    String(ObjString),
    /// Compiled function
    Function(ObjFunction),
    /// Host function wrapper
    Native(ObjNative),
    /// Function plus captured variables
    Closure(ObjClosure),
    /// Captured variable
    Upvalue(ObjUpvalue),
}

impl Object {
    /// Kind tag of this object
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::String(_) => ObjectKind::String,
            Object::Function(_) => ObjectKind::Function,
            Object::Native(_) => ObjectKind::Native,
            Object::Closure(_) => ObjectKind::Closure,
            Object::Upvalue(_) => ObjectKind::Upvalue,
        }
    }
}

/// Immutable string with its hash cached at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjString {
    chars: Box<str>,
    hash: u32,
}

impl ObjString {
    /// Wrap `chars`, computing the hash once
    pub fn new(chars: impl Into<Box<str>>) -> Self {
        let chars = chars.into();
        let hash = crate::strings::hash_bytes(chars.as_bytes());
        Self { chars, hash }
    }

    /// String contents
    pub fn as_str(&self) -> &str {
        &self.chars
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the string is empty
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Cached FNV-1a hash of the bytes
    pub fn hash(&self) -> u32 {
        self.hash
    }
}

/// A compiled function.
///
/// The top-level script is a function with arity 0 and no name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjFunction {
    /// Number of declared parameters
    pub arity: u8,
    /// Number of variables the function captures
    pub upvalue_count: usize,
    /// Interned name, `None` for the top-level script
    pub name: Option<ObjRef>,
    /// Compiled body
    pub chunk: Chunk,
}

impl ObjFunction {
    /// Create a function
    pub fn new(arity: u8, name: Option<ObjRef>, chunk: Chunk) -> Self {
        Self {
            arity,
            upvalue_count: 0,
            name,
            chunk,
        }
    }

    /// Create the implicit top-level script function
    pub fn script(chunk: Chunk) -> Self {
        Self::new(0, None, chunk)
    }

    /// Set the number of captured variables
    pub fn with_upvalues(mut self, upvalue_count: usize) -> Self {
        self.upvalue_count = upvalue_count;
        self
    }
}

/// Host function wrapper
#[derive(Clone, Copy)]
pub struct ObjNative {
    /// The host function
    pub function: NativeFn,
}

impl std::fmt::Debug for ObjNative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ObjNative(<native fn>)")
    }
}

/// Closure over a shared function.
///
/// The function handle is shared with every other closure made from the
/// same function; only the upvalue array belongs to this closure.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjClosure {
    /// Wrapped function
    pub function: ObjRef,
    /// Captured variables, one per declared upvalue
    pub upvalues: Box<[ObjRef]>,
}

/// Where a captured variable currently lives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpvalueState {
    /// Still on the operand stack, at this absolute slot
    Open(usize),
    /// Hoisted out of the stack when its scope ended
    Closed(Value),
}

/// Reference to a captured variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjUpvalue {
    /// Location of the variable
    pub state: UpvalueState,
}

impl ObjUpvalue {
    /// Stack slot of an open upvalue
    pub fn open_slot(&self) -> Option<usize> {
        match self.state {
            UpvalueState::Open(slot) => Some(slot),
            UpvalueState::Closed(_) => None,
        }
    }
}
