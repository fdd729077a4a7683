//! Memory Manager - object heap for the bytecode VM
//!
//! This component provides:
//! - Object representations (strings, functions, natives, closures, upvalues)
//! - The all-objects registry with whole-heap reclamation at teardown
//! - String interning keyed by a cached FNV-1a hash
//! - Printing of values that reference heap objects

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod display;
pub mod heap;
pub mod object;
pub mod strings;

pub use display::ValueDisplay;
pub use heap::{Heap, HeapStats, ObjectCounts, ReclaimStats};
pub use object::{
    NativeFn, ObjClosure, ObjFunction, ObjNative, ObjString, ObjUpvalue, Object, ObjectKind,
    UpvalueState,
};
pub use strings::{hash_bytes, StringTable};
