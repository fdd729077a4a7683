//! Boundary to the source compiler
//!
//! The VM does not parse source text. A [`Compiler`] turns source into a
//! top-level function allocated in the VM's heap, interning any names and
//! string literals it emits through that heap.

use core_types::{CompileError, ObjRef};
use memory_manager::Heap;

/// Compiles source text into a top-level function
pub trait Compiler {
    /// Compile `source`, returning the handle of the script function.
    ///
    /// On failure the VM's stacks and globals are untouched.
    fn compile(&mut self, source: &str, heap: &mut Heap) -> Result<ObjRef, CompileError>;
}

impl<F> Compiler for F
where
    F: FnMut(&str, &mut Heap) -> Result<ObjRef, CompileError>,
{
    fn compile(&mut self, source: &str, heap: &mut Heap) -> Result<ObjRef, CompileError> {
        self(source, heap)
    }
}
