//! Upvalue support for closures
//!
//! A captured variable stays on the operand stack while its scope is live;
//! the upvalue refers to the slot ("open"). When the scope ends the value is
//! moved into the upvalue itself ("closed"). Closures capturing the same slot
//! share one upvalue, so writes through either closure are visible to both.

use core_types::{ObjRef, Value};
use memory_manager::{Heap, UpvalueState};

/// Open upvalues of the running program, ordered by stack slot
#[derive(Debug, Default)]
pub struct OpenUpvalues {
    /// `(slot, upvalue)` pairs sorted by ascending slot, one per slot
    open: Vec<(usize, ObjRef)>,
}

impl OpenUpvalues {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Upvalue for stack slot `slot`, reusing the open one if it exists
    pub fn capture(&mut self, heap: &mut Heap, slot: usize) -> ObjRef {
        match self.open.binary_search_by_key(&slot, |&(s, _)| s) {
            Ok(idx) => self.open[idx].1,
            Err(idx) => {
                let upvalue = heap.alloc_upvalue(slot);
                self.open.insert(idx, (slot, upvalue));
                upvalue
            }
        }
    }

    /// Close every open upvalue at or above stack slot `from`.
    ///
    /// Returns the number of upvalues closed.
    pub fn close_from(&mut self, heap: &mut Heap, stack: &[Value], from: usize) -> usize {
        let split = self.open.partition_point(|&(slot, _)| slot < from);
        let closed = self.open.len() - split;
        for (slot, upvalue) in self.open.drain(split..) {
            let value = stack.get(slot).copied().unwrap_or_default();
            heap.upvalue_mut(upvalue).state = UpvalueState::Closed(value);
        }
        closed
    }

    /// Number of open upvalues
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Whether no upvalue is open
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

/// Current value of the variable behind `upvalue`
pub fn read(heap: &Heap, stack: &[Value], upvalue: ObjRef) -> Value {
    match heap.upvalue(upvalue).state {
        UpvalueState::Open(slot) => stack.get(slot).copied().unwrap_or_default(),
        UpvalueState::Closed(value) => value,
    }
}

/// Assign to the variable behind `upvalue`
pub fn write(heap: &mut Heap, stack: &mut [Value], upvalue: ObjRef, value: Value) {
    let upvalue = heap.upvalue_mut(upvalue);
    match upvalue.state {
        UpvalueState::Open(slot) => {
            if let Some(target) = stack.get_mut(slot) {
                *target = value;
            }
        }
        UpvalueState::Closed(_) => upvalue.state = UpvalueState::Closed(value),
    }
}
