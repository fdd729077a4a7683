//! Object heap and the all-objects registry.
//!
//! This module implements the VM heap as an arena of objects:
//! - Every allocation is appended to the registry and identified by its slot
//! - Strings are interned through the intern set on construction
//! - Objects are never freed individually; [`Heap::free_objects`] sweeps the
//!   whole registry once, releasing each object by its kind-specific rule

use core_types::{ObjRef, Value};
use tracing::{debug, trace};

use crate::object::{
    NativeFn, ObjClosure, ObjFunction, ObjNative, ObjString, ObjUpvalue, Object, ObjectKind,
    UpvalueState,
};
use crate::strings::{hash_bytes, StringTable};

/// Per-kind object counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectCounts {
    /// String objects
    pub strings: usize,
    /// Function objects
    pub functions: usize,
    /// Native wrappers
    pub natives: usize,
    /// Closures
    pub closures: usize,
    /// Upvalues
    pub upvalues: usize,
}

impl ObjectCounts {
    /// Count one object of `kind`
    pub fn record(&mut self, kind: ObjectKind) {
        match kind {
            ObjectKind::String => self.strings += 1,
            ObjectKind::Function => self.functions += 1,
            ObjectKind::Native => self.natives += 1,
            ObjectKind::Closure => self.closures += 1,
            ObjectKind::Upvalue => self.upvalues += 1,
        }
    }

    /// Sum over all kinds
    pub fn total(&self) -> usize {
        self.strings + self.functions + self.natives + self.closures + self.upvalues
    }
}

/// Allocation statistics over the heap's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Objects registered since creation
    pub allocated: ObjectCounts,
    /// Objects released by sweeps since creation
    pub freed: ObjectCounts,
    /// Completed sweeps
    pub sweeps: usize,
}

/// Result of one sweep over the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReclaimStats {
    /// Objects released, by kind
    pub freed: ObjectCounts,
    /// Bytes of string buffers released
    pub string_bytes: usize,
    /// Bytes of bytecode released with their functions
    pub code_bytes: usize,
    /// Upvalue-array slots released with their closures
    pub upvalue_slots: usize,
}

/// The VM heap: registry of every live object plus the intern set.
#[derive(Debug, Default)]
pub struct Heap {
    /// All-objects registry; a slot is `None` only after a sweep released it
    objects: Vec<Option<Object>>,
    /// Canonical instance of every interned string
    strings: StringTable,
    stats: HeapStats,
}

impl Heap {
    /// Create an empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `object` and return its handle
    fn allocate(&mut self, object: Object) -> ObjRef {
        let kind = object.kind();
        let handle = ObjRef::new(self.objects.len());
        self.objects.push(Some(object));
        self.stats.allocated.record(kind);
        trace!(handle = %handle, ?kind, "allocate");
        handle
    }

    // ==================== Strings ====================

    /// Intern a copy of `chars`, returning the existing instance if one
    /// with the same contents is already interned
    pub fn intern(&mut self, chars: &str) -> ObjRef {
        match self.find_interned(chars) {
            Some(existing) => existing,
            None => self.insert_interned(ObjString::new(chars)),
        }
    }

    /// Intern `chars`, taking ownership of the buffer.
    ///
    /// When an equal string is already interned the buffer is dropped and
    /// the existing instance is returned.
    pub fn take_string(&mut self, chars: String) -> ObjRef {
        match self.find_interned(&chars) {
            Some(existing) => existing,
            None => self.insert_interned(ObjString::new(chars)),
        }
    }

    /// Allocate a string that bypasses the intern set
    pub fn alloc_string_uninterned(&mut self, chars: String) -> ObjRef {
        self.allocate(Object::String(ObjString::new(chars)))
    }

    /// Look up an interned string by contents
    pub fn find_interned(&self, chars: &str) -> Option<ObjRef> {
        let hash = hash_bytes(chars.as_bytes());
        self.strings
            .find_interned(hash, |candidate| self.string(candidate).as_str() == chars)
    }

    fn insert_interned(&mut self, string: ObjString) -> ObjRef {
        let hash = string.hash();
        let handle = self.allocate(Object::String(string));
        self.strings.insert(hash, handle);
        handle
    }

    /// Concatenate two strings into a freshly allocated one.
    ///
    /// With `intern` false the result is never inserted into the intern set,
    /// so it is not identical to an equal literal.
    pub fn concatenate(&mut self, a: ObjRef, b: ObjRef, intern: bool) -> ObjRef {
        let (left, right) = (self.string(a).as_str(), self.string(b).as_str());
        let mut chars = String::with_capacity(left.len() + right.len());
        chars.push_str(left);
        chars.push_str(right);
        if intern {
            self.take_string(chars)
        } else {
            self.alloc_string_uninterned(chars)
        }
    }

    /// Number of interned strings
    pub fn interned_count(&self) -> usize {
        self.strings.len()
    }

    // ==================== Other kinds ====================

    /// Register a compiled function
    pub fn alloc_function(&mut self, function: ObjFunction) -> ObjRef {
        self.allocate(Object::Function(function))
    }

    /// Wrap a host function
    pub fn alloc_native(&mut self, function: NativeFn) -> ObjRef {
        self.allocate(Object::Native(ObjNative { function }))
    }

    /// Create a closure sharing `function`
    pub fn alloc_closure(&mut self, function: ObjRef, upvalues: Box<[ObjRef]>) -> ObjRef {
        self.allocate(Object::Closure(ObjClosure { function, upvalues }))
    }

    /// Create an open upvalue for the stack slot `slot`
    pub fn alloc_upvalue(&mut self, slot: usize) -> ObjRef {
        self.allocate(Object::Upvalue(ObjUpvalue {
            state: UpvalueState::Open(slot),
        }))
    }

    // ==================== Access ====================

    /// Get an object by handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not name a live object. Handles only dangle
    /// after a sweep, which also discards every value that held them.
    pub fn get(&self, handle: ObjRef) -> &Object {
        match self.objects.get(handle.index()) {
            Some(Some(object)) => object,
            _ => panic!("dangling object handle {}", handle),
        }
    }

    fn get_mut(&mut self, handle: ObjRef) -> &mut Object {
        match self.objects.get_mut(handle.index()) {
            Some(Some(object)) => object,
            _ => panic!("dangling object handle {}", handle),
        }
    }

    /// Get an object if the handle names a live one
    pub fn try_get(&self, handle: ObjRef) -> Option<&Object> {
        self.objects.get(handle.index()).and_then(Option::as_ref)
    }

    /// Kind tag of the object behind `handle`
    pub fn kind(&self, handle: ObjRef) -> ObjectKind {
        self.get(handle).kind()
    }

    /// Whether `value` references a string
    pub fn is_string(&self, value: Value) -> bool {
        match value {
            Value::Object(handle) => self.kind(handle) == ObjectKind::String,
            _ => false,
        }
    }

    /// String behind `handle`; the caller has checked the kind
    pub fn string(&self, handle: ObjRef) -> &ObjString {
        match self.get(handle) {
            Object::String(s) => s,
            other => panic!("expected string, found {:?}", other.kind()),
        }
    }

    /// Function behind `handle`; the caller has checked the kind
    pub fn function(&self, handle: ObjRef) -> &ObjFunction {
        match self.get(handle) {
            Object::Function(f) => f,
            other => panic!("expected function, found {:?}", other.kind()),
        }
    }

    /// Closure behind `handle`; the caller has checked the kind
    pub fn closure(&self, handle: ObjRef) -> &ObjClosure {
        match self.get(handle) {
            Object::Closure(c) => c,
            other => panic!("expected closure, found {:?}", other.kind()),
        }
    }

    /// Upvalue behind `handle`; the caller has checked the kind
    pub fn upvalue(&self, handle: ObjRef) -> &ObjUpvalue {
        match self.get(handle) {
            Object::Upvalue(u) => u,
            other => panic!("expected upvalue, found {:?}", other.kind()),
        }
    }

    /// Mutable upvalue behind `handle`; the caller has checked the kind
    pub fn upvalue_mut(&mut self, handle: ObjRef) -> &mut ObjUpvalue {
        match self.get_mut(handle) {
            Object::Upvalue(u) => u,
            other => panic!("expected upvalue, found {:?}", other.kind()),
        }
    }

    /// Name of a function, `None` for the top-level script
    pub fn function_name(&self, function: ObjRef) -> Option<&str> {
        self.function(function)
            .name
            .map(|name| self.string(name).as_str())
    }

    /// Number of live objects in the registry
    pub fn live_count(&self) -> usize {
        self.stats.allocated.total() - self.stats.freed.total()
    }

    /// Allocation statistics
    pub fn stats(&self) -> &HeapStats {
        &self.stats
    }

    // ==================== Reclamation ====================

    /// Release every object in the registry.
    ///
    /// Walks the registry from the most recent allocation back to the
    /// oldest and drops each object by kind:
    /// - String: its byte buffer
    /// - Function: its chunk
    /// - Native: the wrapper only
    /// - Closure: its upvalue array, not the shared function
    /// - Upvalue: the wrapper only, not the captured variable
    ///
    /// Each slot is taken exactly once, so a second sweep releases nothing.
    /// Released slots stay in the registry, empty: a handle from before the
    /// sweep dangles rather than naming a later allocation. The intern set is
    /// emptied and the heap can be reused afterwards.
    pub fn free_objects(&mut self) -> ReclaimStats {
        let mut reclaimed = ReclaimStats::default();

        for slot in self.objects.iter_mut().rev() {
            let Some(object) = slot.take() else {
                continue;
            };
            reclaimed.freed.record(object.kind());
            match object {
                Object::String(s) => reclaimed.string_bytes += s.len(),
                Object::Function(f) => reclaimed.code_bytes += f.chunk.code.len(),
                Object::Native(_) => {}
                Object::Closure(c) => reclaimed.upvalue_slots += c.upvalues.len(),
                Object::Upvalue(_) => {}
            }
        }

        self.strings.clear();

        let freed = reclaimed.freed;
        self.stats.freed.strings += freed.strings;
        self.stats.freed.functions += freed.functions;
        self.stats.freed.natives += freed.natives;
        self.stats.freed.closures += freed.closures;
        self.stats.freed.upvalues += freed.upvalues;
        self.stats.sweeps += 1;

        debug!(
            freed = freed.total(),
            strings = freed.strings,
            functions = freed.functions,
            natives = freed.natives,
            closures = freed.closures,
            upvalues = freed.upvalues,
            "heap swept"
        );
        reclaimed
    }
}
