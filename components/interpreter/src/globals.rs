//! Global variable table

use std::collections::HashMap;

use core_types::{ObjRef, Value};

/// Globals keyed by interned name.
///
/// Names are interned strings, so the handle identifies the name. Absence is
/// `None`; `Nil` is an ordinary stored value.
#[derive(Debug, Default)]
pub struct Globals {
    table: HashMap<ObjRef, Value>,
}

impl Globals {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`
    pub fn get(&self, name: ObjRef) -> Option<Value> {
        self.table.get(&name).copied()
    }

    /// Bind `name` to `value`, returning true if the name was not bound
    pub fn set(&mut self, name: ObjRef, value: Value) -> bool {
        self.table.insert(name, value).is_none()
    }

    /// Remove `name`, returning true if it was bound
    pub fn delete(&mut self, name: ObjRef) -> bool {
        self.table.remove(&name).is_some()
    }

    /// Number of bound names
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no name is bound
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Unbind every name
    pub fn clear(&mut self) {
        self.table.clear();
    }
}
