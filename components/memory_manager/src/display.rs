//! Printing of values that may reference heap objects

use std::fmt;

use core_types::Value;

use crate::heap::Heap;
use crate::object::Object;

/// Formats a [`Value`], resolving object handles against a heap.
///
/// Obtained from [`Heap::display`].
pub struct ValueDisplay<'a> {
    heap: &'a Heap,
    value: Value,
}

impl Heap {
    /// Displayable view of `value`
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    /// use memory_manager::Heap;
    ///
    /// let mut heap = Heap::new();
    /// let s = heap.intern("hi");
    /// assert_eq!(heap.display(Value::Object(s)).to_string(), "hi");
    /// assert_eq!(heap.display(Value::Number(2.5)).to_string(), "2.5");
    /// ```
    pub fn display(&self, value: Value) -> ValueDisplay<'_> {
        ValueDisplay { heap: self, value }
    }
}

impl ValueDisplay<'_> {
    fn write_function(&self, f: &mut fmt::Formatter<'_>, function: core_types::ObjRef) -> fmt::Result {
        match self.heap.function_name(function) {
            Some(name) => write!(f, "<fn {}>", name),
            None => f.write_str("<script>"),
        }
    }
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handle = match self.value {
            Value::Object(handle) => handle,
            other => return write!(f, "{}", other),
        };
        match self.heap.try_get(handle) {
            Some(Object::String(s)) => f.write_str(s.as_str()),
            Some(Object::Function(_)) => self.write_function(f, handle),
            Some(Object::Closure(c)) => self.write_function(f, c.function),
            Some(Object::Native(_)) => f.write_str("<native fn>"),
            Some(Object::Upvalue(_)) => f.write_str("upvalue"),
            None => write!(f, "<freed {}>", handle),
        }
    }
}
