//! Tagged value representation.
//!
//! This module provides the `Value` enum, the closed set of values the
//! virtual machine manipulates, and `ObjRef`, the handle used to refer to
//! heap-allocated objects.

use std::fmt;

/// Handle to an object living in the VM heap.
///
/// An `ObjRef` is an index into the heap's object registry. It does not own
/// the object: many values may hold the same handle, and the object is only
/// released when the registry is swept.
///
/// # Examples
///
/// ```
/// use core_types::ObjRef;
///
/// let a = ObjRef::new(3);
/// let b = ObjRef::new(3);
/// assert_eq!(a, b);
/// assert_eq!(a.index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjRef(u32);

impl ObjRef {
    /// Create a handle for the registry slot at `index`
    pub fn new(index: usize) -> Self {
        ObjRef(index as u32)
    }

    /// Registry slot this handle points to
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Represents any value of the scripting language.
///
/// Scalars are stored inline; objects are referenced through a non-owning
/// [`ObjRef`]. Values are `Copy`, so pushing, popping and storing them never
/// touches the heap.
///
/// Equality is total over all variants: numbers compare by IEEE-754 value
/// (so `NaN != NaN`), objects compare by identity. Identity coincides with
/// content equality only for interned strings.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let nil = Value::Nil;
/// let number = Value::Number(0.0);
///
/// assert!(nil.is_falsey());
/// assert!(!number.is_falsey());
/// assert_eq!(number.type_name(), "number");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    /// The absence of a value
    #[default]
    Nil,
    /// Boolean true or false
    Bool(bool),
    /// IEEE 754 double-precision number
    Number(f64),
    /// Reference to a heap object
    Object(ObjRef),
}

impl Value {
    /// Returns whether this value is falsey.
    ///
    /// Only `nil` and `false` are falsey. Every other value, including
    /// `0`, `NaN` and the empty string, is truthy.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::{ObjRef, Value};
    ///
    /// assert!(Value::Nil.is_falsey());
    /// assert!(Value::Bool(false).is_falsey());
    ///
    /// assert!(!Value::Bool(true).is_falsey());
    /// assert!(!Value::Number(0.0).is_falsey());
    /// assert!(!Value::Number(f64::NAN).is_falsey());
    /// assert!(!Value::Object(ObjRef::new(0)).is_falsey());
    /// ```
    #[inline]
    pub fn is_falsey(&self) -> bool {
        matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Returns true for `nil`
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns true for booleans
    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns true for numbers
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns true for object references
    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Checked boolean accessor
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Checked number accessor
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Checked object accessor
    pub fn as_object(&self) -> Option<ObjRef> {
        match self {
            Value::Object(r) => Some(*r),
            _ => None,
        }
    }

    /// Unwrap a number the caller has already checked with [`Value::is_number`].
    ///
    /// # Panics
    ///
    /// Calling this on a non-number is a contract violation and panics.
    #[inline]
    pub fn as_number_unchecked(self) -> f64 {
        match self {
            Value::Number(n) => n,
            other => unreachable!("expected number, found {}", other.type_name()),
        }
    }

    /// Unwrap an object reference the caller has already checked with
    /// [`Value::is_object`].
    ///
    /// # Panics
    ///
    /// Calling this on a non-object is a contract violation and panics.
    #[inline]
    pub fn as_object_unchecked(self) -> ObjRef {
        match self {
            Value::Object(r) => r,
            other => unreachable!("expected object, found {}", other.type_name()),
        }
    }

    /// Short name of this value's kind, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Object(_) => "object",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<ObjRef> for Value {
    fn from(r: ObjRef) -> Self {
        Value::Object(r)
    }
}

/// Renders scalars; objects render as their handle since their contents
/// live in the heap.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write_number(f, *n),
            Value::Object(r) => write!(f, "<object {}>", r),
        }
    }
}

/// Significant digits printed for a number
const NUMBER_PRECISION: i32 = 6;

/// Write `n` in the shortest of fixed or exponent notation with six
/// significant digits and no trailing zeros: `3`, `2.5`, `1e+21`, `nan`.
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("nan");
    }
    if n.is_infinite() {
        return f.write_str(if n < 0.0 { "-inf" } else { "inf" });
    }
    if n == 0.0 {
        return f.write_str(if n.is_sign_negative() { "-0" } else { "0" });
    }

    // the exponent is only known after rounding to the precision
    let scientific = format!("{:.*e}", (NUMBER_PRECISION - 1) as usize, n);
    let (mantissa, exponent) = match scientific
        .split_once('e')
        .and_then(|(m, e)| e.parse::<i32>().ok().map(|e| (m, e)))
    {
        Some(parts) => parts,
        None => return write!(f, "{}", n),
    };

    if exponent < -4 || exponent >= NUMBER_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(
            f,
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (NUMBER_PRECISION - 1 - exponent) as usize;
        f.write_str(trim_fraction(&format!("{:.*}", decimals, n)))
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
