//! Unit tests for the Value enum and ObjRef handle

use core_types::{ObjRef, Value};

#[cfg(test)]
mod value_creation_tests {
    use super::*;

    #[test]
    fn test_value_nil() {
        let val = Value::Nil;
        assert!(matches!(val, Value::Nil));
        assert!(val.is_nil());
    }

    #[test]
    fn test_value_from_bool() {
        let val = Value::from(true);
        assert!(matches!(val, Value::Bool(true)));
        assert!(val.is_bool());
    }

    #[test]
    fn test_value_from_number() {
        let val = Value::from(-12.25);
        assert!(matches!(val, Value::Number(n) if n == -12.25));
        assert!(val.is_number());
    }

    #[test]
    fn test_value_from_obj_ref() {
        let val = Value::from(ObjRef::new(7));
        assert!(val.is_object());
        assert_eq!(val.as_object(), Some(ObjRef::new(7)));
    }

    #[test]
    fn test_value_default_is_nil() {
        assert_eq!(Value::default(), Value::Nil);
    }

    #[test]
    fn test_value_is_copy() {
        let a = Value::Number(1.0);
        let b = a;
        assert_eq!(a, b);
    }
}

#[cfg(test)]
mod value_truthiness_tests {
    use super::*;

    #[test]
    fn test_zero_is_truthy() {
        assert!(!Value::Number(0.0).is_falsey());
    }

    #[test]
    fn test_nan_is_truthy() {
        assert!(!Value::Number(f64::NAN).is_falsey());
    }

    #[test]
    fn test_objects_are_truthy() {
        assert!(!Value::Object(ObjRef::new(0)).is_falsey());
    }

    #[test]
    fn test_nil_and_false_are_falsey() {
        assert!(Value::Nil.is_falsey());
        assert!(Value::Bool(false).is_falsey());
    }
}

#[cfg(test)]
mod value_equality_tests {
    use super::*;

    #[test]
    fn test_numbers_use_ieee_equality() {
        assert_eq!(Value::Number(0.0), Value::Number(-0.0));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_different_kinds_are_never_equal() {
        assert_ne!(Value::Nil, Value::Number(0.0));
        assert_ne!(Value::Bool(true), Value::Number(1.0));
        assert_ne!(Value::Object(ObjRef::new(0)), Value::Nil);
    }
}

#[cfg(test)]
mod value_accessor_tests {
    use super::*;

    #[test]
    fn test_unchecked_number_after_guard() {
        let v = Value::Number(8.0);
        assert!(v.is_number());
        assert_eq!(v.as_number_unchecked(), 8.0);
    }

    #[test]
    fn test_unchecked_object_after_guard() {
        let v = Value::Object(ObjRef::new(2));
        assert!(v.is_object());
        assert_eq!(v.as_object_unchecked().index(), 2);
    }

    #[test]
    #[should_panic]
    fn test_unchecked_object_on_number_panics() {
        Value::Number(1.0).as_object_unchecked();
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::Number(1.0).type_name(), "number");
        assert_eq!(Value::Object(ObjRef::new(1)).type_name(), "object");
    }
}
