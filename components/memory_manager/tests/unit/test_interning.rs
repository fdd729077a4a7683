//! Tests for string interning through the heap

use core_types::Value;
use memory_manager::{hash_bytes, Heap, ObjectKind};

#[test]
fn test_equal_contents_share_one_object() {
    let mut heap = Heap::new();
    let first = heap.intern("shared");
    let second = heap.intern(&String::from("shared"));
    assert_eq!(Value::Object(first), Value::Object(second));
    assert_eq!(heap.interned_count(), 1);
}

#[test]
fn test_distinct_contents_get_distinct_objects() {
    let mut heap = Heap::new();
    let a = heap.intern("a");
    let b = heap.intern("b");
    assert_ne!(a, b);
    assert_eq!(heap.interned_count(), 2);
}

#[test]
fn test_string_caches_fnv1a_hash() {
    let mut heap = Heap::new();
    let s = heap.intern("foobar");
    assert_eq!(heap.string(s).hash(), hash_bytes(b"foobar"));
    assert_eq!(heap.string(s).hash(), 0xbf9c_f968);
}

#[test]
fn test_uninterned_string_is_not_found() {
    let mut heap = Heap::new();
    let loose = heap.alloc_string_uninterned("loose".to_string());
    assert_eq!(heap.kind(loose), ObjectKind::String);
    assert_eq!(heap.find_interned("loose"), None);
    let canonical = heap.intern("loose");
    assert_ne!(loose, canonical);
}

#[test]
fn test_concatenation_result_compares_by_identity() {
    let mut heap = Heap::new();
    let foo = heap.intern("foo");
    let bar = heap.intern("bar");
    let literal = heap.intern("foobar");
    let joined = heap.concatenate(foo, bar, false);
    assert_eq!(heap.string(joined).as_str(), heap.string(literal).as_str());
    assert_ne!(Value::Object(joined), Value::Object(literal));
}

#[test]
fn test_empty_string_interns() {
    let mut heap = Heap::new();
    let empty = heap.intern("");
    assert!(heap.string(empty).is_empty());
    assert_eq!(heap.intern(""), empty);
}
