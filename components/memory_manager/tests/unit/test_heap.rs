//! Tests for the object registry and teardown reclamation

use bytecode_system::{Chunk, OpCode};
use core_types::Value;
use memory_manager::{Heap, ObjFunction, Object, UpvalueState};

fn answer(_heap: &mut Heap, _args: &[Value]) -> Value {
    Value::Number(42.0)
}

fn populated_heap() -> Heap {
    let mut heap = Heap::new();
    let name = heap.intern("add");
    let mut chunk = Chunk::new();
    chunk.write_op_with(OpCode::GetLocal, 1, 1);
    chunk.write_op_with(OpCode::GetLocal, 2, 1);
    chunk.write_op(OpCode::Add, 1);
    chunk.write_op(OpCode::Return, 1);
    let add = heap.alloc_function(ObjFunction::new(2, Some(name), chunk));
    heap.alloc_closure(add, Box::new([]));
    heap.alloc_native(answer);
    heap
}

#[test]
fn test_every_allocation_is_registered() {
    let heap = populated_heap();
    let allocated = heap.stats().allocated;
    assert_eq!(allocated.strings, 1);
    assert_eq!(allocated.functions, 1);
    assert_eq!(allocated.closures, 1);
    assert_eq!(allocated.natives, 1);
    assert_eq!(heap.live_count(), 4);
}

#[test]
fn test_free_objects_counts_match_allocations() {
    let mut heap = populated_heap();
    let allocated = heap.stats().allocated;
    let reclaimed = heap.free_objects();
    assert_eq!(reclaimed.freed, allocated);
    assert_eq!(reclaimed.code_bytes, 6);
    assert_eq!(heap.live_count(), 0);
    assert_eq!(heap.interned_count(), 0);
}

#[test]
fn test_shared_function_released_once() {
    let mut heap = Heap::new();
    let function = heap.alloc_function(ObjFunction::script(Chunk::new()));
    for _ in 0..3 {
        heap.alloc_closure(function, Box::new([]));
    }
    let reclaimed = heap.free_objects();
    assert_eq!(reclaimed.freed.functions, 1);
    assert_eq!(reclaimed.freed.closures, 3);
}

#[test]
fn test_second_sweep_is_a_no_op() {
    let mut heap = populated_heap();
    heap.free_objects();
    let again = heap.free_objects();
    assert_eq!(again.freed.total(), 0);
    assert_eq!(again.string_bytes, 0);
}

#[test]
fn test_native_is_callable_through_heap() {
    let mut heap = Heap::new();
    let native = heap.alloc_native(answer);
    let function = match heap.get(native) {
        Object::Native(n) => n.function,
        other => panic!("unexpected {:?}", other.kind()),
    };
    assert_eq!(function(&mut heap, &[]), Value::Number(42.0));
}

#[test]
fn test_closed_upvalue_holds_value() {
    let mut heap = Heap::new();
    let upvalue = heap.alloc_upvalue(2);
    heap.upvalue_mut(upvalue).state = UpvalueState::Closed(Value::Bool(true));
    assert_eq!(heap.upvalue(upvalue).state, UpvalueState::Closed(Value::Bool(true)));
}

#[test]
fn test_handles_from_before_a_sweep_never_alias_new_objects() {
    let mut heap = Heap::new();
    let before = heap.intern("before");
    heap.free_objects();
    let after = heap.alloc_function(ObjFunction::script(Chunk::new()));
    assert_ne!(before, after);
    assert!(heap.try_get(before).is_none());
    assert!(matches!(heap.try_get(after), Some(Object::Function(_))));
}
