//! Contract tests for interpreter API
//!
//! These tests pin the public surface a host program relies on.

use bytecode_system::{Chunk, OpCode};
use core_types::{CompileError, ObjRef, RuntimeErrorKind, Value};
use interpreter::{
    render_report, Compiler, ConfigError, InterpretError, VmConfig, FRAMES_MAX, STACK_MAX, VM,
};
use memory_manager::{Heap, ObjFunction};

/// A compiler stand-in that understands exactly one program: a number
/// literal, which it stores in the global `value`.
struct LiteralCompiler {
    compiled: usize,
}

impl Compiler for LiteralCompiler {
    fn compile(&mut self, source: &str, heap: &mut Heap) -> Result<ObjRef, CompileError> {
        let n: f64 = source
            .trim()
            .parse()
            .map_err(|_| CompileError::new(format!("Expect number, got '{}'.", source)))?;
        let name = heap.intern("value");
        let mut chunk = Chunk::new();
        chunk.emit_constant(Value::Number(n), 1).unwrap();
        let idx = chunk.add_constant(Value::Object(name)).unwrap();
        chunk.write_op_with(OpCode::DefineGlobal, idx, 1);
        chunk.write_op(OpCode::Nil, 1);
        chunk.write_op(OpCode::Return, 1);
        self.compiled += 1;
        Ok(heap.alloc_function(ObjFunction::script(chunk)))
    }
}

/// Test VM::interpret() runs the compiled function
#[test]
fn test_interpret_ok_contract() {
    let mut vm = VM::new();
    let mut compiler = LiteralCompiler { compiled: 0 };
    assert_eq!(vm.interpret(&mut compiler, "42"), Ok(()));
    assert_eq!(vm.get_global("value"), Some(Value::Number(42.0)));
    assert_eq!(compiler.compiled, 1);
}

/// Test VM::interpret() surfaces compile errors without running anything
#[test]
fn test_interpret_compile_error_contract() {
    let mut vm = VM::new();
    let mut compiler = LiteralCompiler { compiled: 0 };
    let err = vm.interpret(&mut compiler, "forty-two").unwrap_err();
    assert!(matches!(err, InterpretError::Compile(_)));
    assert_eq!(err.to_string(), "compile error: Expect number, got 'forty-two'.");
    assert_eq!(vm.get_global("value"), None);
}

/// Test the compiler can be a trait object
#[test]
fn test_dyn_compiler_contract() {
    let mut vm = VM::new();
    let mut compiler: Box<dyn Compiler> = Box::new(LiteralCompiler { compiled: 0 });
    assert!(vm.interpret(compiler.as_mut(), "1").is_ok());
}

/// Test runtime errors carry kind, message and trace
#[test]
fn test_runtime_error_contract() {
    let mut vm = VM::new().with_error_output(std::io::sink());
    let mut compiler = |_: &str, heap: &mut Heap| -> Result<ObjRef, CompileError> {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Nil, 3);
        chunk.write_op(OpCode::Negate, 3);
        chunk.write_op(OpCode::Return, 3);
        Ok(heap.alloc_function(ObjFunction::script(chunk)))
    };
    let err = vm.interpret(&mut compiler, "-nil;").unwrap_err();
    assert_eq!(err.runtime_kind(), Some(RuntimeErrorKind::TypeError));
    match err {
        InterpretError::Runtime(err) => {
            assert_eq!(err.to_string(), "Operand must be a number.");
            assert_eq!(render_report(&err), "Operand must be a number.\n[line 3] in script\n");
        }
        other => panic!("unexpected {:?}", other),
    }
}

/// Test the default limits
#[test]
fn test_limits_contract() {
    assert_eq!(FRAMES_MAX, 64);
    assert_eq!(STACK_MAX, 64 * 256);
    assert_eq!(VM::new().config().stack_capacity, STACK_MAX);
}

/// Test VmConfig loads from JSON with defaults for missing fields
#[test]
fn test_config_json_contract() {
    let config = VmConfig::from_json(r#"{ "report_to_stderr": false }"#).unwrap();
    assert!(!config.report_to_stderr);
    assert!(!config.intern_concatenations);
    let vm = VM::with_config(config.clone()).unwrap();
    assert_eq!(vm.config(), &config);
}

/// Test invalid configurations are rejected
#[test]
fn test_config_error_contract() {
    let err = VM::with_config(VmConfig {
        stack_capacity: 0,
        ..VmConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::ZeroStackCapacity));
}

/// Test teardown releases the natives registered at creation
#[test]
fn test_teardown_contract() {
    let mut vm = VM::new();
    let live = vm.heap().live_count();
    let stats = vm.teardown();
    assert_eq!(stats.freed.total(), live);
    assert_eq!(stats.freed.natives, 3);
    assert_eq!(vm.heap().live_count(), 0);
}
