//! Host functions available to every script
//!
//! - `clock()`: seconds since the VM first registered its natives
//! - `readNum()`: reads a line from stdin as a number, `nil` if it is not one
//! - `readStr()`: reads a line from stdin as a string

use std::io::{self, BufRead};
use std::sync::OnceLock;
use std::time::Instant;

use core_types::Value;
use memory_manager::{Heap, NativeFn};

use crate::vm::VM;

static START: OnceLock<Instant> = OnceLock::new();

/// Natives defined by [`VM::new`], by global name
pub const NATIVES: [(&str, NativeFn); 3] = [
    ("clock", clock),
    ("readNum", read_num),
    ("readStr", read_str),
];

/// Define every entry of [`NATIVES`] as a global
pub(crate) fn register_all(vm: &mut VM) {
    START.get_or_init(Instant::now);
    for (name, function) in NATIVES {
        vm.define_native(name, function);
    }
}

/// `clock()`
pub fn clock(_heap: &mut Heap, _args: &[Value]) -> Value {
    Value::Number(START.get_or_init(Instant::now).elapsed().as_secs_f64())
}

/// `readNum()`
pub fn read_num(_heap: &mut Heap, _args: &[Value]) -> Value {
    match read_line() {
        Some(line) => parse_number(&line),
        None => Value::Nil,
    }
}

/// `readStr()`
pub fn read_str(heap: &mut Heap, _args: &[Value]) -> Value {
    let line = read_line().unwrap_or_default();
    Value::Object(heap.take_string(line))
}

/// Parse one input line as a number
pub fn parse_number(line: &str) -> Value {
    line.trim()
        .parse::<f64>()
        .map(Value::Number)
        .unwrap_or(Value::Nil)
}

/// Read one line from stdin without its line terminator
fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let trimmed = line.trim_end_matches(['\r', '\n']).len();
            line.truncate(trimmed);
            Some(line)
        }
    }
}
