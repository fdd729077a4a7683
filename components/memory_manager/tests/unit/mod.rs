//! Unit tests for memory_manager

mod test_heap;
mod test_interning;
