//! String hashing and the intern set.

use std::collections::HashMap;

use core_types::ObjRef;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a hash of `bytes`
///
/// # Examples
///
/// ```
/// use memory_manager::hash_bytes;
///
/// assert_eq!(hash_bytes(b""), 2_166_136_261);
/// assert_eq!(hash_bytes(b"a"), hash_bytes(b"a"));
/// assert_ne!(hash_bytes(b"a"), hash_bytes(b"b"));
/// ```
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ byte as u32).wrapping_mul(FNV_PRIME)
    })
}

/// Set of interned strings, bucketed by their cached hash.
///
/// The table stores only handles; comparing contents is left to the caller,
/// which owns the string objects.
#[derive(Debug, Default)]
pub struct StringTable {
    buckets: HashMap<u32, Vec<ObjRef>>,
    count: usize,
}

impl StringTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Find an interned string with `hash` whose contents satisfy `matches`
    pub fn find_interned(
        &self,
        hash: u32,
        mut matches: impl FnMut(ObjRef) -> bool,
    ) -> Option<ObjRef> {
        self.buckets
            .get(&hash)?
            .iter()
            .copied()
            .find(|&candidate| matches(candidate))
    }

    /// Record `string` as the canonical instance for its contents
    pub fn insert(&mut self, hash: u32, string: ObjRef) {
        self.buckets.entry(hash).or_default().push(string);
        self.count += 1;
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no string is interned
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Forget every interned string
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.count = 0;
    }
}
