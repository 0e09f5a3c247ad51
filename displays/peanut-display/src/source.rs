//! Fallible buffer allocation

use alloc::vec::Vec;

/// Hands out zeroed byte buffers, or nothing if memory is short
///
/// Allocation must never abort the program: a source that cannot satisfy
/// the request returns `None`.
pub trait BufferSource {
    /// Try to reserve exactly `len` zeroed bytes
    fn try_reserve(&mut self, len: usize) -> Option<Vec<u8>>;
}

/// Buffer source backed by the global allocator
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapSource;

impl BufferSource for HeapSource {
    fn try_reserve(&mut self, len: usize) -> Option<Vec<u8>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).ok()?;
        buf.resize(len, 0);
        Some(buf)
    }
}
