//! Heap probe for the performance governor

use peanut_hal::MemoryProbe;

use crate::HEAP;

/// Reads free space straight from the global allocator
///
/// The linked-list allocator coalesces on free, so there is nothing to
/// collect.
pub struct HeapProbe;

impl MemoryProbe for HeapProbe {
    fn free_bytes(&self) -> usize {
        HEAP.free()
    }
}
