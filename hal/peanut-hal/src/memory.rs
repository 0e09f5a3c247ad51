//! Heap inspection

/// Reports how much dynamic memory is left
pub trait MemoryProbe {
    /// Give the allocator a chance to coalesce or reclaim before measuring
    ///
    /// Allocators without a collection step leave this as a no-op.
    fn collect(&mut self) {}

    /// Free heap bytes right now
    fn free_bytes(&self) -> usize;
}
