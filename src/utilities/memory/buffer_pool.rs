use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::mem::size_of;

/// Recycles typed buffers between uses.
///
/// Buffers are handed out with a power of two capacity and cached per element type when returned,
/// so steady state passes that take and return the same shapes stop allocating.
#[derive(Default)]
pub struct BufferPool {
    pools: HashMap<TypeId, Vec<Box<dyn Any + Send>>>,
    retained_byte_count: u64,
    outstanding_count: usize,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the capacity of a buffer that would be returned by the pool for a given element count.
    #[inline]
    pub fn get_capacity_for_count(count: usize) -> usize {
        count.max(1).next_power_of_two()
    }

    /// Takes an empty buffer able to hold at least `count` elements without reallocating.
    pub fn take_at_least<T: Send + 'static>(&mut self, count: usize) -> Vec<T> {
        let capacity = Self::get_capacity_for_count(count);
        self.outstanding_count += 1;
        if let Some(cached) = self.pools.get_mut(&TypeId::of::<T>()) {
            if let Some(position) = cached.iter().position(|buffer| {
                buffer
                    .downcast_ref::<Vec<T>>()
                    .is_some_and(|buffer| buffer.capacity() >= capacity)
            }) {
                let buffer = cached.swap_remove(position);
                if let Ok(buffer) = buffer.downcast::<Vec<T>>() {
                    self.retained_byte_count -= (buffer.capacity() * size_of::<T>()) as u64;
                    return *buffer;
                }
            }
        }
        Vec::with_capacity(capacity)
    }

    /// Takes an empty buffer for `count` elements. Capacity may be larger than requested.
    #[inline]
    pub fn take<T: Send + 'static>(&mut self, count: usize) -> Vec<T> {
        self.take_at_least(count)
    }

    /// Returns a buffer to the pool. Its contents are dropped.
    pub fn return_buffer<T: Send + 'static>(&mut self, mut buffer: Vec<T>) {
        debug_assert!(
            self.outstanding_count > 0,
            "Returned a buffer that was never taken from this pool."
        );
        self.outstanding_count = self.outstanding_count.saturating_sub(1);
        buffer.clear();
        if buffer.capacity() == 0 {
            return;
        }
        self.retained_byte_count += (buffer.capacity() * size_of::<T>()) as u64;
        self.pools
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Box::new(buffer));
    }

    /// Number of buffers taken and not yet returned.
    #[inline]
    pub fn outstanding_count(&self) -> usize {
        self.outstanding_count
    }

    /// Computes the total number of bytes held by cached buffers.
    #[inline]
    pub fn get_total_allocated_byte_count(&self) -> u64 {
        self.retained_byte_count
    }

    /// Drops every cached buffer. Outstanding buffers stay valid.
    pub fn clear(&mut self) {
        self.pools.clear();
        self.retained_byte_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_rounds_to_power_of_two() {
        assert_eq!(BufferPool::get_capacity_for_count(0), 1);
        assert_eq!(BufferPool::get_capacity_for_count(5), 8);
        assert_eq!(BufferPool::get_capacity_for_count(64), 64);
    }

    #[test]
    fn returned_buffers_are_reused() {
        let mut pool = BufferPool::new();
        let mut buffer = pool.take::<u64>(10);
        assert!(buffer.capacity() >= 10);
        buffer.extend([1, 2, 3]);
        let address = buffer.as_ptr();
        let capacity = buffer.capacity();
        pool.return_buffer(buffer);
        assert_eq!(pool.outstanding_count(), 0);
        assert_eq!(pool.get_total_allocated_byte_count(), capacity as u64 * 8);

        let reused = pool.take::<u64>(12);
        assert!(reused.is_empty());
        assert_eq!(reused.as_ptr(), address);
        assert_eq!(pool.get_total_allocated_byte_count(), 0);
        pool.return_buffer(reused);
    }

    #[test]
    fn pools_are_separated_by_type() {
        let mut pool = BufferPool::new();
        let floats = pool.take::<f32>(4);
        pool.return_buffer(floats);
        let ints = pool.take::<u32>(4);
        // Nothing cached for u32 yet; the f32 buffer stays in its own pool.
        assert!(pool.get_total_allocated_byte_count() > 0);
        pool.return_buffer(ints);
        pool.clear();
        assert_eq!(pool.get_total_allocated_byte_count(), 0);
    }

    #[test]
    fn too_small_buffers_are_skipped() {
        let mut pool = BufferPool::new();
        let small = pool.take::<u8>(2);
        pool.return_buffer(small);
        let large = pool.take::<u8>(100);
        assert!(large.capacity() >= 100);
        assert_eq!(pool.outstanding_count(), 1);
        pool.return_buffer(large);
    }
}
