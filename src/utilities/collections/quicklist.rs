use std::mem::MaybeUninit;
use std::ops::{Index, IndexMut};
use std::vec::Drain;

use crate::utilities::memory::buffer_pool::BufferPool;

/// List built on top of pooled buffers.
///
/// Growth goes through the pool: the old span is returned and a larger one taken, so lists that are
/// rebuilt every pass keep reusing the same memory.
pub struct QuickList<T> {
    span: Vec<T>,
}

impl<T> Default for QuickList<T> {
    fn default() -> Self {
        Self { span: Vec::new() }
    }
}

impl<T: Send + 'static> QuickList<T> {
    /// Creates a new list with minimum capacity from a pool.
    #[inline(always)]
    pub fn with_capacity(minimum_initial_count: usize, pool: &mut BufferPool) -> Self {
        Self {
            span: pool.take_at_least(minimum_initial_count),
        }
    }

    /// Number of elements in the list.
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.span.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Gets the capacity of the backing span.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.span.capacity()
    }

    /// Ensures that the list has enough room to hold the specified number of elements.
    pub fn ensure_capacity(&mut self, count: usize, pool: &mut BufferPool) {
        if count > self.span.capacity() {
            let mut new_span = pool.take_at_least::<T>(count);
            new_span.append(&mut self.span);
            let old_span = std::mem::replace(&mut self.span, new_span);
            if old_span.capacity() > 0 {
                pool.return_buffer(old_span);
            }
        }
    }

    /// Adds an element to the list without growing. Capacity must already be available.
    #[inline(always)]
    pub fn add_unsafely(&mut self, element: T) {
        debug_assert!(
            self.span.len() < self.span.capacity(),
            "Adding would exceed capacity."
        );
        self.span.push(element);
    }

    /// Adds an element to the list, resizing through the pool if necessary.
    #[inline(always)]
    pub fn add(&mut self, element: T, pool: &mut BufferPool) {
        if self.span.len() == self.span.capacity() {
            self.ensure_capacity((self.span.len() * 2).max(4), pool);
        }
        self.span.push(element);
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        &self.span
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.span
    }

    #[inline(always)]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.span.iter()
    }

    /// Removes every element, handing them out by value.
    #[inline(always)]
    pub fn drain(&mut self) -> Drain<'_, T> {
        self.span.drain(..)
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.span.clear();
    }

    /// Uninitialized memory past the last element.
    #[inline(always)]
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        self.span.spare_capacity_mut()
    }

    /// Sets the element count after elements were written into spare capacity.
    ///
    /// # Safety
    ///
    /// `count` must not exceed the capacity and every element below `count` must be initialized.
    #[inline(always)]
    pub unsafe fn set_count(&mut self, count: usize) {
        self.span.set_len(count);
    }

    /// Returns the resources associated with the list to the pool.
    pub fn dispose(self, pool: &mut BufferPool) {
        if self.span.capacity() > 0 {
            pool.return_buffer(self.span);
        }
    }
}

impl<T> Index<usize> for QuickList<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        &self.span[index]
    }
}

impl<T> IndexMut<usize> for QuickList<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.span[index]
    }
}
