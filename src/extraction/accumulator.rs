use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use crate::utilities::collections::quicklist::QuickList;

/// Lets many workers append to one list at once.
///
/// The list's capacity must be ensured before the accumulator is created. Each append reserves a
/// disjoint region with a single `fetch_add` and copies into it; `finish` publishes the count.
pub struct OutputAccumulator<'a, T> {
    output: *mut QuickList<T>,
    base: *mut T,
    start_count: usize,
    available: usize,
    reserved: CachePadded<AtomicUsize>,
    _marker: PhantomData<&'a mut QuickList<T>>,
}

// SAFETY: appends only write to regions handed out once by the atomic counter.
unsafe impl<T: Send> Sync for OutputAccumulator<'_, T> {}

impl<'a, T: Copy + Send + 'static> OutputAccumulator<'a, T> {
    pub fn new(output: &'a mut QuickList<T>) -> Self {
        let start_count = output.count();
        let output: *mut QuickList<T> = output;
        // SAFETY: `output` came from a live exclusive borrow.
        let spare = unsafe { (*output).spare_capacity_mut() };
        let base = spare.as_mut_ptr() as *mut T;
        let available = spare.len();
        Self {
            output,
            base,
            start_count,
            available,
            reserved: CachePadded::new(AtomicUsize::new(0)),
            _marker: PhantomData,
        }
    }

    /// Number of items that can still be appended before the reserved capacity runs out.
    #[inline]
    pub fn available(&self) -> usize {
        self.available
    }

    /// Copies `items` into a freshly reserved region and returns the index of the first one.
    ///
    /// Panics if the region would exceed the capacity ensured before the pass.
    pub fn append(&self, items: &[T]) -> usize {
        let offset = self.reserved.fetch_add(items.len(), Ordering::Relaxed);
        assert!(
            offset + items.len() <= self.available,
            "Output reservation exceeded the capacity ensured before the pass."
        );
        // SAFETY: the region lies within spare capacity and no other append received it.
        unsafe {
            ptr::copy_nonoverlapping(items.as_ptr(), self.base.add(offset), items.len());
        }
        self.start_count + offset
    }

    /// Publishes everything appended so far and returns the list's new count.
    pub fn finish(self) -> usize {
        let count = self.start_count + self.reserved.load(Ordering::Acquire);
        // SAFETY: `output` is exclusively borrowed for 'a and every append checked that it stayed
        // within capacity, so the first `count` elements are initialized.
        unsafe {
            (*self.output).set_count(count);
        }
        count
    }
}
