use std::mem::{align_of, size_of};
use std::slice;

use crate::utilities::gather_scatter::{BundleLayout, BUNDLE_SIZE};
use crate::utilities::vector::Vector;

/// Untyped, bundle aligned storage.
///
/// Constraint batches keep their prestep and body reference data in raw buffers; the code that
/// knows the record type views them as typed slices.
#[derive(Clone, Default)]
pub struct RawBuffer {
    bundles: Vec<Vector<i32>>,
}

impl RawBuffer {
    /// Creates a zeroed buffer of `bundle_count` bundles.
    pub fn new(bundle_count: usize) -> Self {
        Self {
            bundles: vec![Vector::splat(0); bundle_count],
        }
    }

    /// Number of bundles in the buffer.
    #[inline(always)]
    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }

    #[inline(always)]
    pub fn byte_count(&self) -> usize {
        self.bundles.len() * BUNDLE_SIZE
    }

    /// Grows or shrinks the buffer, zeroing new bundles and keeping existing ones.
    pub fn resize(&mut self, bundle_count: usize) {
        self.bundles.resize(bundle_count, Vector::splat(0));
    }

    #[inline(always)]
    fn assert_record_layout<T: BundleLayout>() {
        assert!(
            size_of::<T>() != 0
                && size_of::<T>() % BUNDLE_SIZE == 0
                && align_of::<Vector<i32>>() % align_of::<T>() == 0,
            "Raw buffers only hold records made of whole bundles."
        );
    }

    /// Views the buffer as records of `T`. Trailing bytes that do not fill a record are not exposed.
    #[inline(always)]
    pub fn as_slice<T: BundleLayout>(&self) -> &[T] {
        Self::assert_record_layout::<T>();
        let count = self.byte_count() / size_of::<T>();
        // SAFETY: layout checked above; the storage is bundle aligned and any bit pattern is valid.
        unsafe { slice::from_raw_parts(self.bundles.as_ptr() as *const T, count) }
    }

    #[inline(always)]
    pub fn as_mut_slice<T: BundleLayout>(&mut self) -> &mut [T] {
        Self::assert_record_layout::<T>();
        let count = self.byte_count() / size_of::<T>();
        // SAFETY: as in `as_slice`.
        unsafe { slice::from_raw_parts_mut(self.bundles.as_mut_ptr() as *mut T, count) }
    }
}
