use std::mem::{align_of, size_of};
use std::simd::SimdElement;
use std::slice;

use glam::Vec3;

use crate::utilities::bundle_indexing::BundleIndexing;
use crate::utilities::vector::{Vector, VECTOR_WIDTH};
use crate::utilities::vector3_wide::Vector3Wide;

const SCALAR_SIZE: usize = 4;

/// Size in bytes of one bundle of 32 bit lanes.
pub const BUNDLE_SIZE: usize = VECTOR_WIDTH * SCALAR_SIZE;

/// Marks a record laid out as a sequence of bundles of 32 bit lanes.
///
/// Generic lane code walks implementors one scalar at a time with a stride of one bundle, so it can
/// copy, swap and clear a lane without knowing what the fields mean.
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` (or a `Vector<_>` itself) and consist only of 32 bit scalars:
/// no padding, alignment of at least 4, every bit pattern valid and all-zero a valid value.
/// Fields are expected to be `Vector<_>` bundles; a record may end in a tail smaller than a
/// bundle, which lane copies and clears skip.
pub unsafe trait BundleLayout: Copy + Send + Sync + 'static {}

unsafe impl BundleLayout for Vector<f32> {}
unsafe impl BundleLayout for Vector<i32> {}

#[inline(always)]
fn words<T: BundleLayout>(record: &T) -> &[u32] {
    // SAFETY: BundleLayout records are plain 32 bit scalars aligned to at least 4 bytes.
    unsafe { slice::from_raw_parts(record as *const T as *const u32, size_of::<T>() / SCALAR_SIZE) }
}

#[inline(always)]
fn words_mut<T: BundleLayout>(record: &mut T) -> &mut [u32] {
    // SAFETY: as in `words`; any u32 written back is a valid bit pattern for the record.
    unsafe { slice::from_raw_parts_mut(record as *mut T as *mut u32, size_of::<T>() / SCALAR_SIZE) }
}

/// Number of scalars in a record, truncated to whole bundles.
#[inline(always)]
const fn aligned_scalar_count<T>() -> usize {
    (size_of::<T>() / SCALAR_SIZE) & !BundleIndexing::vector_mask()
}

pub struct GatherScatter;

impl GatherScatter {
    /// Gets a reference to a lane of a vector. The lane is only validated in debug builds.
    #[inline(always)]
    pub fn get<T: SimdElement>(vector: &Vector<T>, index: usize) -> &T {
        debug_assert!(index < VECTOR_WIDTH, "Lane index {index} out of range.");
        &vector.as_array()[index]
    }

    #[inline(always)]
    pub fn get_mut<T: SimdElement>(vector: &mut Vector<T>, index: usize) -> &mut T {
        debug_assert!(index < VECTOR_WIDTH, "Lane index {index} out of range.");
        &mut vector.as_mut_array()[index]
    }

    /// Gets a reference to the first element in the vector reference.
    #[inline(always)]
    pub fn get_first<T: SimdElement>(vector: &Vector<T>) -> &T {
        &vector.as_array()[0]
    }

    #[inline(always)]
    pub fn get_first_mut<T: SimdElement>(vector: &mut Vector<T>) -> &mut T {
        &mut vector.as_mut_array()[0]
    }

    /// Writes a narrow vector into the first slot of a wide vector. Usually the target was zeroed first.
    #[inline(always)]
    pub fn gather_slot(source: Vec3, target_slot: &mut Vector3Wide) {
        *Self::get_first_mut(&mut target_slot.x) = source.x;
        *Self::get_first_mut(&mut target_slot.y) = source.y;
        *Self::get_first_mut(&mut target_slot.z) = source.z;
    }

    /// Creates an all-zero record.
    #[inline(always)]
    pub fn zeroed<T: BundleLayout>() -> T {
        // SAFETY: all-zero is a valid BundleLayout value.
        unsafe { std::mem::zeroed() }
    }

    /// Views a record as the bundles it is made of. The record size must be a whole number of bundles.
    #[inline(always)]
    pub fn as_bundles<T: BundleLayout, S: SimdElement>(record: &T) -> &[Vector<S>] {
        assert!(
            size_of::<T>() % BUNDLE_SIZE == 0
                && size_of::<S>() == SCALAR_SIZE
                && align_of::<T>() % align_of::<Vector<S>>() == 0,
            "Record is not a whole run of aligned bundles."
        );
        // SAFETY: size and alignment checked above; any 32 bit pattern is a valid scalar.
        unsafe {
            slice::from_raw_parts(
                record as *const T as *const Vector<S>,
                size_of::<T>() / BUNDLE_SIZE,
            )
        }
    }

    #[inline(always)]
    pub fn as_bundles_mut<T: BundleLayout, S: SimdElement>(record: &mut T) -> &mut [Vector<S>] {
        assert!(
            size_of::<T>() % BUNDLE_SIZE == 0
                && size_of::<S>() == SCALAR_SIZE
                && align_of::<T>() % align_of::<Vector<S>>() == 0,
            "Record is not a whole run of aligned bundles."
        );
        // SAFETY: as in `as_bundles`.
        unsafe {
            slice::from_raw_parts_mut(
                record as *mut T as *mut Vector<S>,
                size_of::<T>() / BUNDLE_SIZE,
            )
        }
    }

    /// Copies from one bundle lane to another. The bundle must be a contiguous block of Vector types.
    ///
    /// Records whose size is not a whole number of bundles are truncated: the tail is not copied.
    #[inline(always)]
    pub fn copy_lane<T: BundleLayout>(
        source_bundle: &T,
        source_inner_index: usize,
        target_bundle: &mut T,
        target_inner_index: usize,
    ) {
        debug_assert!(source_inner_index < VECTOR_WIDTH && target_inner_index < VECTOR_WIDTH);
        let size_in_ints = aligned_scalar_count::<T>();
        if size_in_ints == 0 {
            return;
        }
        let source = &words(source_bundle)[source_inner_index..];
        let target = &mut words_mut(target_bundle)[target_inner_index..];

        let mut offset = 0;
        macro_rules! copy_stride {
            () => {
                target[offset] = source[offset];
                offset += VECTOR_WIDTH;
            };
            (last) => {
                target[offset] = source[offset];
            };
        }
        // The trip count is a compile time constant, but the loop isn't unrolled without help.
        while offset + VECTOR_WIDTH * 8 <= size_in_ints {
            copy_stride!();
            copy_stride!();
            copy_stride!();
            copy_stride!();
            copy_stride!();
            copy_stride!();
            copy_stride!();
            copy_stride!();
        }
        if offset + VECTOR_WIDTH * 4 <= size_in_ints {
            copy_stride!();
            copy_stride!();
            copy_stride!();
            copy_stride!();
        }
        if offset + VECTOR_WIDTH * 2 <= size_in_ints {
            copy_stride!();
            copy_stride!();
        }
        if offset + VECTOR_WIDTH <= size_in_ints {
            copy_stride!(last);
        }
    }

    /// Swaps lanes between two bundles. The bundle type must be a whole number of bundles.
    pub fn swap_lanes<T: BundleLayout>(
        bundle_a: &mut T,
        inner_index_a: usize,
        bundle_b: &mut T,
        inner_index_b: usize,
    ) {
        debug_assert!(
            size_of::<T>() % BUNDLE_SIZE == 0,
            "Swapping does not truncate; the type must be evenly divisible by the bundle size."
        );
        debug_assert!(inner_index_a < VECTOR_WIDTH && inner_index_b < VECTOR_WIDTH);
        let size_in_ints = size_of::<T>() / SCALAR_SIZE;
        let a = &mut words_mut(bundle_a)[inner_index_a..];
        let b = &mut words_mut(bundle_b)[inner_index_b..];
        let mut i = 0;
        while i < size_in_ints {
            std::mem::swap(&mut a[i], &mut b[i]);
            i += VECTOR_WIDTH;
        }
    }

    /// Zeroes a lane across every whole bundle of the record. A tail smaller than a bundle is left alone.
    #[inline(always)]
    pub fn clear_lane<T: BundleLayout>(bundle: &mut T, inner_index: usize) {
        debug_assert!(inner_index < VECTOR_WIDTH);
        let size_in_ints = aligned_scalar_count::<T>();
        let lanes = words_mut(bundle);
        for i in (inner_index..size_in_ints).step_by(VECTOR_WIDTH) {
            lanes[i] = 0;
        }
    }

    /// Zeroes `count` elements of a lane, starting from the record's first bundle.
    #[inline(always)]
    pub fn clear_lane_count<T: BundleLayout>(bundle: &mut T, inner_index: usize, count: usize) {
        debug_assert!(inner_index < VECTOR_WIDTH);
        debug_assert!(count * VECTOR_WIDTH <= size_of::<T>() / SCALAR_SIZE);
        let lanes = words_mut(bundle);
        for i in 0..count {
            lanes[inner_index + i * VECTOR_WIDTH] = 0;
        }
    }

    /// Gets a lane of a contiguous run of vectors, one value per vector. Copies `values.len()` values.
    #[inline(always)]
    pub fn get_lane<T: SimdElement>(start_vectors: &[Vector<T>], inner_index: usize, values: &mut [T]) {
        debug_assert!(inner_index < VECTOR_WIDTH);
        debug_assert!(values.len() <= start_vectors.len());
        for (value, vector) in values.iter_mut().zip(start_vectors) {
            *value = vector.as_array()[inner_index];
        }
    }

    /// Sets a lane of a contiguous run of vectors from a flat array of values.
    #[inline(always)]
    pub fn set_lane<T: SimdElement>(start_vectors: &mut [Vector<T>], inner_index: usize, values: &[T]) {
        debug_assert!(inner_index < VECTOR_WIDTH);
        debug_assert!(values.len() <= start_vectors.len());
        for (vector, value) in start_vectors.iter_mut().zip(values) {
            vector.as_mut_array()[inner_index] = *value;
        }
    }

    /// Gets a view of a bundle container such that slot 0 of each bundle covers the given inner index.
    #[inline(always)]
    pub fn offset_view<T: BundleLayout>(bundle_container: &T, inner_index: usize) -> OffsetView<'_, T> {
        debug_assert!(inner_index < VECTOR_WIDTH);
        OffsetView {
            bundle: bundle_container,
            inner_index,
        }
    }
}

/// A record seen through one of its lanes.
///
/// Readers pick a bundle out of the record and get the value in the viewed lane, so per-type code
/// reads its data the same way no matter which lane the constraint lives in.
#[derive(Clone, Copy)]
pub struct OffsetView<'a, T> {
    bundle: &'a T,
    inner_index: usize,
}

impl<'a, T: BundleLayout> OffsetView<'a, T> {
    #[inline(always)]
    pub fn inner_index(&self) -> usize {
        self.inner_index
    }

    /// Reads the viewed lane of a bundle selected from the record.
    #[inline(always)]
    pub fn get<S: SimdElement + 'a>(&self, select: impl FnOnce(&'a T) -> &'a Vector<S>) -> S {
        *GatherScatter::get(select(self.bundle), self.inner_index)
    }

    #[inline(always)]
    pub fn vector3(&self, select: impl FnOnce(&'a T) -> &'a Vector3Wide) -> Vec3 {
        select(self.bundle).read_slot(self.inner_index)
    }

    /// Copies the viewed lane into slot 0 of an otherwise zeroed record.
    pub fn to_first_lane(&self) -> T {
        let mut shifted = GatherScatter::zeroed::<T>();
        GatherScatter::copy_lane(self.bundle, self.inner_index, &mut shifted, 0);
        shifted
    }
}
