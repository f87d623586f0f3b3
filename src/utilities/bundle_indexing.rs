use crate::utilities::vector::VECTOR_WIDTH;

pub const VECTOR_MASK: usize = VECTOR_WIDTH - 1;

/// Some helpers for indexing into vector bundles.
pub struct BundleIndexing;

impl BundleIndexing {
    /// Gets the mask value such that x & VECTOR_MASK computes x % VECTOR_WIDTH.
    #[inline(always)]
    pub const fn vector_mask() -> usize {
        VECTOR_MASK
    }

    /// Gets the shift value such that x >> vector_shift() divides x by VECTOR_WIDTH.
    #[inline(always)]
    pub const fn vector_shift() -> usize {
        VECTOR_WIDTH.trailing_zeros() as usize
    }

    /// Splits a linear constraint index into the bundle holding it and the lane inside that bundle.
    #[inline(always)]
    pub fn get_bundle_indices(linear_index: usize) -> (usize, usize) {
        (
            linear_index >> Self::vector_shift(),
            linear_index & Self::vector_mask(),
        )
    }

    #[inline(always)]
    pub fn get_bundle_count(element_count: usize) -> usize {
        (element_count + Self::vector_mask()) >> Self::vector_shift()
    }
}
