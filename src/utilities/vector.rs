//! Bundle width selection.
//!
//! Every packed record in the crate is a run of `Vector<T>` bundles holding 32 bit scalars,
//! so a single lane count is shared by `Vector<f32>` and `Vector<i32>`.

#[cfg(target_arch = "x86_64")]
const fn preferred_byte_size() -> usize {
    if cfg!(target_feature = "avx512f") {
        64
    } else if cfg!(target_feature = "avx") {
        32
    } else if cfg!(target_feature = "sse2") {
        16
    } else {
        8
    }
}

#[cfg(target_arch = "aarch64")]
const fn preferred_byte_size() -> usize {
    if cfg!(target_feature = "sve2") {
        64
    } else if cfg!(target_feature = "sve") {
        32
    } else if cfg!(target_feature = "neon") {
        16
    } else {
        8
    }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const fn preferred_byte_size() -> usize {
    16
}

/// Number of lanes that fit a preferred SIMD register for 32 bit scalars, never less than 2.
pub const fn optimal_lanes() -> usize {
    let lanes = preferred_byte_size() / 4;
    if lanes > 2 {
        lanes
    } else {
        2
    }
}

/// Number of lanes in every bundle.
pub const VECTOR_WIDTH: usize = optimal_lanes();

pub type Vector<T> = std::simd::Simd<T, VECTOR_WIDTH>;
