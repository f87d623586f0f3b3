use crate::utilities::gather_scatter::BundleLayout;
use crate::utilities::vector::Vector;

/// A one-body constraint's body reference in AOSOA layout.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct OneBodyReferences {
    pub index_a: Vector<i32>,
}

unsafe impl BundleLayout for OneBodyReferences {}

/// A two-body constraint's body references in AOSOA layout.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct TwoBodyReferences {
    pub index_a: Vector<i32>,
    pub index_b: Vector<i32>,
}

unsafe impl BundleLayout for TwoBodyReferences {}
