use std::mem::size_of;

use glam::Vec3;

use crate::physics::bodies::Bodies;
use crate::physics::constraints::type_batch::TypeBatch;
use crate::utilities::bundle_indexing::BundleIndexing;
use crate::utilities::collections::quicklist::QuickList;
use crate::utilities::gather_scatter::{BundleLayout, GatherScatter, OffsetView};
use crate::utilities::vector::Vector;

/// Largest number of bodies a constraint may reference.
pub const MAXIMUM_BODIES_PER_CONSTRAINT: usize = 4;

/// Turns a single constraint lane into output items.
///
/// Implementations only see one constraint at a time: the prestep record is viewed through the
/// constraint's lane and body references arrive already resolved to indices in `set_index`.
pub trait LaneExtractor<T>: Send + Sync + 'static {
    /// Prestep record of the constraint type this extractor reads.
    type Prestep: BundleLayout;
    /// Body reference record of the constraint type; one `Vector<i32>` per body.
    type BodyReferences: BundleLayout;

    /// Number of items appended for every constraint.
    fn items_per_constraint(&self) -> usize;

    /// Appends exactly `items_per_constraint()` items for one constraint.
    ///
    /// `output` was sized for the whole job, so items can be added without growing.
    fn extract(
        &self,
        prestep: OffsetView<'_, Self::Prestep>,
        set_index: usize,
        body_indices: &[usize],
        bodies: &Bodies,
        tint: Vec3,
        output: &mut QuickList<T>,
    );
}

/// Extracts items from a range of a type batch. Stored per type id in an extractor registry.
pub trait TypeExtractor<T>: Send + Sync {
    fn items_per_constraint(&self) -> usize;

    /// Extracts every live constraint in `constraint_start..constraint_start + constraint_count`.
    /// Holes in the type batch produce no items.
    #[allow(clippy::too_many_arguments)]
    fn extract_range(
        &self,
        bodies: &Bodies,
        set_index: usize,
        type_batch: &TypeBatch,
        constraint_start: usize,
        constraint_count: usize,
        tint: Vec3,
        output: &mut QuickList<T>,
    );
}

/// Walks type batch lanes on behalf of a [`LaneExtractor`].
pub struct TypedExtractor<E> {
    extractor: E,
    body_count: usize,
}

impl<E> TypedExtractor<E> {
    /// Wraps a lane extractor, checking that its body reference record can be read one body at a
    /// time.
    pub fn new<T>(extractor: E) -> Self
    where
        E: LaneExtractor<T>,
    {
        let reference_size = size_of::<E::BodyReferences>();
        let bundle_size = size_of::<Vector<i32>>();
        assert!(
            reference_size % bundle_size == 0,
            "Body references must be a contiguous run of Vector<i32> values."
        );
        let body_count = reference_size / bundle_size;
        assert!(
            body_count <= MAXIMUM_BODIES_PER_CONSTRAINT,
            "Constraints may reference at most {MAXIMUM_BODIES_PER_CONSTRAINT} bodies."
        );
        Self {
            extractor,
            body_count,
        }
    }

    #[inline(always)]
    pub fn body_count(&self) -> usize {
        self.body_count
    }

    #[inline(always)]
    pub fn extractor(&self) -> &E {
        &self.extractor
    }
}

impl<T, E: LaneExtractor<T>> TypeExtractor<T> for TypedExtractor<E> {
    #[inline]
    fn items_per_constraint(&self) -> usize {
        self.extractor.items_per_constraint()
    }

    fn extract_range(
        &self,
        bodies: &Bodies,
        set_index: usize,
        type_batch: &TypeBatch,
        constraint_start: usize,
        constraint_count: usize,
        tint: Vec3,
        output: &mut QuickList<T>,
    ) {
        let constraint_end = constraint_start + constraint_count;
        debug_assert!(constraint_end <= type_batch.constraint_count);
        let prestep_bundles = type_batch.prestep_data::<E::Prestep>();
        let reference_bundles = type_batch.body_references::<E::BodyReferences>();
        let mut body_indices = [0usize; MAXIMUM_BODIES_PER_CONSTRAINT];
        let body_indices = &mut body_indices[..self.body_count];
        for index in constraint_start..constraint_end {
            if !type_batch.index_to_handle[index].exists() {
                continue;
            }
            let (bundle_index, inner_index) = BundleIndexing::get_bundle_indices(index);
            let references =
                GatherScatter::as_bundles::<_, i32>(&reference_bundles[bundle_index]);
            for (body_index, reference) in body_indices.iter_mut().zip(references) {
                *body_index =
                    bodies.resolve_body_index(set_index, *GatherScatter::get(reference, inner_index));
            }
            self.extractor.extract(
                GatherScatter::offset_view(&prestep_bundles[bundle_index], inner_index),
                set_index,
                body_indices,
                bodies,
                tint,
                output,
            );
        }
    }
}
