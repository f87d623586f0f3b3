use std::mem::size_of;

use crate::physics::constraints::constraint_description::ConstraintDescription;
use crate::physics::handles::ConstraintHandle;
use crate::utilities::bundle_indexing::BundleIndexing;
use crate::utilities::gather_scatter::{BundleLayout, GatherScatter, BUNDLE_SIZE};
use crate::utilities::memory::buffer::RawBuffer;
use crate::utilities::vector::VECTOR_WIDTH;

/// Stores the raw AOSOA formatted data associated with constraints of one type.
///
/// The data is stored untyped; readers pick the record type that matches `type_id`.
#[derive(Clone)]
pub struct TypeBatch {
    pub body_references: RawBuffer,
    pub prestep_data: RawBuffer,
    /// Handle of the constraint in each slot. Holes left by removals hold `ConstraintHandle::EMPTY`.
    pub index_to_handle: Vec<ConstraintHandle>,
    pub constraint_count: usize,
    pub type_id: usize,
}

#[inline(always)]
fn bundles_per_record<T>() -> usize {
    size_of::<T>() / BUNDLE_SIZE
}

impl TypeBatch {
    /// Creates an empty batch for constraints described by `D`, with room for at least
    /// `initial_capacity` constraints.
    pub fn new<D: ConstraintDescription>(initial_capacity: usize) -> Self {
        let bundle_capacity = BundleIndexing::get_bundle_count(initial_capacity).max(1);
        Self {
            body_references: RawBuffer::new(bundle_capacity * bundles_per_record::<D::BodyReferences>()),
            prestep_data: RawBuffer::new(bundle_capacity * bundles_per_record::<D::Prestep>()),
            index_to_handle: vec![ConstraintHandle::EMPTY; bundle_capacity * VECTOR_WIDTH],
            constraint_count: 0,
            type_id: D::TYPE_ID,
        }
    }

    /// Returns the capacity of the type batch in terms of individual constraints.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.index_to_handle.len()
    }

    #[inline(always)]
    pub fn bundle_count(&self) -> usize {
        BundleIndexing::get_bundle_count(self.constraint_count)
    }

    /// Prestep bundles covering the batch's constraints.
    #[inline(always)]
    pub fn prestep_data<T: BundleLayout>(&self) -> &[T] {
        &self.prestep_data.as_slice::<T>()[..self.bundle_count()]
    }

    #[inline(always)]
    pub fn prestep_data_mut<T: BundleLayout>(&mut self) -> &mut [T] {
        let bundle_count = self.bundle_count();
        &mut self.prestep_data.as_mut_slice::<T>()[..bundle_count]
    }

    /// Body reference bundles covering the batch's constraints.
    #[inline(always)]
    pub fn body_references<T: BundleLayout>(&self) -> &[T] {
        &self.body_references.as_slice::<T>()[..self.bundle_count()]
    }

    #[inline(always)]
    pub fn body_references_mut<T: BundleLayout>(&mut self) -> &mut [T] {
        let bundle_count = self.bundle_count();
        &mut self.body_references.as_mut_slice::<T>()[..bundle_count]
    }

    fn resize<D: ConstraintDescription>(&mut self, bundle_capacity: usize) {
        self.body_references
            .resize(bundle_capacity * bundles_per_record::<D::BodyReferences>());
        self.prestep_data
            .resize(bundle_capacity * bundles_per_record::<D::Prestep>());
        self.index_to_handle
            .resize(bundle_capacity * VECTOR_WIDTH, ConstraintHandle::EMPTY);
    }

    /// Appends a constraint to the batch and returns its index.
    ///
    /// `encoded_body_references` holds one encoded reference per body of the constraint.
    pub fn add<D: ConstraintDescription>(
        &mut self,
        handle: ConstraintHandle,
        description: &D,
        encoded_body_references: &[i32],
    ) -> usize {
        debug_assert_eq!(self.type_id, D::TYPE_ID, "Description does not match the batch type.");
        debug_assert_eq!(encoded_body_references.len(), bundles_per_record::<D::BodyReferences>());
        if self.constraint_count == self.capacity() {
            let bundle_capacity = BundleIndexing::get_bundle_count(self.capacity()).max(1) * 2;
            self.resize::<D>(bundle_capacity);
        }
        let index = self.constraint_count;
        self.constraint_count += 1;
        let (bundle_index, inner_index) = BundleIndexing::get_bundle_indices(index);
        description.apply_description(
            &mut self.prestep_data_mut::<D::Prestep>()[bundle_index],
            inner_index,
        );
        let references = &mut self.body_references_mut::<D::BodyReferences>()[bundle_index];
        GatherScatter::set_lane(
            GatherScatter::as_bundles_mut::<_, i32>(references),
            inner_index,
            encoded_body_references,
        );
        self.index_to_handle[index] = handle;
        index
    }

    /// Turns a slot into a hole: the handle is cleared and the slot's lanes are zeroed.
    /// The constraint count is unchanged.
    pub fn remove_at<D: ConstraintDescription>(&mut self, index: usize) {
        debug_assert!(index < self.constraint_count);
        let (bundle_index, inner_index) = BundleIndexing::get_bundle_indices(index);
        GatherScatter::clear_lane(
            &mut self.prestep_data_mut::<D::Prestep>()[bundle_index],
            inner_index,
        );
        GatherScatter::clear_lane(
            &mut self.body_references_mut::<D::BodyReferences>()[bundle_index],
            inner_index,
        );
        self.index_to_handle[index] = ConstraintHandle::EMPTY;
    }

    /// Reads back the description of the constraint at `index`.
    pub fn description_at<D: ConstraintDescription>(&self, index: usize) -> D {
        debug_assert_eq!(self.type_id, D::TYPE_ID);
        let (bundle_index, inner_index) = BundleIndexing::get_bundle_indices(index);
        D::build_description(&self.prestep_data::<D::Prestep>()[bundle_index], inner_index)
    }

    /// Copies the encoded body references of the constraint at `index` into `references`.
    pub fn body_references_at<D: ConstraintDescription>(&self, index: usize, references: &mut [i32]) {
        let (bundle_index, inner_index) = BundleIndexing::get_bundle_indices(index);
        let bundle = &self.body_references::<D::BodyReferences>()[bundle_index];
        GatherScatter::get_lane(GatherScatter::as_bundles::<_, i32>(bundle), inner_index, references);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::constraints::center_distance_constraint::CenterDistanceConstraint;
    use crate::physics::constraints::spring_settings::SpringSettings;

    fn description(i: usize) -> CenterDistanceConstraint {
        CenterDistanceConstraint::new(i as f32, SpringSettings::new(5.0, 1.0))
    }

    #[test]
    fn add_grows_and_keeps_existing_lanes() {
        let mut batch = TypeBatch::new::<CenterDistanceConstraint>(1);
        let count = VECTOR_WIDTH * 3 + 1;
        for i in 0..count {
            let index = batch.add(ConstraintHandle(i as i32), &description(i), &[i as i32, -(i as i32)]);
            assert_eq!(index, i);
        }
        assert_eq!(batch.constraint_count, count);
        assert_eq!(batch.bundle_count(), 4);
        assert!(batch.capacity() >= count);
        for i in 0..count {
            assert_eq!(batch.description_at::<CenterDistanceConstraint>(i), description(i));
            let mut references = [0; 2];
            batch.body_references_at::<CenterDistanceConstraint>(i, &mut references);
            assert_eq!(references, [i as i32, -(i as i32)]);
            assert_eq!(batch.index_to_handle[i], ConstraintHandle(i as i32));
        }
    }

    #[test]
    fn removal_leaves_a_hole() {
        let mut batch = TypeBatch::new::<CenterDistanceConstraint>(4);
        for i in 0..3 {
            batch.add(ConstraintHandle(i as i32), &description(i + 1), &[0, 1]);
        }
        batch.remove_at::<CenterDistanceConstraint>(1);
        assert_eq!(batch.constraint_count, 3);
        assert!(!batch.index_to_handle[1].exists());
        assert_eq!(batch.description_at::<CenterDistanceConstraint>(1).target_distance, 0.0);
        assert_eq!(batch.description_at::<CenterDistanceConstraint>(2), description(3));
    }
}
