use glam::Vec3;

use crate::physics::constraints::body_references::TwoBodyReferences;
use crate::physics::constraints::constraint_checker::ConstraintChecker;
use crate::physics::constraints::constraint_description::ConstraintDescription;
use crate::physics::constraints::spring_settings::{SpringSettings, SpringSettingsWide};
use crate::utilities::gather_scatter::{BundleLayout, GatherScatter};
use crate::utilities::vector::Vector;
use crate::utilities::vector3_wide::Vector3Wide;

/// Constrains points on two bodies to be separated by a distance within a range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceLimit {
    /// Local offset from the center of body A to its attachment point.
    pub local_offset_a: Vec3,
    /// Local offset from the center of body B to its attachment point.
    pub local_offset_b: Vec3,
    /// Minimum distance permitted between the point on A and the point on B.
    pub minimum_distance: f32,
    /// Maximum distance permitted between the point on A and the point on B.
    pub maximum_distance: f32,
    pub spring_settings: SpringSettings,
}

impl DistanceLimit {
    pub fn new(
        local_offset_a: Vec3,
        local_offset_b: Vec3,
        minimum_distance: f32,
        maximum_distance: f32,
        spring_settings: SpringSettings,
    ) -> Self {
        Self {
            local_offset_a,
            local_offset_b,
            minimum_distance,
            maximum_distance,
            spring_settings,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct DistanceLimitPrestepData {
    pub local_offset_a: Vector3Wide,
    pub local_offset_b: Vector3Wide,
    pub minimum_distance: Vector<f32>,
    pub maximum_distance: Vector<f32>,
    pub spring_settings: SpringSettingsWide,
}

unsafe impl BundleLayout for DistanceLimitPrestepData {}

impl ConstraintDescription for DistanceLimit {
    const TYPE_ID: usize = 34;
    type Prestep = DistanceLimitPrestepData;
    type BodyReferences = TwoBodyReferences;

    fn apply_description(&self, prestep: &mut DistanceLimitPrestepData, inner_index: usize) {
        debug_assert!(
            ConstraintChecker::is_nonnegative_number(self.minimum_distance)
                && self.maximum_distance >= self.minimum_distance,
            "DistanceLimit requires 0 <= minimum_distance <= maximum_distance."
        );
        ConstraintChecker::assert_valid_spring_settings(&self.spring_settings, "DistanceLimit");
        prestep.local_offset_a.write_slot(self.local_offset_a, inner_index);
        prestep.local_offset_b.write_slot(self.local_offset_b, inner_index);
        *GatherScatter::get_mut(&mut prestep.minimum_distance, inner_index) = self.minimum_distance;
        *GatherScatter::get_mut(&mut prestep.maximum_distance, inner_index) = self.maximum_distance;
        prestep.spring_settings.write_slot(&self.spring_settings, inner_index);
    }

    fn build_description(prestep: &DistanceLimitPrestepData, inner_index: usize) -> Self {
        Self {
            local_offset_a: prestep.local_offset_a.read_slot(inner_index),
            local_offset_b: prestep.local_offset_b.read_slot(inner_index),
            minimum_distance: *GatherScatter::get(&prestep.minimum_distance, inner_index),
            maximum_distance: *GatherScatter::get(&prestep.maximum_distance, inner_index),
            spring_settings: prestep.spring_settings.read_slot(inner_index),
        }
    }
}
