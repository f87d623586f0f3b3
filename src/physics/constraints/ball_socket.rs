use glam::Vec3;

use crate::physics::constraints::body_references::TwoBodyReferences;
use crate::physics::constraints::constraint_checker::ConstraintChecker;
use crate::physics::constraints::constraint_description::ConstraintDescription;
use crate::physics::constraints::spring_settings::{SpringSettings, SpringSettingsWide};
use crate::utilities::gather_scatter::BundleLayout;
use crate::utilities::vector3_wide::Vector3Wide;

/// Constrains a point on one body to a point on another body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSocket {
    /// Offset from the center of body A to its attachment in A's local space.
    pub local_offset_a: Vec3,
    /// Offset from the center of body B to its attachment in B's local space.
    pub local_offset_b: Vec3,
    /// Spring frequency and damping parameters.
    pub spring_settings: SpringSettings,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct BallSocketPrestepData {
    pub local_offset_a: Vector3Wide,
    pub local_offset_b: Vector3Wide,
    pub spring_settings: SpringSettingsWide,
}

unsafe impl BundleLayout for BallSocketPrestepData {}

impl ConstraintDescription for BallSocket {
    const TYPE_ID: usize = 22;
    type Prestep = BallSocketPrestepData;
    type BodyReferences = TwoBodyReferences;

    fn apply_description(&self, prestep: &mut BallSocketPrestepData, inner_index: usize) {
        ConstraintChecker::assert_valid_spring_settings(&self.spring_settings, "BallSocket");
        prestep.local_offset_a.write_slot(self.local_offset_a, inner_index);
        prestep.local_offset_b.write_slot(self.local_offset_b, inner_index);
        prestep.spring_settings.write_slot(&self.spring_settings, inner_index);
    }

    fn build_description(prestep: &BallSocketPrestepData, inner_index: usize) -> Self {
        Self {
            local_offset_a: prestep.local_offset_a.read_slot(inner_index),
            local_offset_b: prestep.local_offset_b.read_slot(inner_index),
            spring_settings: prestep.spring_settings.read_slot(inner_index),
        }
    }
}
