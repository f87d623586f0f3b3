use crate::physics::constraints::body_references::TwoBodyReferences;
use crate::physics::constraints::constraint_checker::ConstraintChecker;
use crate::physics::constraints::constraint_description::ConstraintDescription;
use crate::physics::constraints::spring_settings::{SpringSettings, SpringSettingsWide};
use crate::utilities::gather_scatter::{BundleLayout, GatherScatter};
use crate::utilities::vector::Vector;

/// Constrains the center of two bodies to be separated by a target distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterDistanceConstraint {
    /// Target distance between the body centers.
    pub target_distance: f32,
    pub spring_settings: SpringSettings,
}

impl CenterDistanceConstraint {
    pub fn new(target_distance: f32, spring_settings: SpringSettings) -> Self {
        Self {
            target_distance,
            spring_settings,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct CenterDistancePrestepData {
    pub target_distance: Vector<f32>,
    pub spring_settings: SpringSettingsWide,
}

unsafe impl BundleLayout for CenterDistancePrestepData {}

impl ConstraintDescription for CenterDistanceConstraint {
    const TYPE_ID: usize = 35;
    type Prestep = CenterDistancePrestepData;
    type BodyReferences = TwoBodyReferences;

    fn apply_description(&self, prestep: &mut CenterDistancePrestepData, inner_index: usize) {
        debug_assert!(
            ConstraintChecker::is_nonnegative_number(self.target_distance),
            "CenterDistanceConstraint.target_distance must be nonnegative and finite."
        );
        ConstraintChecker::assert_valid_spring_settings(
            &self.spring_settings,
            "CenterDistanceConstraint",
        );
        *GatherScatter::get_mut(&mut prestep.target_distance, inner_index) = self.target_distance;
        prestep.spring_settings.write_slot(&self.spring_settings, inner_index);
    }

    fn build_description(prestep: &CenterDistancePrestepData, inner_index: usize) -> Self {
        Self {
            target_distance: *GatherScatter::get(&prestep.target_distance, inner_index),
            spring_settings: prestep.spring_settings.read_slot(inner_index),
        }
    }
}
