use glam::Vec3;

use crate::physics::constraints::body_references::OneBodyReferences;
use crate::physics::constraints::constraint_checker::ConstraintChecker;
use crate::physics::constraints::constraint_description::ConstraintDescription;
use crate::physics::constraints::servo_settings::{ServoSettings, ServoSettingsWide};
use crate::physics::constraints::spring_settings::{SpringSettings, SpringSettingsWide};
use crate::utilities::gather_scatter::BundleLayout;
use crate::utilities::vector3_wide::Vector3Wide;

/// Constrains a point on a body to a target location in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneBodyLinearServo {
    /// Offset to the attachment point in the local space of the body.
    pub local_offset: Vec3,
    /// Target position.
    pub target: Vec3,
    pub servo_settings: ServoSettings,
    pub spring_settings: SpringSettings,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct OneBodyLinearServoPrestepData {
    pub local_offset: Vector3Wide,
    pub target: Vector3Wide,
    pub spring_settings: SpringSettingsWide,
    pub servo_settings: ServoSettingsWide,
}

unsafe impl BundleLayout for OneBodyLinearServoPrestepData {}

impl ConstraintDescription for OneBodyLinearServo {
    const TYPE_ID: usize = 44;
    type Prestep = OneBodyLinearServoPrestepData;
    type BodyReferences = OneBodyReferences;

    fn apply_description(&self, prestep: &mut OneBodyLinearServoPrestepData, inner_index: usize) {
        ConstraintChecker::assert_valid_spring_settings(&self.spring_settings, "OneBodyLinearServo");
        ConstraintChecker::assert_valid_servo_settings(&self.servo_settings, "OneBodyLinearServo");
        prestep.local_offset.write_slot(self.local_offset, inner_index);
        prestep.target.write_slot(self.target, inner_index);
        prestep.spring_settings.write_slot(&self.spring_settings, inner_index);
        prestep.servo_settings.write_slot(&self.servo_settings, inner_index);
    }

    fn build_description(prestep: &OneBodyLinearServoPrestepData, inner_index: usize) -> Self {
        Self {
            local_offset: prestep.local_offset.read_slot(inner_index),
            target: prestep.target.read_slot(inner_index),
            servo_settings: prestep.servo_settings.read_slot(inner_index),
            spring_settings: prestep.spring_settings.read_slot(inner_index),
        }
    }
}
