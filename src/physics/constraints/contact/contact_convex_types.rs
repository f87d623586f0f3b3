use glam::Vec3;

use crate::physics::constraints::body_references::{OneBodyReferences, TwoBodyReferences};
use crate::physics::constraints::constraint_checker::ConstraintChecker;
use crate::physics::constraints::constraint_description::ConstraintDescription;
use crate::physics::constraints::contact::contact_convex_common::{
    ConstraintContactData, ConvexContactWide, MaterialPropertiesWide,
};
use crate::physics::constraints::spring_settings::SpringSettings;
use crate::utilities::gather_scatter::BundleLayout;
use crate::utilities::vector3_wide::Vector3Wide;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct Contact1OneBodyPrestepData {
    pub contact0: ConvexContactWide,
    pub normal: Vector3Wide,
    pub material_properties: MaterialPropertiesWide,
}

unsafe impl BundleLayout for Contact1OneBodyPrestepData {}

/// One-contact manifold between a body and static geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Contact1OneBody {
    pub contact0: ConstraintContactData,
    /// Manifold normal pointing from the static side to the body.
    pub normal: Vec3,
    pub friction_coefficient: f32,
    pub spring_settings: SpringSettings,
    pub maximum_recovery_velocity: f32,
}

impl ConstraintDescription for Contact1OneBody {
    const TYPE_ID: usize = 0;
    type Prestep = Contact1OneBodyPrestepData;
    type BodyReferences = OneBodyReferences;

    fn apply_description(&self, prestep: &mut Contact1OneBodyPrestepData, inner_index: usize) {
        ConstraintChecker::assert_unit_length(self.normal, "Contact1OneBody", "normal");
        prestep.contact0.write_slot(&self.contact0, inner_index);
        prestep.normal.write_slot(self.normal, inner_index);
        prestep.material_properties.write_slot(
            self.friction_coefficient,
            &self.spring_settings,
            self.maximum_recovery_velocity,
            inner_index,
        );
    }

    fn build_description(prestep: &Contact1OneBodyPrestepData, inner_index: usize) -> Self {
        let (friction_coefficient, spring_settings, maximum_recovery_velocity) =
            prestep.material_properties.read_slot(inner_index);
        Self {
            contact0: prestep.contact0.read_slot(inner_index),
            normal: prestep.normal.read_slot(inner_index),
            friction_coefficient,
            spring_settings,
            maximum_recovery_velocity,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct Contact1PrestepData {
    pub contact0: ConvexContactWide,
    pub offset_b: Vector3Wide,
    pub normal: Vector3Wide,
    pub material_properties: MaterialPropertiesWide,
}

unsafe impl BundleLayout for Contact1PrestepData {}

/// One-contact manifold between two bodies.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Contact1 {
    pub contact0: ConstraintContactData,
    /// Offset from the center of body A to the center of body B.
    pub offset_b: Vec3,
    /// Manifold normal pointing from B to A.
    pub normal: Vec3,
    pub friction_coefficient: f32,
    pub spring_settings: SpringSettings,
    pub maximum_recovery_velocity: f32,
}

impl ConstraintDescription for Contact1 {
    const TYPE_ID: usize = 4;
    type Prestep = Contact1PrestepData;
    type BodyReferences = TwoBodyReferences;

    fn apply_description(&self, prestep: &mut Contact1PrestepData, inner_index: usize) {
        ConstraintChecker::assert_unit_length(self.normal, "Contact1", "normal");
        prestep.contact0.write_slot(&self.contact0, inner_index);
        prestep.offset_b.write_slot(self.offset_b, inner_index);
        prestep.normal.write_slot(self.normal, inner_index);
        prestep.material_properties.write_slot(
            self.friction_coefficient,
            &self.spring_settings,
            self.maximum_recovery_velocity,
            inner_index,
        );
    }

    fn build_description(prestep: &Contact1PrestepData, inner_index: usize) -> Self {
        let (friction_coefficient, spring_settings, maximum_recovery_velocity) =
            prestep.material_properties.read_slot(inner_index);
        Self {
            contact0: prestep.contact0.read_slot(inner_index),
            offset_b: prestep.offset_b.read_slot(inner_index),
            normal: prestep.normal.read_slot(inner_index),
            friction_coefficient,
            spring_settings,
            maximum_recovery_velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::gather_scatter::GatherScatter;
    use crate::utilities::vector::VECTOR_WIDTH;

    #[test]
    fn description_survives_the_last_lane() {
        let description = Contact1 {
            contact0: ConstraintContactData {
                offset_a: Vec3::new(0.5, -1.0, 0.0),
                penetration_depth: -0.01,
            },
            offset_b: Vec3::new(0.0, 2.0, 0.0),
            normal: Vec3::Y,
            friction_coefficient: 0.8,
            spring_settings: SpringSettings::new(30.0, 1.0),
            maximum_recovery_velocity: 2.0,
        };
        let mut prestep = GatherScatter::zeroed::<Contact1PrestepData>();
        let lane = VECTOR_WIDTH - 1;
        description.apply_description(&mut prestep, lane);
        assert_eq!(Contact1::build_description(&prestep, lane), description);
        assert_eq!(Contact1::build_description(&prestep, 0).normal, Vec3::ZERO);
    }
}
