use glam::Vec3;

use crate::physics::constraints::spring_settings::{SpringSettings, SpringSettingsWide};
use crate::utilities::gather_scatter::{BundleLayout, GatherScatter};
use crate::utilities::vector::Vector;
use crate::utilities::vector3_wide::Vector3Wide;

/// A single contact of a convex manifold in scalar form.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConstraintContactData {
    /// Offset from the center of body A to the contact position.
    pub offset_a: Vec3,
    /// Penetration depth along the manifold normal. Negative values are speculative.
    pub penetration_depth: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ConvexContactWide {
    pub offset_a: Vector3Wide,
    pub depth: Vector<f32>,
}

unsafe impl BundleLayout for ConvexContactWide {}

impl ConvexContactWide {
    #[inline(always)]
    pub fn write_slot(&mut self, source: &ConstraintContactData, inner_index: usize) {
        self.offset_a.write_slot(source.offset_a, inner_index);
        *GatherScatter::get_mut(&mut self.depth, inner_index) = source.penetration_depth;
    }

    #[inline(always)]
    pub fn read_slot(&self, inner_index: usize) -> ConstraintContactData {
        ConstraintContactData {
            offset_a: self.offset_a.read_slot(inner_index),
            penetration_depth: *GatherScatter::get(&self.depth, inner_index),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialPropertiesWide {
    pub friction_coefficient: Vector<f32>,
    pub spring_settings: SpringSettingsWide,
    pub maximum_recovery_velocity: Vector<f32>,
}

unsafe impl BundleLayout for MaterialPropertiesWide {}

impl MaterialPropertiesWide {
    #[inline(always)]
    pub fn write_slot(
        &mut self,
        friction_coefficient: f32,
        spring_settings: &SpringSettings,
        maximum_recovery_velocity: f32,
        inner_index: usize,
    ) {
        *GatherScatter::get_mut(&mut self.friction_coefficient, inner_index) = friction_coefficient;
        self.spring_settings.write_slot(spring_settings, inner_index);
        *GatherScatter::get_mut(&mut self.maximum_recovery_velocity, inner_index) =
            maximum_recovery_velocity;
    }

    /// Reads friction, spring settings and maximum recovery velocity of a lane.
    #[inline(always)]
    pub fn read_slot(&self, inner_index: usize) -> (f32, SpringSettings, f32) {
        (
            *GatherScatter::get(&self.friction_coefficient, inner_index),
            self.spring_settings.read_slot(inner_index),
            *GatherScatter::get(&self.maximum_recovery_velocity, inner_index),
        )
    }
}
