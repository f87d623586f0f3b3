use crate::utilities::gather_scatter::{BundleLayout, GatherScatter};
use crate::utilities::vector::Vector;

/// Describes how quickly and strongly a servo constraint should move towards a position target.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServoSettings {
    /// Maximum speed that the constraint can try to use to move towards the target.
    pub maximum_speed: f32,
    /// Minimum speed that the constraint will try to use to move towards the target.
    pub base_speed: f32,
    /// The maximum force that the constraint can apply to move towards the target.
    pub maximum_force: f32,
}

impl ServoSettings {
    /// A servo with unlimited force and speed and no base speed, behaving like a position constraint.
    pub const DEFAULT: Self = Self {
        maximum_speed: f32::MAX,
        base_speed: 0.0,
        maximum_force: f32::MAX,
    };

    pub fn new(maximum_speed: f32, base_speed: f32, maximum_force: f32) -> Self {
        Self {
            maximum_speed,
            base_speed,
            maximum_force,
        }
    }
}

impl Default for ServoSettings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ServoSettingsWide {
    pub maximum_speed: Vector<f32>,
    pub base_speed: Vector<f32>,
    pub maximum_force: Vector<f32>,
}

unsafe impl BundleLayout for ServoSettingsWide {}

impl ServoSettingsWide {
    #[inline(always)]
    pub fn write_slot(&mut self, source: &ServoSettings, inner_index: usize) {
        *GatherScatter::get_mut(&mut self.maximum_speed, inner_index) = source.maximum_speed;
        *GatherScatter::get_mut(&mut self.base_speed, inner_index) = source.base_speed;
        *GatherScatter::get_mut(&mut self.maximum_force, inner_index) = source.maximum_force;
    }

    #[inline(always)]
    pub fn read_slot(&self, inner_index: usize) -> ServoSettings {
        ServoSettings {
            maximum_speed: *GatherScatter::get(&self.maximum_speed, inner_index),
            base_speed: *GatherScatter::get(&self.base_speed, inner_index),
            maximum_force: *GatherScatter::get(&self.maximum_force, inner_index),
        }
    }
}
