use std::f32::consts::TAU;

use crate::utilities::gather_scatter::{BundleLayout, GatherScatter};
use crate::utilities::vector::Vector;

/// SIMD-wide spring settings.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct SpringSettingsWide {
    pub angular_frequency: Vector<f32>,
    pub twice_damping_ratio: Vector<f32>,
}

unsafe impl BundleLayout for SpringSettingsWide {}

impl SpringSettingsWide {
    #[inline(always)]
    pub fn write_slot(&mut self, source: &SpringSettings, inner_index: usize) {
        *GatherScatter::get_mut(&mut self.angular_frequency, inner_index) = source.angular_frequency;
        *GatherScatter::get_mut(&mut self.twice_damping_ratio, inner_index) =
            source.twice_damping_ratio;
    }

    #[inline(always)]
    pub fn read_slot(&self, inner_index: usize) -> SpringSettings {
        SpringSettings {
            angular_frequency: *GatherScatter::get(&self.angular_frequency, inner_index),
            twice_damping_ratio: *GatherScatter::get(&self.twice_damping_ratio, inner_index),
        }
    }
}

/// Scalar spring settings describing the frequency and damping of a springy constraint.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpringSettings {
    /// Target number of undamped oscillations per unit of time, scaled by 2 * PI.
    pub angular_frequency: f32,
    /// Twice the ratio of the spring's actual damping to its critical damping.
    pub twice_damping_ratio: f32,
}

impl SpringSettings {
    pub fn new(frequency: f32, damping_ratio: f32) -> Self {
        Self {
            angular_frequency: frequency * TAU,
            twice_damping_ratio: damping_ratio * 2.0,
        }
    }

    #[inline(always)]
    pub fn frequency(&self) -> f32 {
        self.angular_frequency / TAU
    }

    #[inline(always)]
    pub fn damping_ratio(&self) -> f32 {
        self.twice_damping_ratio / 2.0
    }
}
