use glam::Vec3;

use crate::utilities::gather_scatter::BundleLayout;
use crate::utilities::vector::Vector;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// Three dimensional vector with SIMD lanes.
pub struct Vector3Wide {
    /// First component of the vector.
    pub x: Vector<f32>,
    /// Second component of the vector.
    pub y: Vector<f32>,
    /// Third component of the vector.
    pub z: Vector<f32>,
}

unsafe impl BundleLayout for Vector3Wide {}

impl Vector3Wide {
    #[inline(always)]
    pub fn broadcast(source: Vec3) -> Self {
        Self {
            x: Vector::splat(source.x),
            y: Vector::splat(source.y),
            z: Vector::splat(source.z),
        }
    }

    #[inline(always)]
    pub fn read_slot(&self, slot_index: usize) -> Vec3 {
        Vec3::new(self.x[slot_index], self.y[slot_index], self.z[slot_index])
    }

    #[inline(always)]
    pub fn write_slot(&mut self, source: Vec3, slot_index: usize) {
        self.x[slot_index] = source.x;
        self.y[slot_index] = source.y;
        self.z[slot_index] = source.z;
    }

    #[inline(always)]
    pub fn read_first(&self) -> Vec3 {
        self.read_slot(0)
    }

    #[inline(always)]
    pub fn write_first(&mut self, source: Vec3) {
        self.write_slot(source, 0);
    }
}
