use glam::{Quat, Vec3};

/// Represents a rigid transformation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidPose {
    /// Orientation of the pose.
    pub orientation: Quat,
    /// Position of the pose.
    pub position: Vec3,
}

impl RigidPose {
    pub const IDENTITY: Self = Self {
        orientation: Quat::IDENTITY,
        position: Vec3::ZERO,
    };

    #[inline(always)]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            orientation,
            position,
        }
    }

    #[inline(always)]
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Transforms a point from the pose's local space into world space.
    #[inline(always)]
    pub fn transform(&self, local_point: Vec3) -> Vec3 {
        self.position + self.orientation * local_point
    }
}

impl Default for RigidPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Location of a body in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyMemoryLocation {
    /// Index of the set owning the body reference. 0 = awake, >0 = sleeping island.
    pub set_index: usize,
    /// Index of the body within its owning set.
    pub index: usize,
}
