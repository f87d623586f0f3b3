use crate::physics::body_properties::{BodyMemoryLocation, RigidPose};
use crate::physics::handles::BodyHandle;

/// Stores a group of bodies: either the set of active bodies, or the bodies of an inactive island.
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    /// Remaps a body index to its handle.
    pub index_to_handle: Vec<BodyHandle>,
    /// Pose of each body in the set.
    pub poses: Vec<RigidPose>,
}

impl BodySet {
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.poses.len()
    }
}

/// Collection of all allocated bodies, used by extraction passes to look up body poses.
#[derive(Debug, Clone)]
pub struct Bodies {
    /// Remaps a body handle integer value to the actual array index of the body.
    pub handle_to_location: Vec<BodyMemoryLocation>,
    /// The set of existing bodies. Slot 0 holds active bodies, later slots hold inactive islands.
    pub sets: Vec<BodySet>,
}

impl Default for Bodies {
    fn default() -> Self {
        Self::new()
    }
}

impl Bodies {
    pub const DOESNT_EXIST_FLAG_INDEX: u32 = 31;
    pub const KINEMATIC_FLAG_INDEX: u32 = 30;
    pub const KINEMATIC_MASK: u32 = 1 << Self::KINEMATIC_FLAG_INDEX;
    pub const BODY_REFERENCE_METADATA_MASK: u32 =
        (1 << Self::DOESNT_EXIST_FLAG_INDEX) | Self::KINEMATIC_MASK;
    /// Mask that strips metadata flags from an encoded body reference.
    pub const BODY_REFERENCE_MASK: i32 = !(Self::BODY_REFERENCE_METADATA_MASK as i32);

    pub fn new() -> Self {
        Self {
            handle_to_location: Vec::new(),
            sets: vec![BodySet::default()],
        }
    }

    #[inline(always)]
    pub fn active_set(&self) -> &BodySet {
        &self.sets[0]
    }

    /// Adds an awake body.
    pub fn add(&mut self, pose: RigidPose) -> BodyHandle {
        self.add_to_set(0, pose)
    }

    /// Adds a body to the given set, creating empty sets up to it if needed.
    pub fn add_to_set(&mut self, set_index: usize, pose: RigidPose) -> BodyHandle {
        if set_index >= self.sets.len() {
            self.sets.resize_with(set_index + 1, BodySet::default);
        }
        let handle = BodyHandle(self.handle_to_location.len() as i32);
        let set = &mut self.sets[set_index];
        let index = set.count();
        set.index_to_handle.push(handle);
        set.poses.push(pose);
        self.handle_to_location
            .push(BodyMemoryLocation { set_index, index });
        handle
    }

    #[inline(always)]
    pub fn get_location(&self, handle: BodyHandle) -> BodyMemoryLocation {
        self.handle_to_location[handle.0 as usize]
    }

    #[inline(always)]
    pub fn get_pose(&self, set_index: usize, body_index: usize) -> &RigidPose {
        &self.sets[set_index].poses[body_index]
    }

    #[inline(always)]
    pub fn get_pose_by_handle(&self, handle: BodyHandle) -> &RigidPose {
        let location = self.get_location(handle);
        self.get_pose(location.set_index, location.index)
    }

    /// Encodes a body the way a constraint in the body's own set refers to it.
    ///
    /// Active constraints refer to body indices directly; inactive constraints store handles since
    /// islands are moved around as a whole.
    pub fn encode_constraint_reference(&self, handle: BodyHandle, kinematic: bool) -> i32 {
        let location = self.get_location(handle);
        let reference = if location.set_index == 0 {
            location.index as i32
        } else {
            handle.0
        };
        if kinematic {
            reference | Self::KINEMATIC_MASK as i32
        } else {
            reference
        }
    }

    /// Turns a constraint's encoded body reference into an index within the constraint's body set.
    #[inline(always)]
    pub fn resolve_body_index(&self, set_index: usize, encoded_body_reference: i32) -> usize {
        let reference = (encoded_body_reference & Self::BODY_REFERENCE_MASK) as usize;
        if set_index == 0 {
            reference
        } else {
            let location = self.handle_to_location[reference];
            debug_assert_eq!(
                location.set_index, set_index,
                "Inactive constraints should only refer to bodies in their own island."
            );
            location.index
        }
    }
}
