use tracing::trace;

use crate::physics::bodies::Bodies;
use crate::physics::constraint_location::ConstraintLocation;
use crate::physics::constraint_set::ConstraintSet;
use crate::physics::constraints::constraint_description::ConstraintDescription;
use crate::physics::constraints::type_batch::TypeBatch;
use crate::physics::handles::{BodyHandle, ConstraintHandle};

/// Holds every constraint set. Set 0 holds awake constraints; later slots belong to sleeping islands.
#[derive(Clone)]
pub struct Solver {
    pub sets: Vec<ConstraintSet>,
    /// Mapping from constraint handle to the location of the constraint in memory.
    pub handle_to_constraint: Vec<Option<ConstraintLocation>>,
    initial_type_batch_capacity: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(128)
    }
}

impl Solver {
    pub fn new(initial_type_batch_capacity: usize) -> Self {
        Self {
            sets: vec![ConstraintSet::new()],
            handle_to_constraint: Vec::new(),
            initial_type_batch_capacity,
        }
    }

    #[inline(always)]
    pub fn active_set(&self) -> &ConstraintSet {
        &self.sets[0]
    }

    /// Gets the set at `set_index`, allocating it and any missing sets before it.
    pub fn get_or_create_set(&mut self, set_index: usize) -> &mut ConstraintSet {
        if set_index >= self.sets.len() {
            self.sets.resize_with(set_index + 1, ConstraintSet::default);
        }
        let set = &mut self.sets[set_index];
        if !set.allocated() {
            *set = ConstraintSet::new();
        }
        set
    }

    /// Adds a constraint to the given set and batch.
    ///
    /// The bodies must already live in the body set matching `set_index`; their references are
    /// encoded the way that set expects.
    pub fn add_constraint<D: ConstraintDescription>(
        &mut self,
        set_index: usize,
        batch_index: usize,
        bodies: &Bodies,
        body_handles: &[BodyHandle],
        description: &D,
    ) -> ConstraintHandle {
        let mut encoded = [0i32; 4];
        let encoded = &mut encoded[..body_handles.len()];
        for (target, &body) in encoded.iter_mut().zip(body_handles) {
            debug_assert_eq!(bodies.get_location(body).set_index, set_index);
            *target = bodies.encode_constraint_reference(body, false);
        }
        let handle = ConstraintHandle(self.handle_to_constraint.len() as i32);
        let initial_capacity = self.initial_type_batch_capacity;
        let type_batch = self
            .get_or_create_set(set_index)
            .get_or_create_batch(batch_index)
            .get_or_create_type_batch::<D>(initial_capacity);
        let index_in_type_batch = type_batch.add(handle, description, encoded);
        self.handle_to_constraint.push(Some(ConstraintLocation {
            set_index,
            batch_index,
            type_id: D::TYPE_ID,
            index_in_type_batch,
        }));
        trace!(%handle, set_index, batch_index, type_id = D::TYPE_ID, "added constraint");
        handle
    }

    /// Removes a constraint, leaving a hole in its type batch.
    pub fn remove_constraint<D: ConstraintDescription>(&mut self, handle: ConstraintHandle) {
        let Some(location) = self
            .handle_to_constraint
            .get_mut(handle.0 as usize)
            .and_then(Option::take)
        else {
            return;
        };
        debug_assert_eq!(location.type_id, D::TYPE_ID);
        if let Some(type_batch) = self.sets[location.set_index].batches[location.batch_index]
            .get_type_batch_mut(location.type_id)
        {
            type_batch.remove_at::<D>(location.index_in_type_batch);
        }
    }

    #[inline(always)]
    pub fn get_location(&self, handle: ConstraintHandle) -> Option<ConstraintLocation> {
        self.handle_to_constraint
            .get(handle.0 as usize)
            .copied()
            .flatten()
    }

    /// Reads back a constraint's current description.
    pub fn get_description<D: ConstraintDescription>(&self, handle: ConstraintHandle) -> Option<D> {
        let location = self.get_location(handle)?;
        if location.type_id != D::TYPE_ID {
            return None;
        }
        self.type_batch(location.set_index, location.batch_index, location.type_id)
            .map(|type_batch| type_batch.description_at::<D>(location.index_in_type_batch))
    }

    /// Gets the type batch of a type id within a set and batch, if it exists.
    pub fn type_batch(&self, set_index: usize, batch_index: usize, type_id: usize) -> Option<&TypeBatch> {
        self.sets
            .get(set_index)?
            .batches
            .get(batch_index)?
            .get_type_batch(type_id)
    }

    /// Number of constraint slots in allocated sets, holes included.
    pub fn count_constraints(&self) -> usize {
        self.sets
            .iter()
            .filter(|set| set.allocated())
            .map(ConstraintSet::constraint_count)
            .sum()
    }
}
