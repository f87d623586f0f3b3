use crate::physics::constraint_batch::ConstraintBatch;

/// Constraints owned by one body set: the awake constraints, or those of a sleeping island.
#[derive(Clone, Default)]
pub struct ConstraintSet {
    pub batches: Vec<ConstraintBatch>,
    allocated: bool,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self {
            batches: Vec::new(),
            allocated: true,
        }
    }

    /// Gets whether the set is in use. Unallocated slots exist where islands were removed.
    #[inline(always)]
    pub fn allocated(&self) -> bool {
        self.allocated
    }

    /// Gets the batch at `batch_index`, creating empty batches up to it if needed.
    pub fn get_or_create_batch(&mut self, batch_index: usize) -> &mut ConstraintBatch {
        if batch_index >= self.batches.len() {
            self.batches.resize_with(batch_index + 1, ConstraintBatch::new);
        }
        &mut self.batches[batch_index]
    }

    /// Number of constraint slots in the set, holes included.
    pub fn constraint_count(&self) -> usize {
        self.batches.iter().map(ConstraintBatch::constraint_count).sum()
    }

    /// Releases the set's batches and marks it unallocated.
    pub fn clear(&mut self) {
        self.batches.clear();
        self.allocated = false;
    }
}
