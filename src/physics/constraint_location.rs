/// Location of a constraint in the solver's memory.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ConstraintLocation {
    /// Index of the constraint set that owns the constraint. Zero means the constraint is awake.
    pub set_index: usize,
    /// Index of the constraint batch the constraint belongs to.
    pub batch_index: usize,
    /// Type id of the constraint. Used to find the type batch within the constraint batch.
    pub type_id: usize,
    /// Index of the constraint in a type batch.
    pub index_in_type_batch: usize,
}
