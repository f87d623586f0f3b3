/// Unique identifier of a body, stable across moves between sets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub i32);

/// Unique identifier of a constraint. Negative values mark empty slots in a type batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ConstraintHandle(pub i32);

impl ConstraintHandle {
    /// Marker stored in type batch slots that hold no constraint.
    pub const EMPTY: Self = Self(-1);

    #[inline(always)]
    pub fn exists(self) -> bool {
        self.0 >= 0
    }
}

impl std::fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "BodyHandle<{}>", self.0)
    }
}

impl std::fmt::Display for ConstraintHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "ConstraintHandle<{}>", self.0)
    }
}
