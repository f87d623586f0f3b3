pub mod bodies;
pub mod body_properties;
pub mod constraint_batch;
pub mod constraint_location;
pub mod constraint_set;
pub mod constraints;
pub mod handles;
pub mod solver;

pub use self::bodies::Bodies;
pub use self::body_properties::RigidPose;
pub use self::constraint_batch::ConstraintBatch;
pub use self::constraint_location::ConstraintLocation;
pub use self::constraint_set::ConstraintSet;
pub use self::handles::{BodyHandle, ConstraintHandle};
pub use self::solver::Solver;
