pub mod contact_convex_common;
pub mod contact_convex_types;

pub use self::contact_convex_common::{ConstraintContactData, ConvexContactWide, MaterialPropertiesWide};
pub use self::contact_convex_types::{
    Contact1, Contact1OneBody, Contact1OneBodyPrestepData, Contact1PrestepData,
};

/// Number of constraint type ids reserved for contact manifolds. Contact types occupy `0..COUNT`.
pub const COLLISION_CONSTRAINT_TYPE_COUNT: usize = 22;

/// Gets whether a constraint type id maps to a contact constraint.
#[inline(always)]
pub fn is_contact_constraint_type(constraint_type_id: usize) -> bool {
    constraint_type_id < COLLISION_CONSTRAINT_TYPE_COUNT
}
