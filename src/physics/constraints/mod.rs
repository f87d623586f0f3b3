pub mod ball_socket;
pub mod body_references;
pub mod center_distance_constraint;
pub mod constraint_checker;
pub mod constraint_description;
pub mod contact;
pub mod distance_limit;
pub mod one_body_linear_servo;
pub mod servo_settings;
pub mod spring_settings;
pub mod type_batch;

pub use self::ball_socket::{BallSocket, BallSocketPrestepData};
pub use self::body_references::{OneBodyReferences, TwoBodyReferences};
pub use self::center_distance_constraint::{CenterDistanceConstraint, CenterDistancePrestepData};
pub use self::constraint_description::ConstraintDescription;
pub use self::distance_limit::{DistanceLimit, DistanceLimitPrestepData};
pub use self::one_body_linear_servo::{OneBodyLinearServo, OneBodyLinearServoPrestepData};
pub use self::servo_settings::{ServoSettings, ServoSettingsWide};
pub use self::spring_settings::{SpringSettings, SpringSettingsWide};
pub use self::type_batch::TypeBatch;
