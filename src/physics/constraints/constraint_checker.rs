use glam::Vec3;

use crate::physics::constraints::servo_settings::ServoSettings;
use crate::physics::constraints::spring_settings::SpringSettings;

/// Validation helpers for constraint descriptions. The assertions compile away in release builds.
pub struct ConstraintChecker;

impl ConstraintChecker {
    /// Checks if a value is neither infinite nor NaN.
    #[inline(always)]
    pub fn is_finite_number(value: f32) -> bool {
        value.is_finite()
    }

    #[inline(always)]
    pub fn is_positive_number(value: f32) -> bool {
        value.is_finite() && value > 0.0
    }

    #[inline(always)]
    pub fn is_nonnegative_number(value: f32) -> bool {
        value.is_finite() && value >= 0.0
    }

    #[inline(always)]
    pub fn assert_valid_spring_settings(settings: &SpringSettings, type_name: &str) {
        debug_assert!(
            Self::is_positive_number(settings.angular_frequency)
                && Self::is_nonnegative_number(settings.twice_damping_ratio),
            "{type_name}.spring_settings must have positive frequency and nonnegative damping ratio."
        );
    }

    #[inline(always)]
    pub fn assert_valid_servo_settings(settings: &ServoSettings, type_name: &str) {
        debug_assert!(
            Self::is_nonnegative_number(settings.maximum_speed)
                && Self::is_nonnegative_number(settings.base_speed)
                && settings.maximum_force >= 0.0
                && !settings.maximum_force.is_nan(),
            "{type_name}.servo_settings must have nonnegative speeds and force."
        );
    }

    #[inline(always)]
    pub fn assert_unit_length(v: Vec3, type_name: &str, property_name: &str) {
        debug_assert!(
            (v.length_squared() - 1.0).abs() <= 1e-5,
            "{type_name}.{property_name} must be unit length."
        );
    }
}
