use thiserror::Error;

/// Errors reported when setting up an extractor.
///
/// An extraction pass itself cannot fail: missing registrations are skipped and contract
/// violations are caught by assertions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The load balancer needs at least one job per worker.
    #[error("jobs per worker must be at least 1, got {0}")]
    InvalidJobsPerWorker(usize),

    /// Jobs must cover at least one constraint.
    #[error("maximum job size must be at least 1, got {0}")]
    InvalidMaximumJobSize(usize),

    /// Tints are multiplied into output colors and must be finite.
    #[error("{name} must be finite, got {value}")]
    InvalidTint {
        /// Which tint was rejected
        name: &'static str,
        /// The rejected value
        value: glam::Vec3,
    },
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
