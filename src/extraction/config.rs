use glam::Vec3;

use crate::extraction::error::{ExtractionError, Result};

/// Tuning knobs of an extraction pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractorConfig {
    /// How many jobs each worker should get on average; drives the split target.
    pub jobs_per_worker: usize,
    /// Upper bound on constraints per job after splitting.
    pub maximum_job_size: usize,
    /// Tint handed to extractors for awake constraints.
    pub active_tint: Vec3,
    /// Tint handed to extractors for constraints in sleeping islands.
    pub inactive_tint: Vec3,
    /// Initial capacity of the pooled job list.
    pub initial_job_capacity: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            jobs_per_worker: 4,
            maximum_job_size: 32,
            active_tint: Vec3::ONE,
            inactive_tint: Vec3::new(0.4, 0.4, 0.8),
            initial_job_capacity: 64,
        }
    }
}

impl ExtractorConfig {
    pub fn with_jobs_per_worker(mut self, jobs_per_worker: usize) -> Self {
        self.jobs_per_worker = jobs_per_worker;
        self
    }

    pub fn with_maximum_job_size(mut self, maximum_job_size: usize) -> Self {
        self.maximum_job_size = maximum_job_size;
        self
    }

    pub fn with_tints(mut self, active_tint: Vec3, inactive_tint: Vec3) -> Self {
        self.active_tint = active_tint;
        self.inactive_tint = inactive_tint;
        self
    }

    pub fn with_initial_job_capacity(mut self, initial_job_capacity: usize) -> Self {
        self.initial_job_capacity = initial_job_capacity;
        self
    }

    /// Tint for constraints in the given set.
    #[inline(always)]
    pub fn tint_for_set(&self, set_index: usize) -> Vec3 {
        if set_index == 0 {
            self.active_tint
        } else {
            self.inactive_tint
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs_per_worker == 0 {
            return Err(ExtractionError::InvalidJobsPerWorker(self.jobs_per_worker));
        }
        if self.maximum_job_size == 0 {
            return Err(ExtractionError::InvalidMaximumJobSize(self.maximum_job_size));
        }
        for (name, value) in [
            ("active_tint", self.active_tint),
            ("inactive_tint", self.inactive_tint),
        ] {
            if !value.is_finite() {
                return Err(ExtractionError::InvalidTint { name, value });
            }
        }
        Ok(())
    }
}
