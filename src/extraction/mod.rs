pub mod accumulator;
pub mod config;
pub mod error;
pub mod executor;
pub mod job_planner;
pub mod registry;
pub mod type_extractor;

pub use self::accumulator::OutputAccumulator;
pub use self::config::ExtractorConfig;
pub use self::error::{ExtractionError, Result};
pub use self::executor::{ConstraintExtractor, ExtractionStats};
pub use self::job_planner::{BatchFilter, ConstraintCategories, ExtractionJob};
pub use self::registry::ExtractorRegistry;
pub use self::type_extractor::{LaneExtractor, TypeExtractor, TypedExtractor};
