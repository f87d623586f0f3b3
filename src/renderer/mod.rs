pub mod constraint_line_extractor;
pub mod line_extractors;
pub mod line_instance;

pub use self::constraint_line_extractor::ConstraintLineExtractor;
pub use self::line_instance::{pack_color, LineInstance};
