pub mod bundle_indexing;
pub mod collections;
pub mod gather_scatter;
pub mod memory;
pub mod thread_dispatcher;
pub mod vector;
pub mod vector3_wide;

pub use self::bundle_indexing::BundleIndexing;
pub use self::gather_scatter::{BundleLayout, GatherScatter, OffsetView};
pub use self::vector::{Vector, VECTOR_WIDTH};
pub use self::vector3_wide::Vector3Wide;
