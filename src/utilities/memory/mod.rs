//! Memory management utilities.
//!
//! Pools recycle the short lived per-pass buffers (job lists, per-job outputs) and raw buffers
//! hold the untyped bundle storage of constraint batches.

pub mod buffer;
pub mod buffer_pool;

pub use buffer::RawBuffer;
pub use buffer_pool::BufferPool;
