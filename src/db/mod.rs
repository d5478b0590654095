pub mod cache;

mod macros;

pub use cache::{Cache, CacheKey, CacheWriterHandle};
