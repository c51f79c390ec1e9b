//! Incremental cache support.
//!
//! [`location`] decides whether and where the cache file lives for one run;
//! [`store`] reads and writes the file itself on behalf of the batch
//! processor.

pub mod location;
pub mod store;

pub use location::{resolve_cache, CacheDirective, CacheLocation, CacheResolution};
pub use store::FormatCache;
