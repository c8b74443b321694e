//! In-memory response cache
//!
//! Decoded responses are memoized for the lifetime of the owning client.
//! Entries never expire; the only removal path is a full clear.

mod memory;

pub use memory::{CacheStats, CachedResponse, ResponseCache};
