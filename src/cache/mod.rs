//! Cache Module
//!
//! TTL cache for normalized search results and listing lookups.

mod entry;
mod key;
mod port;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{
    canonical_form, listing_key_cache_key, mls_id_cache_key, search_key, LISTING_KEY_PREFIX,
    MLS_ID_KEY_PREFIX, SEARCH_KEY_PREFIX,
};
pub use port::{CachePort, MemoryCache};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed payload size in bytes
pub const MAX_VALUE_SIZE: usize = 8 * 1024 * 1024; // 8 MB
