//! Cache key derivation.

use sha2::{Digest, Sha256};

use crate::search::FilterSet;

pub const SEARCH_KEY_PREFIX: &str = "bridge_properties_";
pub const LISTING_KEY_PREFIX: &str = "bridge_property_key_";
pub const MLS_ID_KEY_PREFIX: &str = "bridge_property_mls_";

/// Canonical text form of a filter set.
///
/// JSON field order follows the struct declaration and cities are already
/// sorted, so equal filter sets always serialize identically.
pub fn canonical_form(filters: &FilterSet) -> String {
    serde_json::to_string(filters).unwrap_or_else(|_| format!("{:?}", filters))
}

/// Key for a search result page: prefix plus the SHA-256 of the canonical form.
pub fn search_key(filters: &FilterSet) -> String {
    let digest = Sha256::digest(canonical_form(filters).as_bytes());
    format!("{}{}", SEARCH_KEY_PREFIX, hex::encode(digest))
}

pub fn listing_key_cache_key(listing_key: &str) -> String {
    format!("{}{}", LISTING_KEY_PREFIX, listing_key)
}

pub fn mls_id_cache_key(mls_id: &str) -> String {
    format!("{}{}", MLS_ID_KEY_PREFIX, mls_id)
}
