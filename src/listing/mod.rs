//! Listing Module
//!
//! Provider record decoding and normalization into `PropertyRecord`.

pub mod calc;
mod de;
mod record;

pub use record::{
    extract_photos, PropertyRecord, ProviderResponse, RawMedia, RawProviderRecord, ResultSet,
    MISSING_PHOTO_ORDER,
};
