//! Search Module
//!
//! Filter normalization and OData query building.

pub mod filters;
pub mod query;

pub use filters::{FilterSet, PropertyType, RawFilters, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use query::{
    build_listing_id_query, build_listing_key_query, build_search_query, escape_literal,
    ProviderQuery, PROPERTY_ENDPOINT,
};
