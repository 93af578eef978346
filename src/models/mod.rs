//! Request and Response models for the listing API
//!
//! This module defines the DTOs used for query-string decoding and
//! JSON response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::raw_filters_from_pairs;
pub use responses::{
    ClearResponse, ErrorResponse, HealthResponse, PropertyResponse, SearchResponse, StatsResponse,
};
