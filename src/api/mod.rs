//! API Module
//!
//! HTTP handlers and routing for the listing REST API.
//!
//! # Endpoints
//! - `GET /properties` - Search active listings
//! - `GET /properties/:listing_key` - Listing detail by listing key
//! - `GET /mls/:mls_id` - Listing detail by MLS number
//! - `GET /diagnostics/api-test` - Provider connectivity self-test
//! - `GET /cache/stats` - Cache statistics
//! - `DELETE /cache` - Clear the cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
