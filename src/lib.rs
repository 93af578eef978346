//! Bridge MLS - Listing search over the Bridge OData API
//!
//! Normalizes search filters, builds escaped OData queries, caches results
//! with a TTL and reshapes provider records for display.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod listing;
pub mod models;
pub mod search;
pub mod service;

pub use api::AppState;
pub use client::{BridgeClient, ListingProvider};
pub use config::Config;
pub use error::{MlsError, Result};
pub use service::ListingService;
