//! Client Module
//!
//! Outbound access to the Bridge OData API.

mod bridge;
mod provider;

pub use bridge::{BridgeClient, LOGGED_BODY_LIMIT};
pub use provider::ListingProvider;
