//! Response DTOs for the listing API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::config::AgentContact;
use crate::listing::{PropertyRecord, ResultSet};

/// Response body for GET /properties
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// Number of listings in this page
    pub count: usize,
    /// Total matches reported by the provider
    pub total: u64,
    pub properties: Vec<PropertyRecord>,
}

impl From<ResultSet> for SearchResponse {
    fn from(results: ResultSet) -> Self {
        Self {
            count: results.properties.len(),
            total: results.total_count,
            properties: results.properties,
        }
    }
}

/// Response body for the single-listing endpoints
#[derive(Debug, Clone, Serialize)]
pub struct PropertyResponse {
    pub property: PropertyRecord,
    /// Omitted when no contact details are configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentContact>,
}

impl PropertyResponse {
    pub fn new(property: PropertyRecord, agent: &AgentContact) -> Self {
        Self {
            property,
            agent: (!agent.is_empty()).then(|| agent.clone()),
        }
    }
}

/// Response body for GET /cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cleared {} cached entries", removed),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
