//! API Handlers
//!
//! HTTP request handlers for each listing endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::MemoryCache;
use crate::client::ListingProvider;
use crate::config::{AgentContact, Config};
use crate::diagnostics::DiagnosticReport;
use crate::error::Result;
use crate::models::{
    raw_filters_from_pairs, ClearResponse, HealthResponse, PropertyResponse, SearchResponse,
    StatsResponse,
};
use crate::search::FilterSet;
use crate::service::ListingService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: ListingService,
    /// Same cache the service writes to, kept for stats and clearing
    pub cache: MemoryCache,
    pub agent: AgentContact,
}

impl AppState {
    pub fn new(service: ListingService, cache: MemoryCache, agent: AgentContact) -> Self {
        Self {
            service,
            cache,
            agent,
        }
    }

    /// Wires a fresh in-memory cache and the given provider.
    pub fn from_config(config: &Config, provider: Arc<dyn ListingProvider>) -> Self {
        let cache = MemoryCache::new();
        let service = ListingService::new(provider, Arc::new(cache.clone()), config);
        Self::new(service, cache, config.agent.clone())
    }
}

/// Handler for GET /properties
///
/// Decodes the query string into filters and runs a search.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchResponse>> {
    let filters = FilterSet::from_raw(&raw_filters_from_pairs(pairs));
    let results = state.service.search(&filters).await?;

    Ok(Json(SearchResponse::from(results)))
}

/// Handler for GET /properties/:listing_key
pub async fn property_handler(
    State(state): State<AppState>,
    Path(listing_key): Path<String>,
) -> Result<Json<PropertyResponse>> {
    let property = state.service.listing_by_key(&listing_key).await?;

    Ok(Json(PropertyResponse::new(property, &state.agent)))
}

/// Handler for GET /mls/:mls_id
pub async fn mls_property_handler(
    State(state): State<AppState>,
    Path(mls_id): Path<String>,
) -> Result<Json<PropertyResponse>> {
    let property = state.service.listing_by_mls_id(&mls_id).await?;

    Ok(Json(PropertyResponse::new(property, &state.agent)))
}

/// Handler for GET /diagnostics/api-test
///
/// Responds 200 when every check passed and 502 otherwise.
pub async fn api_test_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<DiagnosticReport>) {
    let report = state.service.test_connection().await;
    let status = if report.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    (status, Json(report))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(ClearResponse::new(state.cache.clear().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
