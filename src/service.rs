//! Listing Service
//!
//! Ties the pieces together: normalize filters, consult the cache, build the
//! provider query, fetch, normalize records and store the result.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{listing_key_cache_key, mls_id_cache_key, search_key, CachePort};
use crate::client::ListingProvider;
use crate::config::Config;
use crate::diagnostics::{run_connection_test, DiagnosticReport};
use crate::error::{MlsError, Result};
use crate::listing::{PropertyRecord, ProviderResponse, ResultSet};
use crate::search::{
    build_listing_id_query, build_listing_key_query, build_search_query, FilterSet, ProviderQuery,
    RawFilters, PROPERTY_ENDPOINT,
};

/// Search and single-listing lookups backed by a provider and a cache.
#[derive(Clone)]
pub struct ListingService {
    provider: Arc<dyn ListingProvider>,
    cache: Arc<dyn CachePort>,
    debug_mode: bool,
    search_ttl: Duration,
    property_ttl: Duration,
}

impl ListingService {
    pub fn new(
        provider: Arc<dyn ListingProvider>,
        cache: Arc<dyn CachePort>,
        config: &Config,
    ) -> Self {
        Self {
            provider,
            cache,
            debug_mode: config.debug_mode,
            search_ttl: Duration::from_secs(config.search_cache_ttl),
            property_ttl: Duration::from_secs(config.property_cache_ttl),
        }
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    // == Search ==

    /// Runs a search for an already normalized filter set.
    pub async fn search(&self, filters: &FilterSet) -> Result<ResultSet> {
        let cache_key = search_key(filters);

        if let Some(cached) = self.cached::<ResultSet>(&cache_key).await {
            debug!(key = %cache_key, "Search served from cache");
            return Ok(cached);
        }

        let query = build_search_query(filters);
        let response = self.fetch_listings(&query).await?;
        let results = ResultSet::from_response_at(response, Utc::now());

        info!(
            returned = results.properties.len(),
            total = results.total_count,
            "Search completed"
        );

        self.store(&cache_key, &results, self.search_ttl).await;
        Ok(results)
    }

    /// Normalizes raw request filters and searches, collapsing every failure
    /// to `None` after logging it.
    pub async fn search_properties(&self, raw: &RawFilters) -> Option<ResultSet> {
        let filters = FilterSet::from_raw(raw);
        match self.search(&filters).await {
            Ok(results) => Some(results),
            Err(e) => {
                warn!(error = %e, "Property search failed");
                None
            }
        }
    }

    // == Single Listing ==

    /// Looks up one listing by its provider `ListingKey`.
    pub async fn listing_by_key(&self, listing_key: &str) -> Result<PropertyRecord> {
        let listing_key = require_identifier(listing_key, "Listing key")?;
        let cache_key = listing_key_cache_key(listing_key);
        self.single_listing(&cache_key, build_listing_key_query(listing_key), listing_key)
            .await
    }

    pub async fn get_single_property(&self, listing_key: &str) -> Option<PropertyRecord> {
        self.listing_by_key(listing_key)
            .await
            .map_err(|e| warn!(listing_key = %listing_key, error = %e, "Listing lookup failed"))
            .ok()
    }

    /// Looks up one listing by its MLS number (`ListingId`).
    pub async fn listing_by_mls_id(&self, mls_id: &str) -> Result<PropertyRecord> {
        let mls_id = require_identifier(mls_id, "MLS number")?;
        let cache_key = mls_id_cache_key(mls_id);
        self.single_listing(&cache_key, build_listing_id_query(mls_id), mls_id)
            .await
    }

    pub async fn get_property_by_mls_id(&self, mls_id: &str) -> Option<PropertyRecord> {
        self.listing_by_mls_id(mls_id)
            .await
            .map_err(|e| warn!(mls_id = %mls_id, error = %e, "MLS number lookup failed"))
            .ok()
    }

    /// Runs the provider connectivity self-test. Never cached.
    pub async fn test_connection(&self) -> DiagnosticReport {
        run_connection_test(self.provider.as_ref()).await
    }

    // == Internals ==

    async fn single_listing(
        &self,
        cache_key: &str,
        query: ProviderQuery,
        identifier: &str,
    ) -> Result<PropertyRecord> {
        if let Some(cached) = self.cached::<PropertyRecord>(cache_key).await {
            debug!(key = %cache_key, "Listing served from cache");
            return Ok(cached);
        }

        let response = self.fetch_listings(&query).await?;
        let now = Utc::now();
        let record = response
            .value
            .into_iter()
            .next()
            .map(|raw| PropertyRecord::from_raw_at(raw, now))
            .ok_or_else(|| MlsError::NotFound(identifier.to_string()))?;

        self.store(cache_key, &record, self.property_ttl).await;
        Ok(record)
    }

    async fn fetch_listings(&self, query: &ProviderQuery) -> Result<ProviderResponse> {
        let body: Value = self.provider.fetch(PROPERTY_ENDPOINT, query).await?;
        serde_json::from_value(body).map_err(|e| {
            warn!(error = %e, "Provider response missing listing collection");
            MlsError::MalformedResponse(e.to_string())
        })
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if self.debug_mode {
            return None;
        }
        let payload = self.cache.get(key).await?;
        match serde_json::from_str(&payload) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if self.debug_mode {
            return;
        }
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode cache entry");
                return;
            }
        };
        if let Err(e) = self.cache.put(key, payload, ttl).await {
            warn!(key = %key, error = %e, "Failed to write cache entry");
        }
    }
}

fn require_identifier<'a>(raw: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MlsError::InvalidInput(format!("{} cannot be empty", what)));
    }
    Ok(trimmed)
}
