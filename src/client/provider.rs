//! Provider seam for the listing service and diagnostics.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::search::ProviderQuery;

/// Source of raw listing data.
///
/// Implementations return the decoded JSON body of one provider call, or one
/// of the upstream error classes (`Transport`, `Http`, `MalformedResponse`,
/// `Provider`).
#[async_trait]
pub trait ListingProvider: Send + Sync {
    /// Issues one read against `endpoint` (relative to the provider base URL).
    async fn fetch(&self, endpoint: &str, query: &ProviderQuery) -> Result<Value>;
}
