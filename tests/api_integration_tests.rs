//! Integration Tests for API Endpoints
//!
//! Drives the full router with a stub provider standing in for Bridge.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bridge_mls::{
    api::create_router,
    config::{AgentContact, Config},
    search::ProviderQuery,
    AppState, ListingProvider, MlsError, Result,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

/// Answers every query with `body` and records what it was asked.
struct StubProvider {
    body: Value,
    seen: Mutex<Vec<ProviderQuery>>,
}

impl StubProvider {
    fn new(body: Value) -> Arc<Self> {
        Arc::new(Self {
            body,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn last_filter(&self) -> Option<String> {
        self.seen
            .lock()
            .unwrap()
            .last()
            .and_then(|q| q.filter_expression.clone())
    }
}

#[async_trait]
impl ListingProvider for StubProvider {
    async fn fetch(&self, _endpoint: &str, query: &ProviderQuery) -> Result<Value> {
        self.seen.lock().unwrap().push(query.clone());
        Ok(self.body.clone())
    }
}

struct BrokenProvider;

#[async_trait]
impl ListingProvider for BrokenProvider {
    async fn fetch(&self, _endpoint: &str, _query: &ProviderQuery) -> Result<Value> {
        Err(MlsError::MalformedResponse("expected value".to_string()))
    }
}

fn listing_body() -> Value {
    json!({
        "@odata.count": 57,
        "value": [{
            "ListingKey": "3yd-MLSPIN-73123456",
            "ListingId": "73123456",
            "ListPrice": 500000,
            "LivingArea": 2000,
            "BedroomsTotal": 3,
            "City": "Boston",
            "ListingContractDate": "2024-01-15",
            "Media": [
                {"MediaCategory": "Photo", "MediaURL": "https://cdn.example/2.jpg", "Order": 2},
                {"MediaCategory": "Photo", "MediaURL": "https://cdn.example/x.jpg"},
                {"MediaCategory": "Photo", "MediaURL": "https://cdn.example/1.jpg", "Order": 1},
                {"MediaCategory": "Document", "MediaURL": "https://cdn.example/plan.pdf", "Order": 0}
            ]
        }]
    })
}

fn create_test_app(provider: Arc<dyn ListingProvider>, config: &Config) -> Router {
    create_router(AppState::from_config(config, provider))
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// == Search Endpoint Tests ==

#[tokio::test]
async fn test_search_returns_normalized_listings() {
    let provider = StubProvider::new(listing_body());
    let app = create_test_app(provider.clone(), &Config::default());

    let (status, json) = send(&app, "GET", "/properties?city=Boston&min_price=300000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["total"], 57);

    let property = &json["properties"][0];
    assert_eq!(property["listingKey"], "3yd-MLSPIN-73123456");
    assert_eq!(property["pricePerSqFt"], 250);
    assert_eq!(
        property["photos"],
        json!([
            "https://cdn.example/1.jpg",
            "https://cdn.example/2.jpg",
            "https://cdn.example/x.jpg"
        ])
    );

    assert_eq!(
        provider.last_filter().as_deref(),
        Some("StandardStatus eq 'Active' and PhotosCount gt 0 and (City eq 'Boston') and ListPrice ge 300000")
    );
}

#[tokio::test]
async fn test_search_repeated_cities_share_cache_entry() {
    let provider = StubProvider::new(listing_body());
    let app = create_test_app(provider.clone(), &Config::default());

    let (status, _) = send(&app, "GET", "/properties?city=Cambridge&city=Boston").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        provider.last_filter().as_deref(),
        Some("StandardStatus eq 'Active' and PhotosCount gt 0 and (City eq 'Boston' or City eq 'Cambridge')")
    );

    // Different order and bracket form normalize to the same filters
    let (status, _) = send(&app, "GET", "/properties?city%5B%5D=Boston&city%5B%5D=Cambridge").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.calls(), 1);

    let (_, stats) = send(&app, "GET", "/cache/stats").await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
}

#[tokio::test]
async fn test_search_comma_separated_cities() {
    let provider = StubProvider::new(listing_body());
    let app = create_test_app(provider.clone(), &Config::default());

    let (status, _) = send(&app, "GET", "/properties?city=Boston,Cambridge").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        provider.last_filter().as_deref(),
        Some("StandardStatus eq 'Active' and PhotosCount gt 0 and (City eq 'Boston' or City eq 'Cambridge')")
    );

    // Repeated keys in another order hit the same cache entry
    let (status, _) = send(&app, "GET", "/properties?city=Cambridge&city=Boston").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_search_escapes_quotes_in_keywords() {
    let provider = StubProvider::new(json!({"value": []}));
    let app = create_test_app(provider.clone(), &Config::default());

    let (status, json) = send(&app, "GET", "/properties?keywords=Captain%27s%20House").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 0);
    let filter = provider.last_filter().unwrap();
    assert!(filter.ends_with("contains(PublicRemarks, 'Captain''s House')"));
}

#[tokio::test]
async fn test_search_debug_mode_skips_cache() {
    let provider = StubProvider::new(listing_body());
    let config = Config {
        debug_mode: true,
        ..Config::default()
    };
    let app = create_test_app(provider.clone(), &config);

    send(&app, "GET", "/properties?city=Boston").await;
    send(&app, "GET", "/properties?city=Boston").await;

    assert_eq!(provider.calls(), 2);
    let (_, stats) = send(&app, "GET", "/cache/stats").await;
    assert_eq!(stats["total_entries"], 0);
}

#[tokio::test]
async fn test_search_upstream_failure_is_generic_502() {
    let app = create_test_app(Arc::new(BrokenProvider), &Config::default());

    let (status, json) = send(&app, "GET", "/properties").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "Unable to retrieve listings at this time");
}

// == Detail Endpoint Tests ==

#[tokio::test]
async fn test_property_detail_includes_agent() {
    let provider = StubProvider::new(listing_body());
    let config = Config {
        agent: AgentContact {
            name: Some("Pat Lee".to_string()),
            phone: Some("617-555-0100".to_string()),
            ..AgentContact::default()
        },
        ..Config::default()
    };
    let app = create_test_app(provider.clone(), &config);

    let (status, json) = send(&app, "GET", "/properties/3yd-MLSPIN-73123456").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["property"]["listingId"], "73123456");
    assert_eq!(json["agent"]["name"], "Pat Lee");
    assert_eq!(
        provider.last_filter().as_deref(),
        Some("ListingKey eq '3yd-MLSPIN-73123456'")
    );
}

#[tokio::test]
async fn test_mls_detail_lookup() {
    let provider = StubProvider::new(listing_body());
    let app = create_test_app(provider.clone(), &Config::default());

    let (status, json) = send(&app, "GET", "/mls/73123456").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["property"]["listingKey"], "3yd-MLSPIN-73123456");
    assert!(json.get("agent").is_none());
    assert_eq!(
        provider.last_filter().as_deref(),
        Some("ListingId eq '73123456'")
    );

    // Cached for the next lookup
    send(&app, "GET", "/mls/73123456").await;
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_property_detail_not_found() {
    let provider = StubProvider::new(json!({"value": []}));
    let app = create_test_app(provider, &Config::default());

    let (status, json) = send(&app, "GET", "/properties/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Property not found or no longer available");
}

// == Diagnostics Endpoint Tests ==

#[tokio::test]
async fn test_api_test_reports_each_check() {
    let provider = StubProvider::new(json!({"value": []}));
    let app = create_test_app(provider.clone(), &Config::default());

    let (status, json) = send(&app, "GET", "/diagnostics/api-test").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "All API tests passed successfully!");
    assert_eq!(json["tests"]["basic_connection"]["passed"], true);
    assert_eq!(json["tests"]["media_handling"]["name"], "Media Field Handling");
    assert_eq!(json["tests"]["filter_syntax"]["message"], "Filters working");
    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn test_api_test_failure_is_502() {
    let app = create_test_app(Arc::new(BrokenProvider), &Config::default());

    let (status, json) = send(&app, "GET", "/diagnostics/api-test").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["success"], false);
    assert_eq!(json["tests"]["basic_connection"]["message"], "Connection failed");
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let provider = StubProvider::new(listing_body());
    let app = create_test_app(provider.clone(), &Config::default());

    send(&app, "GET", "/properties?city=Boston").await;
    send(&app, "GET", "/properties/3yd-MLSPIN-73123456").await;

    let (status, json) = send(&app, "DELETE", "/cache").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 2);

    send(&app, "GET", "/properties?city=Boston").await;
    assert_eq!(provider.calls(), 3);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(StubProvider::new(json!({"value": []})), &Config::default());

    let (status, json) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
