//! Integration Tests for the Bridge API client
//!
//! Runs `BridgeClient` against a local axum server playing the provider.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bridge_mls::{
    search::{build_listing_key_query, ProviderQuery, PROPERTY_ENDPOINT},
    BridgeClient, Config, ListingProvider, MlsError,
};
use serde_json::json;

const TOKEN: &str = "test-server-token";

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

// == Mock Upstream ==

async fn ok_handler(
    State(seen): State<Seen>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    seen.lock().unwrap().push(params);
    Json(json!({
        "@odata.count": 1,
        "value": [{"ListingKey": "k1", "ListPrice": 725000}]
    }))
}

async fn server_error_handler() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

async fn unauthorized_handler() -> impl IntoResponse {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad token"})))
}

async fn html_handler() -> impl IntoResponse {
    "<html><body>maintenance</body></html>"
}

async fn embedded_error_handler() -> impl IntoResponse {
    Json(json!({
        "error": {"name": "ODataError", "message": "Invalid $filter expression"}
    }))
}

async fn spawn_upstream() -> (SocketAddr, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/ok/Property", get(ok_handler))
        .route("/fail/Property", get(server_error_handler))
        .route("/auth/Property", get(unauthorized_handler))
        .route("/html/Property", get(html_handler))
        .route("/err/Property", get(embedded_error_handler))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, seen)
}

fn client_for(base: String) -> BridgeClient {
    let config = Config {
        api_url: base,
        server_token: TOKEN.to_string(),
        request_timeout: 5,
        ..Config::default()
    };
    BridgeClient::new(&config).unwrap()
}

fn sample_query() -> ProviderQuery {
    ProviderQuery::select(&["ListingKey", "ListPrice"])
        .with_top(1)
        .with_filter("City eq 'O''Neil'")
}

// == Success Path ==

#[tokio::test]
async fn test_fetch_sends_token_as_query_parameter() {
    let (addr, seen) = spawn_upstream().await;
    let client = client_for(format!("http://{}/ok", addr));

    let body = client.fetch(PROPERTY_ENDPOINT, &sample_query()).await.unwrap();
    assert_eq!(body["value"][0]["ListingKey"], "k1");

    let params = seen.lock().unwrap()[0].clone();
    assert_eq!(params.get("access_token").map(String::as_str), Some(TOKEN));
    assert_eq!(params.get("$select").map(String::as_str), Some("ListingKey,ListPrice"));
    assert_eq!(params.get("$top").map(String::as_str), Some("1"));
    assert_eq!(params.get("$filter").map(String::as_str), Some("City eq 'O''Neil'"));
    assert!(!params.contains_key("$orderby"));
}

#[tokio::test]
async fn test_fetch_detail_query() {
    let (addr, seen) = spawn_upstream().await;
    let client = client_for(format!("http://{}/ok/", addr));

    client
        .fetch(PROPERTY_ENDPOINT, &build_listing_key_query("k1"))
        .await
        .unwrap();

    let params = seen.lock().unwrap()[0].clone();
    assert_eq!(params.get("$filter").map(String::as_str), Some("ListingKey eq 'k1'"));
    assert!(params["$select"].contains("FireplacesTotal"));
}

// == Failure Classes ==

#[tokio::test]
async fn test_non_200_is_http_error() {
    let (addr, _) = spawn_upstream().await;

    let err = client_for(format!("http://{}/fail", addr))
        .fetch(PROPERTY_ENDPOINT, &sample_query())
        .await
        .unwrap_err();
    assert!(matches!(err, MlsError::Http(500)));

    // A JSON error body does not change the class
    let err = client_for(format!("http://{}/auth", addr))
        .fetch(PROPERTY_ENDPOINT, &sample_query())
        .await
        .unwrap_err();
    assert!(matches!(err, MlsError::Http(401)));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let (addr, _) = spawn_upstream().await;

    let err = client_for(format!("http://{}/html", addr))
        .fetch(PROPERTY_ENDPOINT, &sample_query())
        .await
        .unwrap_err();
    assert!(matches!(err, MlsError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_embedded_error_is_provider_error() {
    let (addr, _) = spawn_upstream().await;

    let err = client_for(format!("http://{}/err", addr))
        .fetch(PROPERTY_ENDPOINT, &sample_query())
        .await
        .unwrap_err();
    match err {
        MlsError::Provider(message) => assert_eq!(message, "Invalid $filter expression"),
        other => panic!("expected provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Grab a free port, then close it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(format!("http://{}", addr))
        .fetch(PROPERTY_ENDPOINT, &sample_query())
        .await
        .unwrap_err();

    assert!(matches!(err, MlsError::Transport(_)));
    assert!(!err.to_string().contains(TOKEN));
}
