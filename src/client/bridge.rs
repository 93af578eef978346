//! Bridge OData client
//!
//! Performs authenticated GET requests and sorts every failure into one of
//! the four upstream error classes. The server token travels as the
//! `access_token` query parameter and is never written to the logs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::ListingProvider;
use crate::config::Config;
use crate::error::{MlsError, Result};
use crate::search::ProviderQuery;

/// Number of response-body characters included in failure logs
pub const LOGGED_BODY_LIMIT: usize = 500;

const ACCESS_TOKEN_PARAM: &str = "access_token";

/// HTTP client for one Bridge dataset.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    client: Client,
    api_url: String,
    server_token: String,
}

impl BridgeClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .user_agent(concat!("bridge-mls/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MlsError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            server_token: config.server_token.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl ListingProvider for BridgeClient {
    async fn fetch(&self, endpoint: &str, query: &ProviderQuery) -> Result<Value> {
        let url = self.endpoint_url(endpoint);
        let mut params = query.to_params();
        debug!(url = %url, params = ?params, "Bridge API request");
        params.push((ACCESS_TOKEN_PARAM, self.server_token.clone()));

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                // The request URL carries the token, strip it before logging
                let e = e.without_url();
                warn!(url = %url, error = %e, "Bridge API transport failure");
                MlsError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            warn!(url = %url, error = %e, "Failed to read Bridge API response body");
            MlsError::Transport(e.to_string())
        })?;

        if status != StatusCode::OK {
            warn!(
                url = %url,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "Bridge API returned non-200 status"
            );
            return Err(MlsError::Http(status.as_u16()));
        }

        let data: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(
                url = %url,
                error = %e,
                body = %truncate_body(&body),
                "Bridge API returned invalid JSON"
            );
            MlsError::MalformedResponse(e.to_string())
        })?;

        if let Some(message) = embedded_error(&data) {
            warn!(url = %url, error = %message, "Bridge API reported an error");
            return Err(MlsError::Provider(message));
        }

        Ok(data)
    }
}

/// Extracts the message of an `error` member, if the body carries one.
fn embedded_error(data: &Value) -> Option<String> {
    let error = data.get("error").filter(|e| !e.is_null())?;
    let message = match error {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    };
    Some(message)
}

fn truncate_body(body: &str) -> String {
    body.chars().take(LOGGED_BODY_LIMIT).collect()
}
