//! Configuration Module
//!
//! Handles loading provider credentials, cache TTLs and agent contact info
//! from environment variables.

use std::env;

use serde::Serialize;

/// Default Bridge OData endpoint for the MLS PIN shared dataset
pub const DEFAULT_API_URL: &str =
    "https://api.bridgedataoutput.com/api/v2/OData/shared_mlspin_41854c5";

/// Agent contact details shown alongside listing details.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
}

impl AgentContact {
    /// Returns true when no contact field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none() && self.company.is_none()
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider base URL, without trailing slash
    pub api_url: String,
    /// Server token appended to every request as `access_token`
    pub server_token: String,
    /// Bypasses the cache and enables verbose logging
    pub debug_mode: bool,
    /// Outbound request timeout in seconds
    pub request_timeout: u64,
    /// TTL in seconds for search results
    pub search_cache_ttl: u64,
    /// TTL in seconds for single-listing lookups
    pub property_cache_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Contact block attached to listing details
    pub agent: AgentContact,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `BRIDGE_API_URL` - Provider base URL (default: MLS PIN shared dataset)
    /// - `BRIDGE_SERVER_TOKEN` - Server token (default: empty)
    /// - `BRIDGE_DEBUG` - `1`, `true` or `yes` to bypass the cache (default: off)
    /// - `BRIDGE_REQUEST_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `SEARCH_CACHE_TTL` - Search result TTL in seconds (default: 1800)
    /// - `PROPERTY_CACHE_TTL` - Single listing TTL in seconds (default: 3600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `AGENT_NAME`, `AGENT_PHONE`, `AGENT_EMAIL`, `AGENT_COMPANY`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_url: normalize_api_url(
                &env::var("BRIDGE_API_URL").unwrap_or(defaults.api_url),
            ),
            server_token: env::var("BRIDGE_SERVER_TOKEN")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            debug_mode: env::var("BRIDGE_DEBUG")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            request_timeout: env::var("BRIDGE_REQUEST_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(defaults.request_timeout),
            search_cache_ttl: env::var("SEARCH_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search_cache_ttl),
            property_cache_ttl: env::var("PROPERTY_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.property_cache_ttl),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            agent: AgentContact {
                name: text_var("AGENT_NAME"),
                phone: text_var("AGENT_PHONE"),
                email: text_var("AGENT_EMAIL").filter(|email| email.contains('@')),
                company: text_var("AGENT_COMPANY"),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            server_token: String::new(),
            debug_mode: false,
            request_timeout: 30,
            search_cache_ttl: 1800,
            property_cache_ttl: 3600,
            server_port: 3000,
            agent: AgentContact::default(),
        }
    }
}

fn normalize_api_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn text_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
