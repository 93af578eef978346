//! Filter Normalizer
//!
//! Turns loosely-typed search input (form fields, query strings, JSON) into a
//! canonical `FilterSet`. Normalization never fails: anything unparseable is
//! dropped.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Raw filter mapping as received from a form or URL query.
pub type RawFilters = HashMap<String, Value>;

/// Page size used when the caller does not supply `limit`
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Upper bound applied to caller-supplied `limit`
pub const MAX_PAGE_SIZE: u32 = 200;

/// Sentinel meaning "no restriction" for select-style inputs
const ANY: &str = "any";

// == Property Type ==
/// Property types offered by the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Residential,
    Condominium,
    Townhouse,
    Land,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Residential,
        PropertyType::Condominium,
        PropertyType::Townhouse,
        PropertyType::Land,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Residential => "Residential",
            PropertyType::Condominium => "Condominium",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Land => "Land",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown property type: {}", s))
    }
}

// == Filter Set ==
/// Canonical search filters.
///
/// Field order is part of the cache key: the key is derived from the JSON
/// serialization of this struct, and `BTreeSet` keeps cities sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSet {
    pub cities: BTreeSet<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub property_type: Option<String>,
    pub keywords: Option<String>,
    pub limit: u32,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            cities: BTreeSet::new(),
            min_price: None,
            max_price: None,
            min_bedrooms: None,
            min_bathrooms: None,
            property_type: None,
            keywords: None,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterSet {
    /// Normalizes a raw filter mapping.
    ///
    /// Recognized keys: `city`, `min_price`, `max_price`, `bedrooms`,
    /// `bathrooms`, `property_type`, `keywords`, `limit`. Unknown keys are
    /// ignored.
    pub fn from_raw(raw: &RawFilters) -> Self {
        let cities = raw.get("city").map(parse_cities).unwrap_or_default();

        let property_type = raw.get("property_type").and_then(parse_select_text);
        if let Some(kind) = &property_type {
            if kind.parse::<PropertyType>().is_err() {
                debug!("Passing through unrecognized property type '{}'", kind);
            }
        }

        let limit = raw
            .get("limit")
            .and_then(parse_positive)
            .map(|n| n.min(u64::from(MAX_PAGE_SIZE)) as u32)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            cities,
            min_price: raw.get("min_price").and_then(parse_positive),
            max_price: raw.get("max_price").and_then(parse_positive),
            min_bedrooms: raw.get("bedrooms").and_then(parse_count),
            min_bathrooms: raw.get("bathrooms").and_then(parse_count),
            property_type,
            keywords: raw.get("keywords").and_then(parse_text),
            limit,
        }
    }

    /// Returns the property type if it is one of the known kinds.
    pub fn known_property_type(&self) -> Option<PropertyType> {
        self.property_type.as_deref().and_then(|t| t.parse().ok())
    }
}

// == Field Parsers ==

/// Accepts a comma-separated string or an array of strings.
fn parse_cities(value: &Value) -> BTreeSet<String> {
    match value {
        Value::String(s) => collect_cities(s.split(',')),
        Value::Array(items) => collect_cities(items.iter().filter_map(Value::as_str)),
        _ => BTreeSet::new(),
    }
}

fn collect_cities<'a>(parts: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    parts
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lenient positive integer: strips `+`, parses the leading digits, and
/// treats zero, negatives and garbage as absent.
fn parse_positive(value: &Value) -> Option<u64> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(&s.replace('+', "")),
        _ => None,
    };
    parsed.filter(|&n| n > 0).map(|n| n as u64)
}

/// Bedroom/bathroom counts, which also accept the "any" sentinel.
fn parse_count(value: &Value) -> Option<u32> {
    if is_any(value) {
        return None;
    }
    parse_positive(value).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

fn parse_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_select_text(value: &Value) -> Option<String> {
    parse_text(value).filter(|s| s != ANY)
}

fn is_any(value: &Value) -> bool {
    value.as_str().map(str::trim) == Some(ANY)
}

/// Parses an optional sign followed by leading digits, ignoring the rest.
/// Digit runs too long for `i64` saturate instead of being dropped.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let run = &digits[..end];
    if run.is_empty() {
        return None;
    }
    let magnitude = run.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
