//! Request decoding for the listing API
//!
//! Search filters arrive as a query string. Keys may repeat (`city=a&city=b`)
//! or use the bracket form (`city[]=a`), so the raw pairs are folded into a
//! `RawFilters` map before normalization.

use serde_json::Value;

use crate::search::RawFilters;

const CITY_KEY: &str = "city";

/// Folds query-string pairs into raw search filters.
///
/// - `city` and `city[]` accumulate into one array under `city`, and each
///   value may itself be a comma-separated list
/// - any other repeated key keeps its last value
/// - empty values are ignored
pub fn raw_filters_from_pairs(pairs: Vec<(String, String)>) -> RawFilters {
    let mut filters = RawFilters::new();
    let mut cities: Vec<Value> = Vec::new();

    for (key, value) in pairs {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        let key = key.trim_end_matches("[]");
        if key == CITY_KEY {
            cities.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|city| !city.is_empty())
                    .map(|city| Value::String(city.to_string())),
            );
        } else {
            filters.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    if !cities.is_empty() {
        filters.insert(CITY_KEY.to_string(), Value::Array(cities));
    }

    filters
}
