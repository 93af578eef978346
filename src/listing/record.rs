//! Provider record shapes and the normalized property record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::calc;
use crate::listing::de;

/// Sort position given to photos without an `Order` value
pub const MISSING_PHOTO_ORDER: i64 = 999;

/// Media category that counts as a listing photo
const PHOTO_CATEGORY: &str = "Photo";

// == Provider Shapes ==

/// One entry of a listing's `Media` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMedia {
    #[serde(rename = "MediaCategory", default, deserialize_with = "de::opt_string")]
    pub media_category: Option<String>,
    #[serde(rename = "MediaURL", default, deserialize_with = "de::opt_string")]
    pub media_url: Option<String>,
    #[serde(rename = "Order", default, deserialize_with = "de::opt_i64")]
    pub order: Option<i64>,
}

/// A listing exactly as the provider returns it.
///
/// Field names follow the provider schema verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawProviderRecord {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub listing_key: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub listing_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub list_price: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub bedrooms_total: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub bathrooms_total_integer: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub living_area: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub lot_size_area: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub year_built: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub state_or_province: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub unparsed_address: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub public_remarks: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub property_sub_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub standard_status: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub media: Vec<RawMedia>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub photos_count: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub modification_timestamp: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub listing_contract_date: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub close_date: Option<String>,
    #[serde(rename = "CoolingYN", default, deserialize_with = "de::opt_bool")]
    pub cooling_yn: Option<bool>,
    #[serde(rename = "HeatingYN", default, deserialize_with = "de::opt_bool")]
    pub heating_yn: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub fireplaces_total: Option<i64>,
}

/// Body of a `Property` collection response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderResponse {
    pub value: Vec<RawProviderRecord>,
    #[serde(rename = "@odata.count", default)]
    pub count: Option<u64>,
}

// == Normalized Shapes ==

/// A listing after normalization: sorted photos and derived figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub listing_key: String,
    pub listing_id: String,

    pub list_price: Option<i64>,
    pub price_per_sq_ft: Option<i64>,
    pub estimated_monthly_payment: i64,

    pub bedrooms_total: Option<u32>,
    pub bathrooms_total: Option<u32>,
    pub living_area_sq_ft: Option<f64>,
    pub lot_size_area_sq_ft: Option<f64>,
    pub year_built: Option<i32>,

    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub unparsed_address: Option<String>,

    pub public_remarks: Option<String>,
    pub property_type: Option<String>,
    pub property_sub_type: Option<String>,
    pub standard_status: Option<String>,

    pub photos: Vec<String>,
    pub photos_count: Option<u32>,

    pub listing_contract_date: Option<String>,
    pub days_on_market: Option<i64>,
    pub modification_timestamp: Option<String>,
    pub close_date: Option<String>,

    pub cooling: Option<bool>,
    pub heating: Option<bool>,
    pub fireplaces_total: Option<u32>,
}

impl PropertyRecord {
    /// Normalizes a provider record using the current time for
    /// days-on-market.
    pub fn from_raw(raw: RawProviderRecord) -> Self {
        Self::from_raw_at(raw, Utc::now())
    }

    /// Normalizes a provider record as of `now`.
    pub fn from_raw_at(raw: RawProviderRecord, now: DateTime<Utc>) -> Self {
        let photos = extract_photos(&raw.media);
        let price_per_sq_ft = calc::price_per_sq_ft(raw.list_price, raw.living_area);
        let estimated_monthly_payment =
            calc::estimated_monthly_payment(raw.list_price.unwrap_or(0.0));
        let days_on_market = raw
            .listing_contract_date
            .as_deref()
            .and_then(|date| calc::days_on_market(date, now));

        Self {
            listing_key: raw.listing_key.unwrap_or_default(),
            listing_id: raw.listing_id.unwrap_or_default(),
            list_price: raw.list_price.map(|p| p.round() as i64),
            price_per_sq_ft,
            estimated_monthly_payment,
            bedrooms_total: raw.bedrooms_total.and_then(non_negative),
            bathrooms_total: raw.bathrooms_total_integer.and_then(non_negative),
            living_area_sq_ft: raw.living_area,
            lot_size_area_sq_ft: raw.lot_size_area,
            year_built: raw.year_built.and_then(|y| i32::try_from(y).ok()),
            city: raw.city,
            state: raw.state_or_province,
            postal_code: raw.postal_code,
            unparsed_address: raw.unparsed_address,
            public_remarks: raw.public_remarks,
            property_type: raw.property_type,
            property_sub_type: raw.property_sub_type,
            standard_status: raw.standard_status,
            photos,
            photos_count: raw.photos_count.and_then(non_negative),
            listing_contract_date: raw.listing_contract_date,
            days_on_market,
            modification_timestamp: raw.modification_timestamp,
            close_date: raw.close_date,
            cooling: raw.cooling_yn,
            heating: raw.heating_yn,
            fireplaces_total: raw.fireplaces_total.and_then(non_negative),
        }
    }
}

/// A page of normalized search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    pub properties: Vec<PropertyRecord>,
    pub total_count: u64,
}

impl ResultSet {
    /// Normalizes every record of a provider response as of `now`.
    pub fn from_response_at(response: ProviderResponse, now: DateTime<Utc>) -> Self {
        let total_count = response
            .count
            .unwrap_or(response.value.len() as u64);
        let properties = response
            .value
            .into_iter()
            .map(|raw| PropertyRecord::from_raw_at(raw, now))
            .collect();

        Self {
            properties,
            total_count,
        }
    }
}

/// Photo URLs ordered for display.
///
/// Keeps `Photo` entries with a non-empty URL and stable-sorts them by
/// `Order`, with missing orders placed at `MISSING_PHOTO_ORDER`.
pub fn extract_photos(media: &[RawMedia]) -> Vec<String> {
    let mut photos: Vec<(i64, &str)> = media
        .iter()
        .filter(|m| m.media_category.as_deref() == Some(PHOTO_CATEGORY))
        .filter_map(|m| {
            let url = m.media_url.as_deref().filter(|url| !url.is_empty())?;
            Some((m.order.unwrap_or(MISSING_PHOTO_ORDER), url))
        })
        .collect();

    // sort_by_key is stable
    photos.sort_by_key(|(order, _)| *order);
    photos.into_iter().map(|(_, url)| url.to_string()).collect()
}

fn non_negative(n: i64) -> Option<u32> {
    u32::try_from(n).ok()
}
