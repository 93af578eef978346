//! Derived listing figures: price per square foot, estimated mortgage
//! payment and days on market.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Share of the price assumed as down payment
pub const DOWN_PAYMENT_RATIO: f64 = 0.2;
/// Annual interest rate, compounded monthly
pub const ANNUAL_INTEREST_RATE: f64 = 0.07;
/// 30-year term
pub const LOAN_TERM_MONTHS: i32 = 360;

const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

/// Offset-less timestamp layouts, read as UTC
const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// `round(price / living_area)`, absent when either input is missing or the
/// area is not positive.
pub fn price_per_sq_ft(list_price: Option<f64>, living_area: Option<f64>) -> Option<i64> {
    match (list_price, living_area) {
        (Some(price), Some(area)) if area > 0.0 => Some((price / area).round() as i64),
        _ => None,
    }
}

/// Estimated monthly payment under the fixed loan assumptions.
pub fn estimated_monthly_payment(list_price: f64) -> i64 {
    let loan_amount = list_price * (1.0 - DOWN_PAYMENT_RATIO);
    amortized_payment(loan_amount, ANNUAL_INTEREST_RATE, LOAN_TERM_MONTHS)
}

/// Standard amortizing-loan payment, rounded to the nearest currency unit.
///
/// A zero rate yields 0 rather than dividing by zero.
pub fn amortized_payment(principal: f64, annual_rate: f64, months: i32) -> i64 {
    let r = annual_rate / 12.0;
    if r == 0.0 || months <= 0 {
        return 0;
    }
    let growth = (1.0 + r).powi(months);
    (principal * r * growth / (growth - 1.0)).round() as i64
}

/// Whole days elapsed since `listing_date`, clamped at zero.
///
/// Accepts `YYYY-MM-DD` (taken as midnight UTC), an RFC 3339 timestamp, or
/// a timestamp without offset (taken as UTC). Unparseable dates yield `None`.
pub fn days_on_market(listing_date: &str, now: DateTime<Utc>) -> Option<i64> {
    let listed = parse_listing_date(listing_date)?;
    let elapsed = (now - listed).num_seconds();
    Some(elapsed.div_euclid(SECONDS_PER_DAY).max(0))
}

fn parse_listing_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_monthly_payment_matches_closed_form() {
        let loan: f64 = 400_000.0;
        let r: f64 = 0.07 / 12.0;
        let n = 360;
        let expected = loan * r * (1.0 + r).powi(n) / ((1.0 + r).powi(n) - 1.0);

        let payment = estimated_monthly_payment(500_000.0);
        assert!((payment as f64 - expected).abs() <= 1.0);
        assert!((2660..=2662).contains(&payment));
    }

    #[test]
    fn test_zero_rate_payment_is_zero() {
        assert_eq!(amortized_payment(400_000.0, 0.0, 360), 0);
    }

    #[test]
    fn test_zero_price_payment_is_zero() {
        assert_eq!(estimated_monthly_payment(0.0), 0);
    }

    #[test]
    fn test_price_per_sq_ft() {
        assert_eq!(price_per_sq_ft(Some(500_000.0), Some(2_000.0)), Some(250));
        assert_eq!(price_per_sq_ft(Some(100_000.0), Some(3.0)), Some(33333));
        assert_eq!(price_per_sq_ft(Some(500_000.0), Some(0.0)), None);
        assert_eq!(price_per_sq_ft(Some(500_000.0), None), None);
        assert_eq!(price_per_sq_ft(None, Some(1_500.0)), None);
    }

    #[test]
    fn test_days_on_market_plain_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 15, 30, 0).unwrap();
        assert_eq!(days_on_market("2024-03-01", now), Some(10));
    }

    #[test]
    fn test_days_on_market_rfc3339() {
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap();
        assert_eq!(days_on_market("2024-03-10T18:00:00Z", now), Some(0));
        assert_eq!(days_on_market("2024-03-09T11:00:00-05:00", now), Some(1));
    }

    #[test]
    fn test_days_on_market_without_offset() {
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap();
        assert_eq!(days_on_market("2024-03-01T10:00:00", now), Some(10));
        assert_eq!(days_on_market("2024-03-01T13:00:00.250", now), Some(9));
        assert_eq!(days_on_market("2024-03-08 12:00:00", now), Some(3));
    }

    #[test]
    fn test_days_on_market_future_date_clamps() {
        let now = Utc::now();
        let tomorrow = (now + Duration::days(1)).format("%Y-%m-%d").to_string();
        assert_eq!(days_on_market(&tomorrow, now), Some(0));
    }

    #[test]
    fn test_days_on_market_malformed() {
        let now = Utc::now();
        assert_eq!(days_on_market("", now), None);
        assert_eq!(days_on_market("last tuesday", now), None);
    }
}
