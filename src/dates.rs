//! Vest date normalization
//!
//! Broker exports carry vest dates either as `15-Jan-2024` or `15-01-2024`.
//! Everything downstream works on the abbreviated-month form, and the rate
//! table is keyed by `YYYYMMDD`.

use chrono::NaiveDate;

/// Canonical vest date format (`15-Jan-2024`)
pub const CANONICAL_FORMAT: &str = "%d-%b-%Y";

/// Numeric-month vest date format (`15-01-2024`)
pub const NUMERIC_FORMAT: &str = "%d-%m-%Y";

/// Rate table key format (`20240115`)
pub const RATE_KEY_FORMAT: &str = "%Y%m%d";

/// Normalize a vest date to `dd-Mon-yyyy`.
///
/// Dates already in the canonical form are returned unchanged. Numeric-month
/// dates are reformatted. Anything else yields `None` and the caller skips
/// the record.
///
/// # Example
/// ```
/// use vest_valuator::dates::normalize;
///
/// assert_eq!(normalize("15-01-2024").as_deref(), Some("15-Jan-2024"));
/// assert_eq!(normalize("16-Jan-2024").as_deref(), Some("16-Jan-2024"));
/// assert_eq!(normalize("2024/01/15"), None);
/// ```
pub fn normalize(date_str: &str) -> Option<String> {
    if NaiveDate::parse_from_str(date_str, CANONICAL_FORMAT).is_ok() {
        return Some(date_str.to_string());
    }

    NaiveDate::parse_from_str(date_str, NUMERIC_FORMAT)
        .ok()
        .map(|date| date.format(CANONICAL_FORMAT).to_string())
}

/// Build the `YYYYMMDD` rate key for a canonical vest date
pub fn rate_key(normalized: &str) -> Option<String> {
    NaiveDate::parse_from_str(normalized, CANONICAL_FORMAT)
        .ok()
        .map(|date| date.format(RATE_KEY_FORMAT).to_string())
}
