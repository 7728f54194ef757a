//! Date formatting for pages and the feed.
//!
//! WordPress sends `date` in the site timezone and `date_gmt` in UTC, both as
//! `YYYY-MM-DDTHH:MM:SS` with no offset.

use chrono::{DateTime, NaiveDateTime};

const WP_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a WordPress timestamp. RFC 3339 strings with an offset are accepted
/// too and reduced to their UTC wall-clock time.
pub fn parse_wp_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, WP_DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// `2024-01-05T09:00:00` → `January 5, 2024`. Unparseable input is returned
/// as-is.
pub fn display_date(value: &str) -> String {
    match parse_wp_date(value) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => value.to_string(),
    }
}

/// `date_gmt` as an RFC 2822 timestamp for `<pubDate>`.
pub fn rfc2822_date(date_gmt: &str) -> Option<String> {
    parse_wp_date(date_gmt).map(|dt| dt.and_utc().to_rfc2822())
}
