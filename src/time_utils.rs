// SPDX-License-Identifier: MIT

//! Shared helpers for UTC date/time handling.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current UTC calendar date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// The UTC calendar date one day before `now`.
///
/// Used by the daily rollup to select the prior day's aggregates.
pub fn day_before(now: DateTime<Utc>) -> NaiveDate {
    (now - Duration::days(1)).date_naive()
}
