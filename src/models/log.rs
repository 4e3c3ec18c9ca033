// SPDX-License-Identifier: MIT

//! Logged food entries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One logged food entry.
///
/// Created once per logging action and immutable thereafter; keyed by
/// (user_id, timestamp) for ordering. Macro fields are the scaled values
/// for the requested quantity, not the per-unit reference values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub user_id: String,
    /// When the entry was logged (UTC)
    pub timestamp: DateTime<Utc>,
    /// UTC calendar date the entry accumulates into
    pub date: NaiveDate,
    pub food_id: String,
    pub food_name: String,
    pub quantity_grams: Decimal,
    /// Always "g"; other units are rejected at validation
    pub unit: String,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
    /// "breakfast" / "lunch" / "dinner" / "snack" (free-form)
    pub meal_type: Option<String>,
}
