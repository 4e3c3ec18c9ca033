// SPDX-License-Identifier: MIT

//! Per-user, per-day nutrition aggregates.
//!
//! One accumulator record per (user, date). The record is never rebuilt
//! from the log-entry history; every logged entry folds its macros in
//! exactly once via the store's atomic update.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A scaled set of macro values: the output of the macro calculator and
/// the delta applied to a [`DailyAggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macros {
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
}

/// Running nutrition totals for one (user, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    pub user_id: String,
    pub date: NaiveDate,
    pub total_calories: Decimal,
    pub total_protein: Decimal,
    pub total_carbs: Decimal,
    pub total_fat: Decimal,
    /// Number of log entries folded into this record
    pub entry_count: u32,
}

impl DailyAggregate {
    /// The empty aggregate: what a day with no entries reads as.
    pub fn zeroed(user_id: &str, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.to_string(),
            date,
            total_calories: Decimal::ZERO,
            total_protein: Decimal::ZERO,
            total_carbs: Decimal::ZERO,
            total_fat: Decimal::ZERO,
            entry_count: 0,
        }
    }

    /// Fold one entry's macros into the totals.
    pub fn apply(&mut self, delta: &Macros) {
        self.total_calories += delta.calories;
        self.total_protein += delta.protein;
        self.total_carbs += delta.carbs;
        self.total_fat += delta.fat;
        self.entry_count += 1;
    }
}
