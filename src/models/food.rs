// SPDX-License-Identifier: MIT

//! Food reference data: per-unit macro values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Immutable food reference record.
///
/// Per-unit macros describe one reference portion of `grams_per_unit`
/// grams (typically 100 g). All macro math stays in `Decimal` to avoid
/// float drift on the nutrition path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    /// Food ID (also used as document ID)
    pub food_id: String,
    /// Display name ("Chicken breast")
    pub name: String,
    /// Grams in one reference portion
    pub grams_per_unit: Decimal,
    /// Calories (kcal) per reference portion
    pub calories_per_unit: Decimal,
    /// Protein grams per reference portion
    pub protein_per_unit: Decimal,
    /// Carbohydrate grams per reference portion
    pub carbs_per_unit: Decimal,
    /// Fat grams per reference portion
    pub fat_per_unit: Decimal,
}
