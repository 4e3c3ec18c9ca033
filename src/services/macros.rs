// SPDX-License-Identifier: MIT

//! Macro calculator: scale a food's per-unit macros to a requested
//! quantity.
//!
//! Everything here is `Decimal` arithmetic. Rounding is two-decimal
//! round-half-up (commercial rounding), not banker's rounding, so that
//! repeated logging never silently under-reports totals.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Food, Macros};

/// Scale `food`'s per-unit macros to `quantity_grams`.
///
/// Scale factor is `quantity / grams_per_unit`. A non-positive
/// `grams_per_unit` yields a zero factor and therefore all-zero macros;
/// this is a defined edge case, never a division fault.
pub fn scale_for_quantity(food: &Food, quantity_grams: Decimal) -> Macros {
    let factor = if food.grams_per_unit > Decimal::ZERO {
        quantity_grams / food.grams_per_unit
    } else {
        Decimal::ZERO
    };

    Macros {
        calories: round_half_up(food.calories_per_unit * factor),
        protein: round_half_up(food.protein_per_unit * factor),
        carbs: round_half_up(food.carbs_per_unit * factor),
        fat: round_half_up(food.fat_per_unit * factor),
    }
}

/// Quantize to two decimal places, ties rounding away from zero.
fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn chicken_breast() -> Food {
        Food {
            food_id: "chicken-breast".to_string(),
            name: "Chicken breast".to_string(),
            grams_per_unit: dec!(100),
            calories_per_unit: dec!(165),
            protein_per_unit: dec!(31),
            carbs_per_unit: dec!(0),
            fat_per_unit: dec!(3.6),
        }
    }

    #[test]
    fn test_scale_150g_chicken_breast() {
        let macros = scale_for_quantity(&chicken_breast(), dec!(150));
        assert_eq!(macros.calories, dec!(247.50));
        assert_eq!(macros.protein, dec!(46.50));
        assert_eq!(macros.carbs, dec!(0.00));
        assert_eq!(macros.fat, dec!(5.40));
    }

    #[test]
    fn test_zero_grams_per_unit_yields_zero_macros() {
        let mut food = chicken_breast();
        food.grams_per_unit = Decimal::ZERO;
        let macros = scale_for_quantity(&food, dec!(150));
        assert_eq!(macros.calories, Decimal::ZERO);
        assert_eq!(macros.protein, Decimal::ZERO);
        assert_eq!(macros.carbs, Decimal::ZERO);
        assert_eq!(macros.fat, Decimal::ZERO);
    }

    #[test]
    fn test_rounding_is_half_up_not_half_even() {
        let food = Food {
            food_id: "f".to_string(),
            name: "f".to_string(),
            grams_per_unit: dec!(100),
            // 0.125 per gram -> 12.5 per 100 g; 1 g gives 0.125 -> 0.13
            calories_per_unit: dec!(12.5),
            protein_per_unit: dec!(0),
            carbs_per_unit: dec!(0),
            fat_per_unit: dec!(0),
        };
        let macros = scale_for_quantity(&food, dec!(1));
        // Half-even would give 0.12 here.
        assert_eq!(macros.calories, dec!(0.13));
    }

    #[test]
    fn test_deterministic_for_repeated_inputs() {
        let a = scale_for_quantity(&chicken_breast(), dec!(37.5));
        let b = scale_for_quantity(&chicken_breast(), dec!(37.5));
        assert_eq!(a, b);
    }
}
