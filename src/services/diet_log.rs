// SPDX-License-Identifier: MIT

//! Food logging workflow.
//!
//! The core pipeline: validate → resolve food reference → scale macros →
//! persist the immutable log entry → atomically accumulate the daily
//! aggregate → best-effort trainer notification. Only the notification
//! step is allowed to fail without failing the request; everything before
//! it surfaces to the caller.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::db::Datastore;
use crate::error::{AppError, Result};
use crate::models::{DailyAggregate, LogEntry};
use crate::services::macros::scale_for_quantity;
use crate::services::notify::Notifier;

/// The only accepted quantity unit.
const UNIT_GRAMS: &str = "g";

/// A validated log-entry request.
#[derive(Debug, Clone)]
pub struct LogEntryRequest {
    pub user_id: String,
    pub food_id: String,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub meal_type: Option<String>,
}

/// Food logging service.
#[derive(Clone)]
pub struct DietLogService {
    db: Datastore,
    notifier: Notifier,
}

impl DietLogService {
    pub fn new(db: Datastore, notifier: Notifier) -> Self {
        Self { db, notifier }
    }

    /// Log a food entry and fold it into the user's daily aggregate.
    ///
    /// Returns the stored entry and the updated aggregate. The trainer
    /// notification runs strictly after the aggregate commit and its
    /// failure is logged, never surfaced.
    pub async fn log_entry(&self, req: LogEntryRequest) -> Result<(LogEntry, DailyAggregate)> {
        if req.user_id.is_empty() {
            return Err(AppError::BadRequest("userId is required".to_string()));
        }
        if req.food_id.is_empty() {
            return Err(AppError::BadRequest("foodId is required".to_string()));
        }
        if req.quantity <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "quantity must be a positive number".to_string(),
            ));
        }
        let unit = req.unit.as_deref().unwrap_or(UNIT_GRAMS);
        if unit != UNIT_GRAMS {
            // Hard product constraint, not a rounding shortcut.
            return Err(AppError::BadRequest(
                "only grams ('g') is supported as unit".to_string(),
            ));
        }

        let food = self
            .db
            .get_food(&req.food_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Food '{}' not found", req.food_id)))?;

        let macros = scale_for_quantity(&food, req.quantity);
        tracing::debug!(
            user_id = %req.user_id,
            food_id = %req.food_id,
            calories = %macros.calories,
            protein = %macros.protein,
            carbs = %macros.carbs,
            fat = %macros.fat,
            "Computed macros"
        );

        let timestamp = Utc::now();
        let entry = LogEntry {
            user_id: req.user_id.clone(),
            timestamp,
            date: timestamp.date_naive(),
            food_id: food.food_id.clone(),
            food_name: food.name.clone(),
            quantity_grams: req.quantity,
            unit: unit.to_string(),
            calories: macros.calories,
            protein: macros.protein,
            carbs: macros.carbs,
            fat: macros.fat,
            meal_type: req.meal_type,
        };

        self.db.put_log_entry(&entry).await?;

        // The aggregate write is the durable commit point; a failure here
        // means the entry is not considered recorded.
        let aggregate = self
            .db
            .apply_aggregate_delta(&req.user_id, entry.date, &macros)
            .await?;

        tracing::info!(
            user_id = %req.user_id,
            food_id = %req.food_id,
            entry_count = aggregate.entry_count,
            "Diet log created"
        );

        if let Err(err) = self.notifier.food_logged(&entry, &aggregate).await {
            tracing::warn!(
                user_id = %req.user_id,
                error = %err,
                "Food-logged notification failed after aggregate commit"
            );
        }

        Ok((entry, aggregate))
    }

    /// Today's log entries for a user, oldest first.
    pub async fn today_logs(&self, user_id: &str) -> Result<Vec<LogEntry>> {
        self.db
            .logs_for_user_on(user_id, crate::time_utils::today_utc())
            .await
    }

    /// Today's aggregate for a user; a day with no entries reads as the
    /// zeroed default.
    pub async fn today_summary(&self, user_id: &str) -> Result<DailyAggregate> {
        self.db
            .get_aggregate(user_id, crate::time_utils::today_utc())
            .await
    }
}
