// SPDX-License-Identifier: MIT

//! Embedded document store with typed per-table operations.
//!
//! Tables mirror the hosted key-value layout the service was designed
//! around: one document per key, full-table scans for secondary lookups.
//! The handle is cheap to clone; all clones share the same tables.
//!
//! Two operations are deliberately more than plain put/get:
//! - [`Datastore::apply_aggregate_delta`] folds a log entry's macros into
//!   the per-(user, date) aggregate under the table's per-key lock, so
//!   concurrent accumulations never lose a delta.
//! - [`Datastore::adjust_client_count`] is an atomic increment/decrement
//!   of a trainer's denormalized client counter, floored at zero.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;

use crate::db::tables;
use crate::error::{AppError, Result};
use crate::models::{
    Assignment, ConversationMessage, DailyAggregate, Food, LogEntry, Macros, Trainer, UserProfile,
};

#[derive(Default)]
struct Tables {
    foods: DashMap<String, Food>,
    users: DashMap<String, UserProfile>,
    trainers: DashMap<String, Trainer>,
    /// Keyed by (user_id, trainer_id)
    assignments: DashMap<(String, String), Assignment>,
    /// Keyed by (user_id, date)
    aggregates: DashMap<(String, NaiveDate), DailyAggregate>,
    /// Per-user log entries, insertion-ordered
    diet_logs: DashMap<String, Vec<LogEntry>>,
    /// Per-conversation messages, insertion-ordered
    messages: DashMap<String, Vec<ConversationMessage>>,
}

/// Document store client.
#[derive(Clone, Default)]
pub struct Datastore {
    inner: Arc<Tables>,
}

impl Datastore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Food Operations ─────────────────────────────────────────

    pub async fn get_food(&self, food_id: &str) -> Result<Option<Food>> {
        Ok(self.inner.foods.get(food_id).map(|f| f.clone()))
    }

    pub async fn put_food(&self, food: &Food) -> Result<()> {
        tracing::debug!(table = tables::FOODS, food_id = %food.food_id, "put");
        self.inner.foods.insert(food.food_id.clone(), food.clone());
        Ok(())
    }

    /// Scan all foods (small reference table).
    pub async fn scan_foods(&self) -> Result<Vec<Food>> {
        Ok(self.inner.foods.iter().map(|f| f.clone()).collect())
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.inner.users.get(user_id).map(|u| u.clone()))
    }

    pub async fn put_user(&self, user: &UserProfile) -> Result<()> {
        tracing::debug!(table = tables::USERS, user_id = %user.user_id, "put");
        self.inner.users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    // ─── Trainer Operations ──────────────────────────────────────

    pub async fn get_trainer(&self, trainer_id: &str) -> Result<Option<Trainer>> {
        Ok(self.inner.trainers.get(trainer_id).map(|t| t.clone()))
    }

    pub async fn put_trainer(&self, trainer: &Trainer) -> Result<()> {
        tracing::debug!(table = tables::TRAINERS, trainer_id = %trainer.trainer_id, "put");
        self.inner
            .trainers
            .insert(trainer.trainer_id.clone(), trainer.clone());
        Ok(())
    }

    /// Scan all trainers. Iteration order is implementation-defined.
    pub async fn scan_trainers(&self) -> Result<Vec<Trainer>> {
        Ok(self.inner.trainers.iter().map(|t| t.clone()).collect())
    }

    /// Atomically adjust a trainer's client counter by `delta`, floored
    /// at zero. Returns the updated record, or `None` for an unknown
    /// trainer.
    pub async fn adjust_client_count(
        &self,
        trainer_id: &str,
        delta: i64,
    ) -> Result<Option<Trainer>> {
        match self.inner.trainers.get_mut(trainer_id) {
            Some(mut trainer) => {
                let next = (i64::from(trainer.current_client_count) + delta).max(0);
                trainer.current_client_count = next as u32;
                Ok(Some(trainer.clone()))
            }
            None => Ok(None),
        }
    }

    // ─── Assignment Operations ───────────────────────────────────

    pub async fn put_assignment(&self, assignment: &Assignment) -> Result<()> {
        tracing::debug!(
            table = tables::TRAINER_ASSIGNMENTS,
            user_id = %assignment.user_id,
            trainer_id = %assignment.trainer_id,
            status = ?assignment.status,
            "put"
        );
        self.inner.assignments.insert(
            (assignment.user_id.clone(), assignment.trainer_id.clone()),
            assignment.clone(),
        );
        Ok(())
    }

    /// All assignment records (any status) for a user.
    pub async fn assignments_for_user(&self, user_id: &str) -> Result<Vec<Assignment>> {
        Ok(self
            .inner
            .assignments
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.clone())
            .collect())
    }

    /// Scan all assignment records. Iteration order is
    /// implementation-defined.
    pub async fn scan_assignments(&self) -> Result<Vec<Assignment>> {
        Ok(self.inner.assignments.iter().map(|a| a.clone()).collect())
    }

    // ─── Daily Aggregate Operations ──────────────────────────────

    /// Read the aggregate for (user, date); a day with no entries reads
    /// as the zeroed default. Never fails.
    pub async fn get_aggregate(&self, user_id: &str, date: NaiveDate) -> Result<DailyAggregate> {
        Ok(self
            .inner
            .aggregates
            .get(&(user_id.to_string(), date))
            .map(|a| a.clone())
            .unwrap_or_else(|| DailyAggregate::zeroed(user_id, date)))
    }

    /// Fold `delta` into the (user, date) aggregate and bump its entry
    /// count, creating the record on first use. Runs under the table's
    /// per-key write lock: concurrent calls for the same key serialize,
    /// so no delta is ever lost. Returns the updated record.
    pub async fn apply_aggregate_delta(
        &self,
        user_id: &str,
        date: NaiveDate,
        delta: &Macros,
    ) -> Result<DailyAggregate> {
        tracing::debug!(table = tables::DAILY_AGGREGATES, user_id, %date, "accumulate");
        let mut aggregate = self
            .inner
            .aggregates
            .entry((user_id.to_string(), date))
            .or_insert_with(|| DailyAggregate::zeroed(user_id, date));
        aggregate.apply(delta);
        Ok(aggregate.clone())
    }

    /// Scan all aggregates whose date equals `date`.
    pub async fn aggregates_for_date(&self, date: NaiveDate) -> Result<Vec<DailyAggregate>> {
        Ok(self
            .inner
            .aggregates
            .iter()
            .filter(|a| a.date == date)
            .map(|a| a.clone())
            .collect())
    }

    // ─── Diet Log Operations ─────────────────────────────────────

    pub async fn put_log_entry(&self, entry: &LogEntry) -> Result<()> {
        tracing::debug!(
            table = tables::DIET_LOGS,
            user_id = %entry.user_id,
            food_id = %entry.food_id,
            "put"
        );
        self.inner
            .diet_logs
            .entry(entry.user_id.clone())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    /// A user's log entries for one date, ordered by timestamp ascending.
    pub async fn logs_for_user_on(&self, user_id: &str, date: NaiveDate) -> Result<Vec<LogEntry>> {
        let mut entries: Vec<LogEntry> = self
            .inner
            .diet_logs
            .get(user_id)
            .map(|logs| logs.iter().filter(|e| e.date == date).cloned().collect())
            .unwrap_or_default();
        entries.sort_by_key(|e| e.timestamp);
        Ok(entries)
    }

    // ─── Conversation Operations ─────────────────────────────────

    pub async fn append_message(&self, message: &ConversationMessage) -> Result<()> {
        tracing::debug!(
            table = tables::MESSAGES,
            conversation_id = %message.conversation_id,
            sender_role = ?message.sender_role,
            "append"
        );
        self.inner
            .messages
            .entry(message.conversation_id.clone())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    /// Messages for a conversation, oldest first, capped at `limit`.
    pub async fn conversation(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationMessage>> {
        if limit == 0 {
            return Err(AppError::BadRequest("limit must be positive".to_string()));
        }
        Ok(self
            .inner
            .messages
            .get(conversation_id)
            .map(|msgs| msgs.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
