// SPDX-License-Identifier: MIT

//! Notification fan-out.
//!
//! Publishes structured events to a shared topic and, for daily rollups,
//! appends a system-authored message into the user–trainer conversation.
//! Publication is fire-and-forget: the aggregate write that triggered a
//! notification is the durable source of truth, and a failed publish is
//! logged and never retried.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::Datastore;
use crate::error::Result;
use crate::models::message::conversation_id;
use crate::models::{ConversationMessage, DailyAggregate, LogEntry, SenderRole};
use crate::time_utils::format_utc_rfc3339;

/// Totals snapshot embedded in outbound events.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroSummary {
    pub total_calories: Decimal,
    pub total_protein: Decimal,
    pub total_carbs: Decimal,
    pub total_fat: Decimal,
    pub entry_count: u32,
}

impl From<&DailyAggregate> for MacroSummary {
    fn from(aggregate: &DailyAggregate) -> Self {
        Self {
            total_calories: aggregate.total_calories,
            total_protein: aggregate.total_protein,
            total_carbs: aggregate.total_carbs,
            total_fat: aggregate.total_fat,
            entry_count: aggregate.entry_count,
        }
    }
}

/// Structured event published to the shared notification topic.
#[derive(Debug, Clone, Serialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ChannelEvent {
    UserLoggedFood {
        user_id: String,
        trainer_id: String,
        food_name: String,
        quantity: Decimal,
        unit: String,
        calories: Decimal,
        date: NaiveDate,
        summary: MacroSummary,
    },
    DailySummary {
        user_id: String,
        trainer_id: String,
        date: NaiveDate,
        total_calories: Decimal,
        total_protein: Decimal,
        total_carbs: Decimal,
        total_fat: Decimal,
        entry_count: u32,
    },
}

/// Outbound notification channel (shared topic).
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn publish(&self, subject: &str, event: &ChannelEvent) -> anyhow::Result<()>;

    /// One-time email subscription to the topic (trainer creation).
    async fn subscribe_email(&self, email: &str) -> anyhow::Result<()>;
}

/// SNS-backed notification channel.
pub struct SnsChannel {
    client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl SnsChannel {
    pub async fn new(topic_arn: &str) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: aws_sdk_sns::Client::new(&aws_config),
            topic_arn: topic_arn.to_string(),
        }
    }
}

#[async_trait]
impl NotificationChannel for SnsChannel {
    async fn publish(&self, subject: &str, event: &ChannelEvent) -> anyhow::Result<()> {
        let message = serde_json::to_string(event).context("serialize channel event")?;
        self.client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .context("sns publish")?;
        Ok(())
    }

    async fn subscribe_email(&self, email: &str) -> anyhow::Result<()> {
        self.client
            .subscribe()
            .topic_arn(&self.topic_arn)
            .protocol("email")
            .endpoint(email)
            .send()
            .await
            .context("sns subscribe")?;
        Ok(())
    }
}

/// Fan-out service tying the channel and conversation store together.
#[derive(Clone)]
pub struct Notifier {
    db: Datastore,
    channel: Option<Arc<dyn NotificationChannel>>,
}

impl Notifier {
    pub fn new(db: Datastore, channel: Option<Arc<dyn NotificationChannel>>) -> Self {
        Self { db, channel }
    }

    /// Whether an outbound channel is configured at all.
    pub fn channel_configured(&self) -> bool {
        self.channel.is_some()
    }

    /// Resolve the user's active trainer by scanning assignment records.
    pub async fn active_trainer_for_user(&self, user_id: &str) -> Result<Option<String>> {
        let assignments = self.db.scan_assignments().await?;
        Ok(assignments
            .into_iter()
            .find(|a| a.user_id == user_id && a.is_active())
            .map(|a| a.trainer_id))
    }

    /// Notify the user's trainer that a food entry was logged.
    ///
    /// Silently skipped when no channel is configured or the user has no
    /// active trainer; a publish failure is logged and swallowed.
    pub async fn food_logged(&self, entry: &LogEntry, aggregate: &DailyAggregate) -> Result<()> {
        let Some(channel) = &self.channel else {
            return Ok(());
        };
        let Some(trainer_id) = self.active_trainer_for_user(&entry.user_id).await? else {
            tracing::debug!(user_id = %entry.user_id, "No active trainer; skipping notification");
            return Ok(());
        };

        let event = ChannelEvent::UserLoggedFood {
            user_id: entry.user_id.clone(),
            trainer_id: trainer_id.clone(),
            food_name: entry.food_name.clone(),
            quantity: entry.quantity_grams,
            unit: entry.unit.clone(),
            calories: entry.calories,
            date: entry.date,
            summary: MacroSummary::from(aggregate),
        };

        if let Err(err) = channel.publish("NutriCoach - User logged food", &event).await {
            tracing::warn!(
                user_id = %entry.user_id,
                trainer_id = %trainer_id,
                error = %err,
                "Food-logged publish failed; not retried"
            );
        }
        Ok(())
    }

    /// Publish a prior-day rollup event, then append the system summary
    /// message into the conversation regardless of the publish outcome.
    pub async fn daily_rollup(
        &self,
        user_id: &str,
        trainer_id: &str,
        aggregate: &DailyAggregate,
    ) -> Result<()> {
        if let Some(channel) = &self.channel {
            let event = ChannelEvent::DailySummary {
                user_id: user_id.to_string(),
                trainer_id: trainer_id.to_string(),
                date: aggregate.date,
                total_calories: aggregate.total_calories,
                total_protein: aggregate.total_protein,
                total_carbs: aggregate.total_carbs,
                total_fat: aggregate.total_fat,
                entry_count: aggregate.entry_count,
            };
            let subject = format!("Daily summary for user {} on {}", user_id, aggregate.date);
            if let Err(err) = channel.publish(&subject, &event).await {
                tracing::warn!(
                    user_id,
                    trainer_id,
                    error = %err,
                    "Daily-rollup publish failed; not retried"
                );
            }
        }

        let message = ConversationMessage {
            conversation_id: conversation_id(user_id, trainer_id),
            timestamp: format_utc_rfc3339(Utc::now()),
            user_id: user_id.to_string(),
            trainer_id: trainer_id.to_string(),
            sender_role: SenderRole::System,
            message: format!(
                "Daily summary for {}: {} kcal, Protein {}g, Carbs {}g, Fat {}g from {} entries.",
                aggregate.date,
                aggregate.total_calories,
                aggregate.total_protein,
                aggregate.total_carbs,
                aggregate.total_fat,
                aggregate.entry_count
            ),
            kind: Some("daily_summary".to_string()),
        };
        self.db.append_message(&message).await
    }
}
