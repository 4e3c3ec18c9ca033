// SPDX-License-Identifier: MIT

//! Daily rollup job.
//!
//! Once per day an external scheduler posts to the task endpoint, which
//! runs this batch: find yesterday's aggregates, resolve each user's
//! active trainer, and emit one rollup notification each. The job carries
//! no dedup marker — re-running it for the same date re-sends every
//! rollup and re-appends the conversation summaries (at-least-once by
//! design).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::db::Datastore;
use crate::error::Result;
use crate::services::notify::Notifier;
use crate::time_utils::day_before;

/// What one rollup run did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupOutcome {
    /// The date whose aggregates were rolled up (UTC "yesterday")
    pub processed_date: NaiveDate,
    /// Number of rollup notifications emitted
    pub notified: usize,
}

/// Daily rollup service.
#[derive(Clone)]
pub struct RollupService {
    db: Datastore,
    notifier: Notifier,
}

impl RollupService {
    pub fn new(db: Datastore, notifier: Notifier) -> Self {
        Self { db, notifier }
    }

    /// Roll up the day before `now` (UTC).
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RollupOutcome> {
        let target_date = day_before(now);

        if !self.notifier.channel_configured() {
            tracing::debug!(%target_date, "No notification channel configured; rollup is a no-op");
            return Ok(RollupOutcome {
                processed_date: target_date,
                notified: 0,
            });
        }

        let aggregates = self.db.aggregates_for_date(target_date).await?;
        tracing::info!(
            %target_date,
            candidates = aggregates.len(),
            "Running daily rollup"
        );

        let mut notified = 0;
        for aggregate in aggregates {
            let Some(trainer_id) = self
                .notifier
                .active_trainer_for_user(&aggregate.user_id)
                .await?
            else {
                tracing::debug!(user_id = %aggregate.user_id, "No trainer; skipping rollup");
                continue;
            };

            self.notifier
                .daily_rollup(&aggregate.user_id, &trainer_id, &aggregate)
                .await?;
            notified += 1;
        }

        tracing::info!(%target_date, notified, "Daily rollup complete");
        Ok(RollupOutcome {
            processed_date: target_date,
            notified,
        })
    }
}
