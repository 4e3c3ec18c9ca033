// SPDX-License-Identifier: MIT

//! Trainer assignment: capacity-aware matching and reversible
//! unassignment.
//!
//! The trainer's `current_client_count` is a denormalized counter kept in
//! step with the active-assignment set through the store's atomic adjust.
//! `assign` supersedes any prior active assignment before writing the new
//! one, so a user holds at most one active assignment at a time.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::Datastore;
use crate::error::{AppError, Result};
use crate::models::{Assignment, AssignmentStatus, Trainer};
use crate::services::notify::NotificationChannel;
use crate::time_utils::format_utc_rfc3339;

const DEFAULT_MAX_CLIENTS: u32 = 10;

/// Trainer directory and assignment service.
#[derive(Clone)]
pub struct AssignmentService {
    db: Datastore,
    channel: Option<Arc<dyn NotificationChannel>>,
}

impl AssignmentService {
    pub fn new(db: Datastore, channel: Option<Arc<dyn NotificationChannel>>) -> Self {
        Self { db, channel }
    }

    /// Create a trainer with a zero client count.
    ///
    /// Subscribing the trainer's email to the notification topic is a
    /// one-time side effect of creation (never of assignment) and is
    /// best-effort: a subscribe failure does not fail the create.
    pub async fn create_trainer(
        &self,
        name: &str,
        email: &str,
        max_clients: Option<u32>,
    ) -> Result<Trainer> {
        if name.is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }
        if email.is_empty() {
            return Err(AppError::BadRequest("email is required".to_string()));
        }

        let trainer = Trainer {
            trainer_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            max_clients: max_clients.unwrap_or(DEFAULT_MAX_CLIENTS),
            current_client_count: 0,
            created_at: format_utc_rfc3339(Utc::now()),
        };
        self.db.put_trainer(&trainer).await?;

        if let Some(channel) = &self.channel {
            if let Err(err) = channel.subscribe_email(&trainer.email).await {
                tracing::warn!(
                    trainer_id = %trainer.trainer_id,
                    error = %err,
                    "Trainer email subscription failed"
                );
            }
        }

        tracing::info!(trainer_id = %trainer.trainer_id, "Trainer created");
        Ok(trainer)
    }

    pub async fn list_trainers(&self) -> Result<Vec<Trainer>> {
        self.db.scan_trainers().await
    }

    /// Assign a trainer to a user.
    ///
    /// Manual mode (`trainer_id` given): the trainer must exist; no
    /// capacity check is applied. Auto mode: pick the least-loaded
    /// trainer with free capacity, ties broken by scan order.
    pub async fn assign(&self, user_id: &str, trainer_id: Option<&str>) -> Result<Assignment> {
        if user_id.is_empty() {
            return Err(AppError::BadRequest("userId is required".to_string()));
        }

        let trainer = match trainer_id {
            Some(id) => self
                .db
                .get_trainer(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Trainer {} not found", id)))?,
            None => self.find_auto_match().await?.ok_or_else(|| {
                AppError::Capacity("No available trainers to assign".to_string())
            })?,
        };

        // Supersede: at most one active assignment per user.
        self.remove_active_assignments(user_id).await?;

        let assignment = Assignment {
            user_id: user_id.to_string(),
            trainer_id: trainer.trainer_id.clone(),
            status: AssignmentStatus::Active,
            assigned_at: format_utc_rfc3339(Utc::now()),
            removed_at: None,
        };
        self.db.put_assignment(&assignment).await?;
        self.db
            .adjust_client_count(&trainer.trainer_id, 1)
            .await?;

        tracing::info!(
            user_id,
            trainer_id = %trainer.trainer_id,
            "Trainer assigned"
        );
        Ok(assignment)
    }

    /// Unassign the user's trainer(s).
    ///
    /// Every still-active record is marked removed and its trainer's
    /// counter decremented once, floored at zero. Fails with not-found
    /// only when the user has no assignment records at all; a user whose
    /// records are all historical unassigns to a no-op.
    pub async fn unassign(&self, user_id: &str) -> Result<usize> {
        if user_id.is_empty() {
            return Err(AppError::BadRequest("userId is required".to_string()));
        }

        let assignments = self.db.assignments_for_user(user_id).await?;
        if assignments.is_empty() {
            return Err(AppError::NotFound(format!(
                "No trainer assignment found for user {}",
                user_id
            )));
        }

        let removed = self.remove_active_assignments(user_id).await?;
        tracing::info!(user_id, removed, "Trainer unassigned");
        Ok(removed)
    }

    /// Active assignments for a trainer (scan-and-filter).
    pub async fn clients(&self, trainer_id: &str) -> Result<Vec<Assignment>> {
        let assignments = self.db.scan_assignments().await?;
        Ok(assignments
            .into_iter()
            .filter(|a| a.trainer_id == trainer_id && a.is_active())
            .collect())
    }

    /// Mark every active assignment for `user_id` removed, decrementing
    /// each referenced trainer's counter once. Returns how many records
    /// were removed.
    async fn remove_active_assignments(&self, user_id: &str) -> Result<usize> {
        let mut removed = 0;
        for assignment in self.db.assignments_for_user(user_id).await? {
            if !assignment.is_active() {
                continue;
            }
            let mut record = assignment;
            record.status = AssignmentStatus::Removed;
            record.removed_at = Some(format_utc_rfc3339(Utc::now()));
            self.db.put_assignment(&record).await?;
            self.db.adjust_client_count(&record.trainer_id, -1).await?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Scan trainers, keep the ones with free capacity, and pick the one
    /// with the lowest client count. Ties fall to whichever the scan
    /// yielded first.
    async fn find_auto_match(&self) -> Result<Option<Trainer>> {
        let mut available: Vec<Trainer> = self
            .db
            .scan_trainers()
            .await?
            .into_iter()
            .filter(|t| t.current_client_count < t.max_clients)
            .collect();

        available.sort_by_key(|t| t.current_client_count);
        Ok(available.into_iter().next())
    }
}
