// SPDX-License-Identifier: MIT

//! Trainer and assignment models.

use serde::{Deserialize, Serialize};

/// Coaching trainer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    /// Trainer ID (also used as document ID)
    pub trainer_id: String,
    pub name: String,
    pub email: String,
    /// Maximum number of concurrently assigned clients
    pub max_clients: u32,
    /// Denormalized count of active assignments referencing this trainer.
    /// Maintained through the store's atomic adjust, never recomputed
    /// from the assignment set.
    pub current_client_count: u32,
    /// When the trainer was created (RFC3339)
    pub created_at: String,
}

/// Assignment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
    Removed,
}

/// A user ↔ trainer assignment.
///
/// Keyed by (user_id, trainer_id). Status transitions rewrite the record
/// in place; removed records are kept as history rather than deleted. The
/// assignment service guarantees at most one `Active` record per user by
/// superseding any prior active assignment before writing a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub user_id: String,
    pub trainer_id: String,
    pub status: AssignmentStatus,
    /// When the assignment became active (RFC3339)
    pub assigned_at: String,
    /// When the assignment was removed (RFC3339), if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_at: Option<String>,
}

impl Assignment {
    pub fn is_active(&self) -> bool {
        self.status == AssignmentStatus::Active
    }
}
