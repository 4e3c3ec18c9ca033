// SPDX-License-Identifier: MIT

//! User profile model.

use serde::{Deserialize, Serialize};

/// End-user or trainer profile.
///
/// Profile storage is plain put/get; the role string distinguishes the
/// two onboarding flows but carries no authorization semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID (also used as document ID)
    pub user_id: String,
    pub name: String,
    /// "user" or "trainer"
    pub role: String,
    pub email: String,
    pub weight_lbs: Option<f64>,
    pub height_feet: Option<u32>,
    pub height_inches: Option<u32>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    /// When the profile was created (RFC3339)
    pub created_at: String,
}
