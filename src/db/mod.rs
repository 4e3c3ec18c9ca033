// SPDX-License-Identifier: MIT

//! Database layer (embedded document store).

pub mod store;

pub use store::Datastore;

/// Table names as constants.
pub mod tables {
    pub const USERS: &str = "users";
    pub const FOODS: &str = "foods";
    pub const TRAINERS: &str = "trainers";
    pub const TRAINER_ASSIGNMENTS: &str = "trainer_assignments";
    pub const DIET_LOGS: &str = "diet_logs";
    /// Daily aggregates (keyed by user_id + date)
    pub const DAILY_AGGREGATES: &str = "daily_aggregates";
    pub const MESSAGES: &str = "messages";
}
