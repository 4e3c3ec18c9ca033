// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod aggregate;
pub mod food;
pub mod log;
pub mod message;
pub mod trainer;
pub mod user;

pub use aggregate::{DailyAggregate, Macros};
pub use food::Food;
pub use log::LogEntry;
pub use message::{ConversationMessage, SenderRole};
pub use trainer::{Assignment, AssignmentStatus, Trainer};
pub use user::UserProfile;
