// SPDX-License-Identifier: MIT

//! Domain services.

pub mod assignment;
pub mod diet_log;
pub mod macros;
pub mod notify;
pub mod rollup;

pub use assignment::AssignmentService;
pub use diet_log::{DietLogService, LogEntryRequest};
pub use notify::{ChannelEvent, NotificationChannel, Notifier, SnsChannel};
pub use rollup::{RollupOutcome, RollupService};
