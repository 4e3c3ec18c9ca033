// SPDX-License-Identifier: MIT

//! NutriCoach: per-user nutrition tracking with trainer coaching.
//!
//! This crate provides the backend API for logging food entries into
//! per-day macro aggregates, matching users with coaching trainers, and
//! fanning out best-effort trainer notifications.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Datastore;
use services::{AssignmentService, DietLogService, RollupService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Datastore,
    pub diet_logs: DietLogService,
    pub assignments: AssignmentService,
    pub rollup: RollupService,
}
