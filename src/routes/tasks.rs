// SPDX-License-Identifier: MIT

//! Task handler routes for scheduler callbacks.
//!
//! The daily rollup is triggered by an external scheduler, not by this
//! service; the endpoint just runs one batch and reports what it did.

use crate::error::Result;
use crate::services::RollupOutcome;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tasks/daily-rollup", post(run_daily_rollup))
}

/// Run the prior-day rollup once.
///
/// Re-running for the same date re-sends every rollup notification
/// (at-least-once, no dedup marker).
async fn run_daily_rollup(State(state): State<Arc<AppState>>) -> Result<Json<RollupOutcome>> {
    tracing::info!("Daily rollup triggered");
    let outcome = state.rollup.run(chrono::Utc::now()).await?;
    Ok(Json(outcome))
}
