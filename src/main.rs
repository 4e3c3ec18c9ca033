// SPDX-License-Identifier: MIT

//! NutriCoach API Server
//!
//! Tracks per-user nutrition intake and routes notifications between
//! users and their assigned coaching trainers.

use nutricoach::{
    config::Config,
    db::Datastore,
    services::{AssignmentService, DietLogService, NotificationChannel, Notifier, RollupService, SnsChannel},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting NutriCoach API");

    // Initialize the document store
    let db = Datastore::new();

    // Notification channel is optional: without a topic ARN every
    // notification path silently skips publishing.
    let channel: Option<Arc<dyn NotificationChannel>> = match &config.notifications_topic_arn {
        Some(topic_arn) => {
            tracing::info!(topic = %topic_arn, "Notification channel configured");
            Some(Arc::new(SnsChannel::new(topic_arn).await))
        }
        None => {
            tracing::info!("No notification topic configured; notifications disabled");
            None
        }
    };

    let notifier = Notifier::new(db.clone(), channel.clone());
    let diet_logs = DietLogService::new(db.clone(), notifier.clone());
    let assignments = AssignmentService::new(db.clone(), channel);
    let rollup = RollupService::new(db.clone(), notifier);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        diet_logs,
        assignments,
        rollup,
    });

    // Build router
    let app = nutricoach::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nutricoach=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
