// SPDX-License-Identifier: MIT

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use nutricoach::config::Config;
use nutricoach::db::Datastore;
use nutricoach::models::{Assignment, AssignmentStatus, Food, Trainer};
use nutricoach::routes::create_router;
use nutricoach::services::{
    AssignmentService, ChannelEvent, DietLogService, NotificationChannel, Notifier, RollupService,
};
use nutricoach::AppState;
use rust_decimal_macros::dec;
use tower::ServiceExt;

/// Notification channel test double: records everything, never fails.
#[derive(Default)]
pub struct CaptureChannel {
    pub published: Mutex<Vec<(String, serde_json::Value)>>,
    pub subscribed: Mutex<Vec<String>>,
}

impl CaptureChannel {
    pub fn published_types(&self) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|(_, event)| event["type"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl NotificationChannel for CaptureChannel {
    async fn publish(&self, subject: &str, event: &ChannelEvent) -> anyhow::Result<()> {
        self.published
            .lock()
            .unwrap()
            .push((subject.to_string(), serde_json::to_value(event)?));
        Ok(())
    }

    async fn subscribe_email(&self, email: &str) -> anyhow::Result<()> {
        self.subscribed.lock().unwrap().push(email.to_string());
        Ok(())
    }
}

/// Create a test app with the capture channel wired in.
/// Returns the router, the shared state, and the channel for assertions.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>, Arc<CaptureChannel>) {
    let capture = Arc::new(CaptureChannel::default());
    let (app, state) = create_app_with_channel(Some(capture.clone() as Arc<dyn NotificationChannel>));
    (app, state, capture)
}

/// Create a test app with no notification channel configured.
#[allow(dead_code)]
pub fn create_test_app_offline() -> (Router, Arc<AppState>) {
    create_app_with_channel(None)
}

fn create_app_with_channel(
    channel: Option<Arc<dyn NotificationChannel>>,
) -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = Datastore::new();

    let notifier = Notifier::new(db.clone(), channel.clone());
    let diet_logs = DietLogService::new(db.clone(), notifier.clone());
    let assignments = AssignmentService::new(db.clone(), channel);
    let rollup = RollupService::new(db.clone(), notifier);

    let state = Arc::new(AppState {
        config,
        db,
        diet_logs,
        assignments,
        rollup,
    });

    (create_router(state.clone()), state)
}

/// Send one request through the router and decode the JSON body.
#[allow(dead_code)]
pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// 100 g reference portion of chicken breast (165 kcal / 31 g protein).
#[allow(dead_code)]
pub fn chicken_breast() -> Food {
    Food {
        food_id: "chicken-breast".to_string(),
        name: "Chicken breast".to_string(),
        grams_per_unit: dec!(100),
        calories_per_unit: dec!(165),
        protein_per_unit: dec!(31),
        carbs_per_unit: dec!(0),
        fat_per_unit: dec!(3.6),
    }
}

#[allow(dead_code)]
pub fn trainer(trainer_id: &str, max_clients: u32, current_client_count: u32) -> Trainer {
    Trainer {
        trainer_id: trainer_id.to_string(),
        name: format!("Trainer {}", trainer_id),
        email: format!("{}@example.com", trainer_id),
        max_clients,
        current_client_count,
        created_at: "2024-05-01T00:00:00Z".to_string(),
    }
}

#[allow(dead_code)]
pub async fn seed_active_assignment(db: &Datastore, user_id: &str, trainer_id: &str) {
    db.put_assignment(&Assignment {
        user_id: user_id.to_string(),
        trainer_id: trainer_id.to_string(),
        status: AssignmentStatus::Active,
        assigned_at: "2024-05-01T00:00:00Z".to_string(),
        removed_at: None,
    })
    .await
    .unwrap();
}
