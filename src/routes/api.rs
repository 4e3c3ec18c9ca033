// SPDX-License-Identifier: MIT

//! API route handlers.
//!
//! Request/response DTOs use the camelCase wire names the frontend
//! expects. Handlers stay thin: validation that needs no storage access
//! lives here, everything else is delegated to the services.

use crate::error::{AppError, Result};
use crate::models::message::conversation_id;
use crate::models::{
    Assignment, ConversationMessage, DailyAggregate, Food, LogEntry, SenderRole, Trainer,
    UserProfile,
};
use crate::services::LogEntryRequest;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_SEARCH_LIMIT: usize = 10;
const DEFAULT_CONVERSATION_LIMIT: usize = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(create_user))
        .route("/foods", post(create_food))
        .route("/foods/search", get(search_foods))
        .route("/diet-logs", post(log_diet_entry))
        .route("/diet-logs/today", get(today_logs))
        .route("/summary/today", get(today_summary))
        .route("/trainers", post(create_trainer).get(list_trainers))
        .route("/trainer/assign", post(assign_trainer))
        .route("/trainer/unassign", post(unassign_trainer))
        .route("/trainer/clients", get(trainer_clients))
        .route("/messages", post(send_message).get(get_conversation))
}

// ─── Users ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    /// "user" or "trainer"
    pub role: String,
    pub email: String,
    pub weight_lbs: Option<f64>,
    pub height_feet: Option<u32>,
    pub height_inches: Option<u32>,
    pub gender: Option<String>,
    pub age: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub user_id: String,
    pub user: UserProfile,
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>)> {
    if req.name.is_empty() || req.email.is_empty() || !matches!(req.role.as_str(), "user" | "trainer")
    {
        return Err(AppError::BadRequest(
            "name, email and a valid role ('user' or 'trainer') are required".to_string(),
        ));
    }

    let user = UserProfile {
        user_id: uuid::Uuid::new_v4().to_string(),
        name: req.name,
        role: req.role,
        email: req.email,
        weight_lbs: req.weight_lbs,
        height_feet: req.height_feet,
        height_inches: req.height_inches,
        gender: req.gender,
        age: req.age,
        created_at: format_utc_rfc3339(chrono::Utc::now()),
    };
    state.db.put_user(&user).await?;

    tracing::info!(user_id = %user.user_id, role = %user.role, "User created");
    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            user_id: user.user_id.clone(),
            user,
        }),
    ))
}

// ─── Foods ───────────────────────────────────────────────────

async fn create_food(
    State(state): State<Arc<AppState>>,
    Json(food): Json<Food>,
) -> Result<(StatusCode, Json<Food>)> {
    if food.food_id.is_empty() || food.name.is_empty() {
        return Err(AppError::BadRequest(
            "foodId and name are required".to_string(),
        ));
    }
    state.db.put_food(&food).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

#[derive(Deserialize)]
struct FoodSearchQuery {
    query: Option<String>,
    limit: Option<usize>,
}

#[derive(Serialize)]
pub struct FoodSearchResponse {
    pub foods: Vec<Food>,
}

/// Case-insensitive substring search over the food reference table.
///
/// Full scan-and-filter; fine for a reference table of this size.
async fn search_foods(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FoodSearchQuery>,
) -> Result<Json<FoodSearchResponse>> {
    let query = params.query.unwrap_or_default().to_lowercase();
    if query.is_empty() {
        return Ok(Json(FoodSearchResponse { foods: vec![] }));
    }
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    let foods = rank_food_matches(state.db.scan_foods().await?, &query, limit);
    tracing::debug!(query = %query, matches = foods.len(), "Food search");
    Ok(Json(FoodSearchResponse { foods }))
}

/// Keep substring matches on name or id, prefix matches first, then by
/// name, capped at `limit`.
fn rank_food_matches(foods: Vec<Food>, query: &str, limit: usize) -> Vec<Food> {
    let mut matched: Vec<Food> = foods
        .into_iter()
        .filter(|f| {
            f.name.to_lowercase().contains(query) || f.food_id.to_lowercase().contains(query)
        })
        .collect();

    matched.sort_by_key(|f| {
        let name = f.name.to_lowercase();
        let id = f.food_id.to_lowercase();
        (
            !(name.starts_with(query) || id.starts_with(query)),
            name,
        )
    });
    matched.truncate(limit);
    matched
}

// ─── Diet Logs ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietLogRequest {
    pub user_id: String,
    pub food_id: String,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub meal_type: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietLogResponse {
    pub log: LogEntry,
    pub updated_summary: DailyAggregate,
}

async fn log_diet_entry(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DietLogRequest>,
) -> Result<(StatusCode, Json<DietLogResponse>)> {
    let (log, updated_summary) = state
        .diet_logs
        .log_entry(LogEntryRequest {
            user_id: req.user_id,
            food_id: req.food_id,
            quantity: req.quantity,
            unit: req.unit,
            meal_type: req.meal_type,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DietLogResponse {
            log,
            updated_summary,
        }),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserQuery {
    user_id: String,
}

#[derive(Serialize)]
pub struct TodayLogsResponse {
    pub logs: Vec<LogEntry>,
}

async fn today_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserQuery>,
) -> Result<Json<TodayLogsResponse>> {
    let logs = state.diet_logs.today_logs(&params.user_id).await?;
    Ok(Json(TodayLogsResponse { logs }))
}

async fn today_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserQuery>,
) -> Result<Json<DailyAggregate>> {
    let summary = state.diet_logs.today_summary(&params.user_id).await?;
    Ok(Json(summary))
}

// ─── Trainers ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainerRequest {
    pub name: String,
    pub email: String,
    pub max_clients: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainerResponse {
    pub trainer_id: String,
    pub trainer: Trainer,
}

async fn create_trainer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTrainerRequest>,
) -> Result<(StatusCode, Json<CreateTrainerResponse>)> {
    let trainer = state
        .assignments
        .create_trainer(&req.name, &req.email, req.max_clients)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateTrainerResponse {
            trainer_id: trainer.trainer_id.clone(),
            trainer,
        }),
    ))
}

#[derive(Serialize)]
pub struct TrainersResponse {
    pub trainers: Vec<Trainer>,
}

async fn list_trainers(State(state): State<Arc<AppState>>) -> Result<Json<TrainersResponse>> {
    let trainers = state.assignments.list_trainers().await?;
    Ok(Json(TrainersResponse { trainers }))
}

// ─── Assignments ─────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub user_id: String,
    pub trainer_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignResponse {
    pub message: String,
    pub user_id: String,
    pub trainer_id: String,
}

async fn assign_trainer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssignRequest>,
) -> Result<Json<AssignResponse>> {
    let assignment = state
        .assignments
        .assign(&req.user_id, req.trainer_id.as_deref())
        .await?;
    Ok(Json(AssignResponse {
        message: "Trainer assigned".to_string(),
        user_id: assignment.user_id,
        trainer_id: assignment.trainer_id,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignRequest {
    pub user_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignResponse {
    pub message: String,
    pub user_id: String,
    pub removed: usize,
}

async fn unassign_trainer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UnassignRequest>,
) -> Result<Json<UnassignResponse>> {
    let removed = state.assignments.unassign(&req.user_id).await?;
    Ok(Json(UnassignResponse {
        message: "Trainer unassigned for user".to_string(),
        user_id: req.user_id,
        removed,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrainerQuery {
    trainer_id: String,
}

#[derive(Serialize)]
pub struct ClientsResponse {
    pub clients: Vec<Assignment>,
}

async fn trainer_clients(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrainerQuery>,
) -> Result<Json<ClientsResponse>> {
    let clients = state.assignments.clients(&params.trainer_id).await?;
    Ok(Json(ClientsResponse { clients }))
}

// ─── Conversations ───────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub user_id: String,
    pub trainer_id: String,
    pub sender_role: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct SendMessageResponse {
    pub item: ConversationMessage,
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>)> {
    if req.user_id.is_empty() || req.trainer_id.is_empty() {
        return Err(AppError::BadRequest(
            "userId and trainerId are required".to_string(),
        ));
    }
    // System messages are service-authored only.
    let sender_role = match req.sender_role.as_str() {
        "user" => SenderRole::User,
        "trainer" => SenderRole::Trainer,
        _ => {
            return Err(AppError::BadRequest(
                "senderRole must be 'user' or 'trainer'".to_string(),
            ))
        }
    };
    if req.message.is_empty() {
        return Err(AppError::BadRequest("message is required".to_string()));
    }

    let item = ConversationMessage {
        conversation_id: conversation_id(&req.user_id, &req.trainer_id),
        timestamp: format_utc_rfc3339(chrono::Utc::now()),
        user_id: req.user_id,
        trainer_id: req.trainer_id,
        sender_role,
        message: req.message,
        kind: None,
    };
    state.db.append_message(&item).await?;

    Ok((StatusCode::CREATED, Json(SendMessageResponse { item })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationQuery {
    user_id: String,
    trainer_id: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
pub struct ConversationResponse {
    pub messages: Vec<ConversationMessage>,
}

async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ConversationQuery>,
) -> Result<Json<ConversationResponse>> {
    let messages = state
        .db
        .conversation(
            &conversation_id(&params.user_id, &params.trainer_id),
            params.limit.unwrap_or(DEFAULT_CONVERSATION_LIMIT),
        )
        .await?;
    Ok(Json(ConversationResponse { messages }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn food(id: &str, name: &str) -> Food {
        Food {
            food_id: id.to_string(),
            name: name.to_string(),
            grams_per_unit: dec!(100),
            calories_per_unit: dec!(100),
            protein_per_unit: dec!(10),
            carbs_per_unit: dec!(10),
            fat_per_unit: dec!(1),
        }
    }

    #[test]
    fn test_rank_food_matches_prefix_first() {
        let foods = vec![
            food("brown-rice", "Brown rice"),
            food("rice-white", "Rice, white"),
            food("chicken", "Chicken breast"),
        ];
        let ranked = rank_food_matches(foods, "rice", 10);
        let names: Vec<_> = ranked.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Rice, white", "Brown rice"]);
    }

    #[test]
    fn test_rank_food_matches_respects_limit() {
        let foods = vec![
            food("a-rice", "A rice"),
            food("b-rice", "B rice"),
            food("c-rice", "C rice"),
        ];
        assert_eq!(rank_food_matches(foods, "rice", 2).len(), 2);
    }

    #[test]
    fn test_rank_food_matches_by_id_too() {
        let foods = vec![food("oats-rolled", "Porridge base")];
        let ranked = rank_food_matches(foods, "oats", 10);
        assert_eq!(ranked.len(), 1);
    }
}
