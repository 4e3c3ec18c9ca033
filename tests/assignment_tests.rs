// SPDX-License-Identifier: MIT

//! Assignment load-balancer tests: least-loaded auto-match, capacity
//! errors, counter maintenance, and reversible unassignment.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_auto_assign_picks_least_loaded_with_capacity() {
    let (app, state, _) = common::create_test_app();
    // A is full (2/2); B has room (1/3).
    state.db.put_trainer(&common::trainer("a", 2, 2)).await.unwrap();
    state.db.put_trainer(&common::trainer("b", 3, 1)).await.unwrap();

    let (status, body) =
        common::request_json(&app, "POST", "/trainer/assign", Some(json!({"userId": "u1"})))
            .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trainerId"], "b");

    let b = state.db.get_trainer("b").await.unwrap().unwrap();
    assert_eq!(b.current_client_count, 2);
    let a = state.db.get_trainer("a").await.unwrap().unwrap();
    assert_eq!(a.current_client_count, 2);
}

#[tokio::test]
async fn test_auto_assign_with_no_capacity_returns_conflict() {
    let (app, state, _) = common::create_test_app();
    state.db.put_trainer(&common::trainer("a", 2, 2)).await.unwrap();
    state.db.put_trainer(&common::trainer("b", 1, 1)).await.unwrap();

    let (status, body) =
        common::request_json(&app, "POST", "/trainer/assign", Some(json!({"userId": "u1"})))
            .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "no_capacity");
}

#[tokio::test]
async fn test_manual_assign_unknown_trainer_is_not_found() {
    let (app, _, _) = common::create_test_app();

    let (status, _) = common::request_json(
        &app,
        "POST",
        "/trainer/assign",
        Some(json!({"userId": "u1", "trainerId": "ghost"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_manual_assign_increments_counter() {
    let (app, state, _) = common::create_test_app();
    state.db.put_trainer(&common::trainer("t1", 5, 0)).await.unwrap();

    let (status, _) = common::request_json(
        &app,
        "POST",
        "/trainer/assign",
        Some(json!({"userId": "u1", "trainerId": "t1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let t1 = state.db.get_trainer("t1").await.unwrap().unwrap();
    assert_eq!(t1.current_client_count, 1);
}

#[tokio::test]
async fn test_reassign_supersedes_prior_active_assignment() {
    let (app, state, _) = common::create_test_app();
    state.db.put_trainer(&common::trainer("t1", 5, 0)).await.unwrap();
    state.db.put_trainer(&common::trainer("t2", 5, 0)).await.unwrap();

    for trainer_id in ["t1", "t2"] {
        let (status, _) = common::request_json(
            &app,
            "POST",
            "/trainer/assign",
            Some(json!({"userId": "u1", "trainerId": trainer_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // The first assignment was superseded: its counter went back down and
    // only one active record remains.
    let t1 = state.db.get_trainer("t1").await.unwrap().unwrap();
    assert_eq!(t1.current_client_count, 0);
    let t2 = state.db.get_trainer("t2").await.unwrap().unwrap();
    assert_eq!(t2.current_client_count, 1);

    let assignments = state.db.assignments_for_user("u1").await.unwrap();
    let active: Vec<_> = assignments.iter().filter(|a| a.is_active()).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].trainer_id, "t2");
}

#[tokio::test]
async fn test_unassign_decrements_and_keeps_history() {
    let (app, state, _) = common::create_test_app();
    state.db.put_trainer(&common::trainer("t1", 5, 0)).await.unwrap();

    common::request_json(
        &app,
        "POST",
        "/trainer/assign",
        Some(json!({"userId": "u1", "trainerId": "t1"})),
    )
    .await;

    let (status, body) = common::request_json(
        &app,
        "POST",
        "/trainer/unassign",
        Some(json!({"userId": "u1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);

    let t1 = state.db.get_trainer("t1").await.unwrap().unwrap();
    assert_eq!(t1.current_client_count, 0);

    // History retained: the record still exists, marked removed.
    let assignments = state.db.assignments_for_user("u1").await.unwrap();
    assert_eq!(assignments.len(), 1);
    assert!(!assignments[0].is_active());
    assert!(assignments[0].removed_at.is_some());
}

#[tokio::test]
async fn test_unassign_without_records_is_not_found() {
    let (app, _, _) = common::create_test_app();

    let (status, _) = common::request_json(
        &app,
        "POST",
        "/trainer/unassign",
        Some(json!({"userId": "nobody"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_repeat_unassign_is_a_floored_no_op() {
    let (app, state, _) = common::create_test_app();
    state.db.put_trainer(&common::trainer("t1", 5, 0)).await.unwrap();
    common::request_json(
        &app,
        "POST",
        "/trainer/assign",
        Some(json!({"userId": "u1", "trainerId": "t1"})),
    )
    .await;

    for expected_removed in [1, 0] {
        let (status, body) = common::request_json(
            &app,
            "POST",
            "/trainer/unassign",
            Some(json!({"userId": "u1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], expected_removed);
    }

    let t1 = state.db.get_trainer("t1").await.unwrap().unwrap();
    assert_eq!(t1.current_client_count, 0);
}

#[tokio::test]
async fn test_clients_lists_only_active_assignments() {
    let (app, state, _) = common::create_test_app();
    state.db.put_trainer(&common::trainer("t1", 5, 0)).await.unwrap();

    for user_id in ["u1", "u2"] {
        common::request_json(
            &app,
            "POST",
            "/trainer/assign",
            Some(json!({"userId": user_id, "trainerId": "t1"})),
        )
        .await;
    }
    common::request_json(
        &app,
        "POST",
        "/trainer/unassign",
        Some(json!({"userId": "u2"})),
    )
    .await;

    let (status, body) =
        common::request_json(&app, "GET", "/trainer/clients?trainerId=t1", None).await;
    assert_eq!(status, StatusCode::OK);

    let clients = body["clients"].as_array().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0]["userId"], "u1");
}

#[tokio::test]
async fn test_create_trainer_subscribes_email_once() {
    let (app, _, capture) = common::create_test_app();

    let (status, body) = common::request_json(
        &app,
        "POST",
        "/trainers",
        Some(json!({"name": "Coach", "email": "coach@example.com", "maxClients": 4})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["trainer"]["currentClientCount"], 0);
    assert_eq!(body["trainer"]["maxClients"], 4);
    assert_eq!(
        *capture.subscribed.lock().unwrap(),
        vec!["coach@example.com".to_string()]
    );

    // Assignment is not a subscription trigger.
    common::request_json(
        &app,
        "POST",
        "/trainer/assign",
        Some(json!({"userId": "u1", "trainerId": body["trainerId"].as_str().unwrap()})),
    )
    .await;
    assert_eq!(capture.subscribed.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_trainer_requires_name_and_email() {
    let (app, _, _) = common::create_test_app();

    let (status, _) = common::request_json(
        &app,
        "POST",
        "/trainers",
        Some(json!({"name": "", "email": "coach@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
