//! Integration tests for guard profiles and their user accounts.

mod common;

use axum::http::{Method, StatusCode};
use common::{get_request, json_request, TestApp};
use domain::models::role::RoleName;
use serde_json::json;

#[tokio::test]
async fn test_create_guard_creates_login() {
    let app = TestApp::new();
    let admin = app.token_for("ops.admin", RoleName::Admin).await;

    let guard = app.create_guard(&admin, "k.mensah", "G-2024-101").await;
    assert_eq!(guard["guardId"], "G-2024-101");
    assert_eq!(guard["status"], "active");
    assert_eq!(guard["user"]["username"], "k.mensah");

    // The new account can log in and carries the guard role.
    let token = app.login("k.mensah").await;
    let (status, me) = app.send(get_request("/api/auth/user", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["role"], "guard");
}

#[tokio::test]
async fn test_duplicate_guard_code_is_conflict_and_leaves_no_user() {
    let app = TestApp::new();
    let admin = app.token_for("ops.admin", RoleName::Admin).await;
    app.create_guard(&admin, "first.guard", "G-2024-102").await;

    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/api/guards",
            Some(&admin),
            json!({
                "username": "second.guard",
                "password": "GuardPass123",
                "firstName": "Ama",
                "lastName": "Owusu",
                "guardId": "G-2024-102",
                "nationalId": "NID-OTHER",
                "position": "Security Officer"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    // The user row of the failed guard was not kept.
    assert!(app
        .store
        .find_user_by_username("second.guard")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_invalid_guard_code_is_rejected() {
    let app = TestApp::new();
    let admin = app.token_for("ops.admin", RoleName::Admin).await;

    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/api/guards",
            Some(&admin),
            json!({
                "username": "bad.code",
                "password": "GuardPass123",
                "firstName": "Ama",
                "lastName": "Owusu",
                "guardId": "guard-7",
                "nationalId": "NID-7",
                "position": "Security Officer"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_update_and_fetch_guard() {
    let app = TestApp::new();
    let admin = app.token_for("ops.admin", RoleName::Admin).await;
    let guard = app.create_guard(&admin, "r.diallo", "G-2024-103").await;
    let id = guard["id"].as_i64().unwrap();

    let (status, updated) = app
        .send(json_request(
            Method::PATCH,
            &format!("/api/guards/{}", id),
            Some(&admin),
            json!({ "status": "on_leave", "performance": 87.5 }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["status"], "on_leave");
    assert_eq!(updated["performance"], 87.5);

    let (status, fetched) = app
        .send(get_request(&format!("/api/guards/{}", id), Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "on_leave");

    let (status, _) = app
        .send(get_request("/api/guards/9999", Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_team_leader_lists_but_cannot_create() {
    let app = TestApp::new();
    let admin = app.token_for("ops.admin", RoleName::Admin).await;
    app.create_guard(&admin, "a.guard", "G-2024-104").await;

    let leader = app.token_for("team.lead", RoleName::TeamLeader).await;
    let (status, list) = app.send(get_request("/api/guards", Some(&leader))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(json_request(
            Method::POST,
            "/api/guards",
            Some(&leader),
            json!({
                "username": "b.guard",
                "password": "GuardPass123",
                "firstName": "Ama",
                "lastName": "Owusu",
                "guardId": "G-2024-105",
                "nationalId": "NID-105",
                "position": "Security Officer"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
