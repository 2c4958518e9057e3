//! Integration tests for login, token handling and role enforcement.
//!
//! Run with: cargo test --test auth_integration

mod common;

use axum::http::{Method, StatusCode};
use common::{get_request, json_request, TestApp, TEST_PASSWORD};
use domain::models::role::RoleName;
use serde_json::json;

#[tokio::test]
async fn test_login_returns_token_and_profile() {
    let app = TestApp::new();
    app.seed_user("ops.admin", RoleName::Admin).await;

    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "username": "ops.admin", "password": TEST_PASSWORD }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert!(body.get("expiresAt").is_some());
    assert_eq!(body["user"]["username"], "ops.admin");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.seed_user("ops.admin", RoleName::Admin).await;

    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "username": "ops.admin", "password": "not-the-password" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    // Unknown users get the same answer.
    let (status, _) = app
        .send(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "username": "nobody", "password": TEST_PASSWORD }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_malformed_body_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            json!({ "username": "ops.admin" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_current_user_requires_token() {
    let app = TestApp::new();

    let (status, _) = app.send(get_request("/api/auth/user", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(get_request("/api/auth/user", Some("not.a.token")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.token_for("team.lead", RoleName::TeamLeader).await;
    let (status, body) = app.send(get_request("/api/auth/user", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "team.lead");
    assert_eq!(body["role"], "team_leader");
}

#[tokio::test]
async fn test_deactivated_user_token_stops_working() {
    let app = TestApp::new();
    let admin = app.token_for("ops.admin", RoleName::Admin).await;
    let guard = app.seed_user("night.guard", RoleName::Guard).await;
    let guard_token = app.login("night.guard").await;

    let (status, _) = app
        .send(json_request(
            Method::PATCH,
            &format!("/api/users/{}", guard.id),
            Some(&admin),
            json!({ "active": false }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(get_request("/api/auth/user", Some(&guard_token)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_guard_role_cannot_manage_users() {
    let app = TestApp::new();
    let token = app.token_for("day.guard", RoleName::Guard).await;

    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/api/users",
            Some(&token),
            json!({ "username": "intruder", "password": "secret123", "roleId": 1 }),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();

    let (status, body) = app.send(get_request("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["connected"], true);

    let (status, _) = app.send(get_request("/api/health/live", None)).await;
    assert_eq!(status, StatusCode::OK);
}
