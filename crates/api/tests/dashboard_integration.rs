//! Integration tests for the dashboard views.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{get_request, json_request, TestApp};
use domain::models::role::RoleName;
use serde_json::json;

#[tokio::test]
async fn test_empty_dashboard() {
    let app = TestApp::new();
    let token = app.token_for("p.guard", RoleName::Guard).await;

    let (status, stats) = app.send(get_request("/api/dashboard/stats", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalGuards"], 0);
    assert_eq!(stats["activeClients"], 0);
    assert_eq!(stats["pendingReports"], 0);
    assert_eq!(stats["attendanceRate"], 0.0);

    for view in ["activities", "performance", "shifts", "map"] {
        let (status, body) = app
            .send(get_request(&format!("/api/dashboard/{}", view), Some(&token)))
            .await;
        assert_eq!(status, StatusCode::OK, "{}", view);
        assert!(body.as_array().unwrap().is_empty(), "{}", view);
    }
}

#[tokio::test]
async fn test_dashboard_reflects_operations() {
    let app = TestApp::new();
    let admin = app.token_for("ops.admin", RoleName::Admin).await;
    let guard = app.create_guard(&admin, "m.okafor", "G-2024-301").await;
    let guard_id = guard["id"].as_i64().unwrap();
    let location_id = app.create_location(&admin, "Harbour Office").await;
    let today = Utc::now().date_naive();

    // Two shifts in the upcoming window, one outside it.
    let mut today_schedule = 0;
    for (shift, offset) in [("Morning", 0), ("Afternoon", 2), ("Morning", 10)] {
        let shift_id = app.shift_id(shift).await;
        let (status, body) = app
            .send(json_request(
                Method::POST,
                "/api/schedules",
                Some(&admin),
                json!({
                    "guardId": guard_id,
                    "locationId": location_id,
                    "shiftId": shift_id,
                    "date": (today + Duration::days(offset)).to_string()
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        if offset == 0 {
            today_schedule = body["id"].as_i64().unwrap();
        }
    }

    let (status, _) = app
        .send(json_request(
            Method::POST,
            "/api/attendance",
            Some(&admin),
            json!({ "guardId": guard_id, "scheduleId": today_schedule, "status": "on_time" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (stats_status, stats) = app.send(get_request("/api/dashboard/stats", Some(&admin))).await;
    assert_eq!(stats_status, StatusCode::OK);
    assert_eq!(stats["totalGuards"], 1);
    assert_eq!(stats["activeClients"], 1);
    assert_eq!(stats["attendanceRate"], 100.0);

    let (_, shifts) = app
        .send(get_request("/api/dashboard/shifts?limit=10", Some(&admin)))
        .await;
    let shifts = shifts.as_array().unwrap();
    assert_eq!(shifts.len(), 2);
    assert_eq!(shifts[0]["shift"], "Morning");
    assert_eq!(shifts[0]["startTime"], "06:00");
    assert_eq!(shifts[0]["location"], "Harbour Office");

    // A guard on site with no incident shows as on duty.
    let (_, map) = app.send(get_request("/api/dashboard/map", Some(&admin))).await;
    assert_eq!(map[0]["status"], "on_duty");
    assert!(map[0]["guardName"].is_string());

    let (status, _) = app
        .send(json_request(
            Method::POST,
            "/api/incidents",
            Some(&admin),
            json!({
                "title": "Window smashed",
                "description": "Ground floor window smashed overnight.",
                "locationId": location_id
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // An unresolved incident outranks the guard being on duty.
    let (_, map) = app.send(get_request("/api/dashboard/map", Some(&admin))).await;
    assert_eq!(map[0]["status"], "incident_reported");

    let (_, activities) = app
        .send(get_request("/api/dashboard/activities", Some(&admin)))
        .await;
    assert_eq!(activities[0]["type"], "incident");
    assert_eq!(activities[0]["title"], "Window smashed");

    let (_, stats) = app.send(get_request("/api/dashboard/stats", Some(&admin))).await;
    assert_eq!(stats["pendingReports"], 1);

    let (_, performance) = app
        .send(get_request("/api/dashboard/performance", Some(&admin)))
        .await;
    assert_eq!(performance[0]["guardId"], "G-2024-301");
    assert_eq!(performance[0]["attendanceRate"], 100.0);
}

#[tokio::test]
async fn test_limit_is_clamped() {
    let app = TestApp::new();
    let token = app.token_for("ops.admin", RoleName::Admin).await;

    for i in 0..3 {
        let (status, _) = app
            .send(json_request(
                Method::POST,
                "/api/incidents",
                Some(&token),
                json!({
                    "title": format!("Report {}", i),
                    "description": "Routine observation during patrol."
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, one) = app
        .send(get_request("/api/dashboard/activities?limit=0", Some(&token)))
        .await;
    assert_eq!(one.as_array().unwrap().len(), 1);

    let (_, all) = app
        .send(get_request("/api/dashboard/activities?limit=500", Some(&token)))
        .await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_dashboard_requires_auth() {
    let app = TestApp::new();
    let (status, _) = app.send(get_request("/api/dashboard/stats", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
