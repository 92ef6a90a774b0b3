//! End-to-end API tests
//!
//! Drive the full router (middleware included) against an in-memory SQLite
//! pool. Each test builds its own state, so tests are independent.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use gym_server::auth::{JwtConfig, JwtService};
use gym_server::core::{Config, ServerState};
use gym_server::db::DbService;
use gym_server::db::models::User;
use gym_server::db::repository::user;
use gym_server::routes;
use shared::models::UserRole;
use shared::util::{DAY_MILLIS, now_millis};

const HOUR_MILLIS: i64 = 3_600_000;

async fn test_state() -> ServerState {
    // A single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    DbService::migrate(&pool).await.expect("Failed to migrate");

    let mut config = Config::with_overrides("/tmp/gym-server-test", 0);
    config.jwt = JwtConfig {
        secret: "integration-test-secret-key-0123456789".to_string(),
        expiration_minutes: 60,
        issuer: "gym-server".to_string(),
        audience: "gym-clients".to_string(),
    };
    let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

    ServerState::new(config, pool, jwt_service)
}

fn app(state: &ServerState) -> Router {
    routes::build_app(state).with_state(state.clone())
}

/// Create an operator account and mint a token for it
async fn seed_operator(state: &ServerState, username: &str, role: UserRole) -> String {
    let hash = User::hash_password("pass1234").expect("hash");
    let account = user::create(&state.pool, "Front Desk", username, &hash, role)
        .await
        .expect("create operator");
    state
        .jwt_service
        .generate_token(&account)
        .expect("mint token")
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn member_payload(end_date: i64) -> Value {
    json!({
        "name": "Jordan Reyes",
        "contact": "0917-555-0100",
        "membership_type": "Monthly",
        "start_date": now_millis() - 10 * DAY_MILLIS,
        "end_date": end_date,
    })
}

async fn create_member(app: &Router, admin: &str, end_date: i64) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/members",
        Some(admin),
        Some(member_payload(end_date)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "member create failed: {body}");
    body
}

#[tokio::test]
async fn health_is_public_and_api_requires_auth() {
    let state = test_state().await;
    let app = app(&state);

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = send(&app, "GET", "/api/members", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/members", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_issues_usable_token() {
    let state = test_state().await;
    user::ensure_default_admin(&state.pool)
        .await
        .expect("seed admin");
    let app = app(&state);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "admin", "password": "admin123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "Admin");
    let token = body["token"].as_str().expect("token").to_string();

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");

    // Wrong password gets the same unified message as unknown username
    let (status, wrong_pass) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "admin", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, unknown_user) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "ghost", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_pass["message"], unknown_user["message"]);
}

#[tokio::test]
async fn member_writes_are_admin_only() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let staff = seed_operator(&state, "desk", UserRole::Staff).await;
    let app = app(&state);

    let (status, _) = send(
        &app,
        "POST",
        "/api/members",
        Some(&staff),
        Some(member_payload(now_millis() + 40 * DAY_MILLIS)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let member = create_member(&app, &admin, now_millis() + 40 * DAY_MILLIS).await;
    let id = member["id"].as_i64().expect("id");

    // Staff can read
    let (status, body) = send(&app, "GET", &format!("/api/members/{id}"), Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Active");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/members/{id}"),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn member_status_is_derived_on_every_read() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let app = app(&state);

    let active = create_member(&app, &admin, now_millis() + 40 * DAY_MILLIS).await;
    assert_eq!(active["status"], "Active");
    assert!(
        active["member_code"].as_str().expect("code").starts_with("GM"),
        "generated code: {}",
        active["member_code"]
    );

    let expiring = create_member(&app, &admin, now_millis() + 2 * DAY_MILLIS).await;
    assert_eq!(expiring["status"], "Expiring Soon");

    let expired = create_member(&app, &admin, now_millis() - HOUR_MILLIS).await;
    assert_eq!(expired["status"], "Expired");

    // Reads are idempotent without intervening writes
    let id = expiring["id"].as_i64().expect("id");
    let (_, first) = send(&app, "GET", &format!("/api/members/{id}"), Some(&admin), None).await;
    let (_, second) = send(&app, "GET", &format!("/api/members/{id}"), Some(&admin), None).await;
    assert_eq!(first["status"], second["status"]);

    // Partial update touching end_date re-derives the status
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/members/{id}"),
        Some(&admin),
        Some(json!({"end_date": now_millis() + 40 * DAY_MILLIS})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Active");
    // Untouched fields survive the partial update
    assert_eq!(updated["name"], "Jordan Reyes");

    let (status, listed) = send(&app, "GET", "/api/members", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().expect("list").len(), 3);
}

#[tokio::test]
async fn member_create_validates_input() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let app = app(&state);

    let mut payload = member_payload(now_millis() + 40 * DAY_MILLIS);
    payload["name"] = json!("   ");
    let (status, body) = send(&app, "POST", "/api/members", Some(&admin), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().expect("msg").contains("name"));

    let mut payload = member_payload(now_millis() + 40 * DAY_MILLIS);
    payload["membership_type"] = json!("Weekly");
    let (status, _) = send(&app, "POST", "/api/members", Some(&admin), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut payload = member_payload(now_millis() + 40 * DAY_MILLIS);
    payload["gender"] = json!("Unknown");
    let (status, _) = send(&app, "POST", "/api/members", Some(&admin), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "GET",
        "/api/members/999999",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn check_in_rules_are_enforced() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let app = app(&state);

    let expired = create_member(&app, &admin, now_millis() - HOUR_MILLIS).await;
    let expired_id = expired["id"].as_i64().expect("id");
    let (status, body) = send(
        &app,
        "POST",
        "/api/attendance/checkin",
        Some(&admin),
        Some(json!({"member_id": expired_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().expect("msg").contains("expired"));

    // Expiring Soon members are still admitted
    let member = create_member(&app, &admin, now_millis() + 2 * DAY_MILLIS).await;
    let member_id = member["id"].as_i64().expect("id");
    let (status, body) = send(
        &app,
        "POST",
        "/api/attendance/checkin",
        Some(&admin),
        Some(json!({"member_id": member_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "check-in failed: {body}");
    assert_eq!(body["member_name"], "Jordan Reyes");

    // Second check-in without an intervening check-out
    let (status, body) = send(
        &app,
        "POST",
        "/api/attendance/checkin",
        Some(&admin),
        Some(json!({"member_id": member_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .expect("msg")
            .contains("already checked in")
    );

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/checkout",
        Some(&admin),
        Some(json!({"member_id": member_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // No open session left to close
    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/checkout",
        Some(&admin),
        Some(json!({"member_id": member_id})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A fresh visit the same day is a new record
    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/checkin",
        Some(&admin),
        Some(json!({"member_id": member_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, today) = send(&app, "GET", "/api/attendance/today", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = today.as_array().expect("rows");
    assert_eq!(rows.len(), 2);
    // Newest first
    assert!(rows[0]["check_in_time"].as_i64() >= rows[1]["check_in_time"].as_i64());

    // Filtered listing by member and by day
    let (status, filtered) = send(
        &app,
        "GET",
        &format!("/api/attendance?member_id={member_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered.as_array().expect("rows").len(), 2);

    let (status, none_yesterday) = send(
        &app,
        "GET",
        "/api/attendance?date=2000-01-01",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(none_yesterday.as_array().expect("rows").is_empty());
}

#[tokio::test]
async fn check_out_requires_an_open_session() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let app = app(&state);

    let member = create_member(&app, &admin, now_millis() + 40 * DAY_MILLIS).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/attendance/checkout",
        Some(&admin),
        Some(json!({"member_id": member["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        body["message"]
            .as_str()
            .expect("msg")
            .contains("No active check-in")
    );
}

#[tokio::test]
async fn payment_renews_membership_window() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let staff = seed_operator(&state, "desk", UserRole::Staff).await;
    let app = app(&state);

    let member = create_member(&app, &admin, now_millis() + 40 * DAY_MILLIS).await;
    let member_id = member["id"].as_i64().expect("id");
    assert_eq!(member["membership_type"], "Monthly");

    // Staff may record payments
    let before = now_millis();
    let (status, receipt) = send(
        &app,
        "POST",
        "/api/payments",
        Some(&staff),
        Some(json!({"member_id": member_id, "amount": 1350.0, "membership_plan": "Quarterly"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "payment failed: {receipt}");
    let after = now_millis();

    let end_date = receipt["end_date"].as_i64().expect("end_date");
    assert!(end_date >= before + 90 * DAY_MILLIS);
    assert!(end_date <= after + 90 * DAY_MILLIS);

    let (_, renewed) = send(
        &app,
        "GET",
        &format!("/api/members/{member_id}"),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(renewed["membership_type"], "Quarterly");
    assert_eq!(renewed["status"], "Active");
    assert_eq!(renewed["end_date"].as_i64(), Some(end_date));

    let (status, payments) = send(
        &app,
        "GET",
        &format!("/api/payments?member_id={member_id}"),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = payments.as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["amount"].as_f64(), Some(1350.0));
    assert_eq!(rows[0]["membership_plan"], "Quarterly");
    assert_eq!(rows[0]["member_name"], "Jordan Reyes");
    assert_eq!(rows[0]["payment_method"], "Cash");
}

#[tokio::test]
async fn payment_validation_rules() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let app = app(&state);

    let member = create_member(&app, &admin, now_millis() + 40 * DAY_MILLIS).await;
    let member_id = member["id"].as_i64().expect("id");

    // Daily passes are not a renewal plan
    let (status, _) = send(
        &app,
        "POST",
        "/api/payments",
        Some(&admin),
        Some(json!({"member_id": member_id, "amount": 50.0, "membership_plan": "Daily"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/payments",
        Some(&admin),
        Some(json!({"member_id": member_id, "amount": 0.0, "membership_plan": "Monthly"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/payments",
        Some(&admin),
        Some(json!({"member_id": 424242, "amount": 500.0, "membership_plan": "Monthly"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Nothing was recorded by the rejected attempts
    let (_, payments) = send(&app, "GET", "/api/payments", Some(&admin), None).await;
    assert!(payments.as_array().expect("rows").is_empty());
}

#[tokio::test]
async fn deleting_a_member_keeps_history_visible() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let app = app(&state);

    let member = create_member(&app, &admin, now_millis() + 40 * DAY_MILLIS).await;
    let member_id = member["id"].as_i64().expect("id");

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/checkin",
        Some(&admin),
        Some(json!({"member_id": member_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        "POST",
        "/api/payments",
        Some(&admin),
        Some(json!({"member_id": member_id, "amount": 500.0, "membership_plan": "Monthly"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, deleted) = send(
        &app,
        "DELETE",
        &format!("/api/members/{member_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!(true));

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/members/{member_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Orphaned history stays listable with a placeholder identity
    let (status, attendance) = send(
        &app,
        "GET",
        &format!("/api/attendance?member_id={member_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = attendance.as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["member_name"], "(deleted member)");

    let (status, payments) = send(
        &app,
        "GET",
        &format!("/api/payments?member_id={member_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payments.as_array().expect("rows").len(), 1);

    // Deleting again reports not found
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/members/{member_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_stats_reflect_the_day() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let app = app(&state);

    let active = create_member(&app, &admin, now_millis() + 40 * DAY_MILLIS).await;
    let expiring = create_member(&app, &admin, now_millis() + 2 * DAY_MILLIS).await;
    let _expired = create_member(&app, &admin, now_millis() - HOUR_MILLIS).await;

    for id in [active["id"].as_i64().unwrap(), expiring["id"].as_i64().unwrap()] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/attendance/checkin",
            Some(&admin),
            Some(json!({"member_id": id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/checkout",
        Some(&admin),
        Some(json!({"member_id": expiring["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/payments",
        Some(&admin),
        Some(json!({"member_id": active["id"], "amount": 500.0, "membership_plan": "Monthly"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, stats) = send(&app, "GET", "/api/dashboard/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK, "stats failed: {stats}");
    assert_eq!(stats["total_members"].as_i64(), Some(3));
    // The renewed member sits at +30d, the other survivor at +2d
    assert_eq!(stats["active_members"].as_i64(), Some(1));
    assert_eq!(stats["expiring_soon"].as_i64(), Some(1));
    assert_eq!(stats["today_attendance"].as_i64(), Some(2));
    assert_eq!(stats["currently_checked_in"].as_i64(), Some(1));
    assert_eq!(stats["monthly_revenue"].as_f64(), Some(500.0));
}

#[tokio::test]
async fn price_settings_are_admin_writable() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let staff = seed_operator(&state, "desk", UserRole::Staff).await;
    let app = app(&state);

    let (status, prices) = send(&app, "GET", "/api/settings/prices", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prices["quarterly"].as_f64(), Some(1350.0));

    let update = json!({"daily": 60.0, "monthly": 550.0, "quarterly": 1400.0, "annual": 5200.0});
    let (status, _) = send(
        &app,
        "PUT",
        "/api/settings/prices",
        Some(&staff),
        Some(update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(
        &app,
        "PUT",
        "/api/settings/prices",
        Some(&admin),
        Some(update),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["monthly"].as_f64(), Some(550.0));

    let (status, _) = send(
        &app,
        "PUT",
        "/api/settings/prices",
        Some(&admin),
        Some(json!({"daily": -1.0, "monthly": 550.0, "quarterly": 1400.0, "annual": 5200.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn operator_registration_is_admin_only() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let staff = seed_operator(&state, "desk", UserRole::Staff).await;
    let app = app(&state);

    let payload = json!({
        "name": "Evening Shift",
        "username": "evening",
        "password": "pass1234",
        "role": "Staff",
    });

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        Some(&staff),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        &app,
        "POST",
        "/api/auth/register",
        Some(&admin),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["username"], "evening");
    assert_eq!(created["role"], "Staff");
    assert!(created.get("password_hash").is_none());

    // Username uniqueness
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        Some(&admin),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .expect("msg")
            .contains("already exists")
    );

    // Unknown roles are rejected
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        Some(&admin),
        Some(json!({
            "name": "X",
            "username": "x",
            "password": "pass1234",
            "role": "Owner",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn staff_name_is_attributed_from_the_token() {
    let state = test_state().await;
    let admin = seed_operator(&state, "boss", UserRole::Admin).await;
    let app = app(&state);

    let member = create_member(&app, &admin, now_millis() + 40 * DAY_MILLIS).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance/checkin",
        Some(&admin),
        Some(json!({"member_id": member["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, today) = send(&app, "GET", "/api/attendance/today", Some(&admin), None).await;
    let rows = today.as_array().expect("rows");
    assert_eq!(rows[0]["staff_name"], "Front Desk");
}
