// HTTP-level tests: routing, status codes, the error envelope and request ids.

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use innkeep_api::state::AppState;
use innkeep_core::HotelSettings;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn app() -> (TempDir, Router) {
    let tmp = TempDir::new().unwrap();
    let conn = innkeep_store::db::open_and_migrate(tmp.path().join("innkeep.db")).unwrap();
    let state = AppState::new(conn, HotelSettings::default());
    (tmp, innkeep_api::router(state))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, _, value) = send(app, Method::POST, uri, Some(body), &[]).await;
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, value) = send(app, Method::GET, uri, None, &[]).await;
    (status, value)
}

/// Room type, room and guest; returns (room_id, guest_id)
async fn seed_room_and_guest(app: &Router) -> (String, String) {
    let (status, room_type) = post(
        app,
        "/api/v1/room-types",
        json!({"name": "Double", "base_rate_cents": 12000, "capacity": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, room) = post(
        app,
        "/api/v1/rooms",
        json!({"number": "101", "floor": 1, "room_type_id": room_type["id"]}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, guest) = post(
        app,
        "/api/v1/guests",
        json!({"first_name": "Grace", "last_name": "Hopper"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (
        room["id"].as_str().unwrap().to_string(),
        guest["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_healthz() {
    let (_tmp, app) = app();
    let (status, body) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_seeded_chart_of_accounts_is_listed() {
    let (_tmp, app) = app();
    let (status, body) = get(&app, "/api/v1/accounts?account_type=revenue").await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"4000"));
    assert!(!codes.contains(&"1000"));
}

#[tokio::test]
async fn test_create_returns_201_and_fetch_returns_it() {
    let (_tmp, app) = app();
    let (room_id, _) = seed_room_and_guest(&app).await;

    let (status, room) = get(&app, &format!("/api/v1/rooms/{}", room_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room["number"], "101");
    assert_eq!(room["status"], "available");
}

#[tokio::test]
async fn test_missing_entity_uses_error_envelope() {
    let (_tmp, app) = app();
    let (status, headers, body) = send(
        &app,
        Method::GET,
        "/api/v1/guests/missing",
        None,
        &[("x-request-id", "req-404")],
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(headers.get("x-request-id").unwrap(), "req-404");
    assert_eq!(body["error"]["code"], "ERR_NOT_FOUND");
    assert_eq!(body["error"]["entity_id"], "missing");
    assert_eq!(body["error"]["request_id"], "req-404");
    assert!(body["error"]["message"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_request_id_is_minted_when_absent() {
    let (_tmp, app) = app();
    let (_, headers, _) = send(&app, Method::GET, "/healthz", None, &[]).await;
    let id = headers.get("x-request-id").unwrap().to_str().unwrap();
    assert!(!id.is_empty());
}

#[tokio::test]
async fn test_double_booking_is_conflict() {
    let (_tmp, app) = app();
    let (room_id, guest_id) = seed_room_and_guest(&app).await;
    let booking = json!({
        "guest_id": guest_id,
        "room_id": room_id,
        "check_in": "2026-05-01",
        "check_out": "2026-05-04",
        "adults": 2
    });

    let (status, reservation) = post(&app, "/api/v1/reservations", booking.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reservation["total_cents"], 36000);

    let (status, body) = post(&app, "/api/v1/reservations", booking).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ERR_ROOM_UNAVAILABLE");
    assert_eq!(body["error"]["entity_id"], room_id.as_str());
}

#[tokio::test]
async fn test_oversized_numbers_are_rejected_and_server_keeps_serving() {
    let (_tmp, app) = app();
    let (room_id, guest_id) = seed_room_and_guest(&app).await;

    let (status, body) = post(
        &app,
        "/api/v1/reservations",
        json!({
            "guest_id": guest_id,
            "room_id": room_id,
            "check_in": "2026-05-01",
            "check_out": "2026-05-04",
            "adults": u32::MAX,
            "children": 1
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "ERR_INVALID_INPUT");

    let (status, body) = post(
        &app,
        "/api/v1/reservations",
        json!({
            "guest_id": guest_id,
            "room_id": room_id,
            "check_in": "2026-05-01",
            "check_out": "2026-05-04",
            "nightly_rate_cents": i64::MAX
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "ERR_INVALID_INPUT");

    let (status, guests) = get(&app, "/api/v1/guests").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(guests.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stay_lifecycle_over_http() {
    let (_tmp, app) = app();
    let (room_id, guest_id) = seed_room_and_guest(&app).await;
    let (_, reservation) = post(
        &app,
        "/api/v1/reservations",
        json!({
            "guest_id": guest_id,
            "room_id": room_id,
            "check_in": "2026-05-01",
            "check_out": "2026-05-03"
        }),
    )
    .await;
    let id = reservation["id"].as_str().unwrap();

    let (status, checked_in) =
        post(&app, &format!("/api/v1/reservations/{}/check-in?on=2026-05-01", id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checked_in["status"], "checked_in");

    let (status, summary) =
        post(&app, &format!("/api/v1/reservations/{}/check-out?on=2026-05-03", id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["reservation"]["status"], "checked_out");
    assert_eq!(summary["invoice"]["total_cents"], 24000);

    let (_, board) = get(&app, "/api/v1/rooms/status-board").await;
    assert_eq!(board["total_rooms"], 1);

    let (status, balance) = get(&app, "/api/v1/reports/trial-balance?as_of=2026-05-31").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["total_debit_cents"], balance["total_credit_cents"]);
}

#[tokio::test]
async fn test_unbalanced_posting_is_unprocessable() {
    let (_tmp, app) = app();
    let (status, body) = post(
        &app,
        "/api/v1/transactions",
        json!({
            "txn_date": "2026-01-02",
            "description": "Owner deposit",
            "lines": [
                {"account_id": "acct-1010", "debit_cents": 1000, "credit_cents": 0},
                {"account_id": "acct-3000", "debit_cents": 0, "credit_cents": 900}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "ERR_UNBALANCED");
}

#[tokio::test]
async fn test_delete_answers_no_content() {
    let (_tmp, app) = app();
    let (_, room_type) = post(
        &app,
        "/api/v1/room-types",
        json!({"name": "Suite", "base_rate_cents": 30000, "capacity": 4}),
    )
    .await;
    let uri = format!("/api/v1/room-types/{}", room_type["id"].as_str().unwrap());

    let (status, _, _) = send(&app, Method::DELETE, &uri, None, &[]).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
