//! Router tests against the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use salon_booking_server::{
    api::create_router,
    models::{claims::ROLE_ADMIN, StaffClaims},
    repository::Repository,
    AppConfig, AppState,
};

fn app() -> (Router, AppConfig) {
    let config = AppConfig::default();
    let state = AppState::new(config.clone(), Repository::in_memory());
    (create_router(state), config)
}

fn token(config: &AppConfig, role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    StaffClaims {
        sub: "owner".to_string(),
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
    }
    .create_token(&config.auth.jwt_secret)
    .expect("token")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

#[tokio::test]
async fn health_and_readiness() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn slots_use_default_hours_on_a_fresh_store() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/availability/slots?date=2099-06-03",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2099-06-03");
    assert_eq!(body["is_open"], true);
    assert_eq!(body["open_time"], "09:00");
    assert_eq!(body["close_time"], "18:00");
    assert_eq!(body["is_blocked"], false);
    assert_eq!(body["block_reason"], Value::Null);
    assert_eq!(body["booked_slots"], json!([]));

    // Sunday defaults to closed
    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/availability/slots?date=2099-06-07",
        None,
        None,
    )
    .await;
    assert_eq!(body["is_open"], false);
    assert_eq!(body["is_blocked"], false);
}

#[tokio::test]
async fn slots_reject_missing_or_malformed_date() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/availability/slots", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap_or_default().contains("date"));

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/availability/slots?date=not-a-date",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_routes_require_an_admin_token() {
    let (app, config) = app();

    let (status, _) = send(&app, Method::GET, "/api/v1/admin/availability/weekly", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/admin/availability/weekly",
        Some("garbage"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let stylist = token(&config, "stylist");
    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/admin/availability/blackouts",
        Some(&stylist),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn weekly_template_save_then_read() {
    let (app, config) = app();
    let admin = token(&config, ROLE_ADMIN);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/admin/availability/weekly",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let days = body.as_array().expect("array");
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["day_of_week"], 0);
    assert_eq!(days[0]["is_available"], false);

    let payload = json!({
        "days": [
            { "day_of_week": 0, "is_open": true, "start": "10:00", "end": "14:00" },
            { "day_of_week": 3, "is_open": false }
        ]
    });
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/admin/availability/weekly",
        Some(&admin),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["is_available"], true);
    assert_eq!(body[0]["start_time"], "10:00");
    assert_eq!(body[0]["end_time"], "14:00");
    assert_eq!(body[3]["is_available"], false);
    // Days left out of the submission keep their defaults
    assert_eq!(body[1]["is_available"], true);
    assert_eq!(body[1]["start_time"], "09:00");

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/availability/slots?date=2099-06-07",
        None,
        None,
    )
    .await;
    assert_eq!(body["is_open"], true);
    assert_eq!(body["open_time"], "10:00");
    assert_eq!(body["close_time"], "14:00");
}

#[tokio::test]
async fn weekly_template_rejects_bad_entries() {
    let (app, config) = app();
    let admin = token(&config, ROLE_ADMIN);

    for payload in [
        json!({}),
        json!({ "days": [{ "day_of_week": 7, "is_open": true }] }),
        json!({ "days": [{ "day_of_week": 2, "is_open": true, "start": "9am" }] }),
        json!({ "days": [
            { "day_of_week": 2, "is_open": true },
            { "day_of_week": 2, "is_open": false }
        ] }),
    ] {
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/admin/availability/weekly",
            Some(&admin),
            Some(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    }
}

#[tokio::test]
async fn blackout_lifecycle() {
    let (app, config) = app();
    let admin = token(&config, ROLE_ADMIN);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/admin/availability/blackouts",
        Some(&admin),
        Some(json!({ "date": "2099-06-03", "reason": "Holiday" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().expect("id");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/admin/availability/blackouts",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["date"], "2099-06-03");
    assert_eq!(body[0]["reason"], "Holiday");

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/availability/slots?date=2099-06-03",
        None,
        None,
    )
    .await;
    assert_eq!(body["is_open"], false);
    assert_eq!(body["is_blocked"], true);
    assert_eq!(body["block_reason"], "Holiday");

    let uri = format!("/api/v1/admin/availability/blackouts/{}", id);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/availability/slots?date=2099-06-03",
        None,
        None,
    )
    .await;
    assert_eq!(body["is_open"], true);
}

#[tokio::test]
async fn blackout_requires_a_date() {
    let (app, config) = app();
    let admin = token(&config, ROLE_ADMIN);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/admin/availability/blackouts",
        Some(&admin),
        Some(json!({ "reason": "No date" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn booking(date: &str) -> Value {
    json!({
        "customer_name": "Ama Mensah",
        "customer_email": "ama@example.com",
        "style_name": "Knotless braids",
        "date": date,
        "start_time": "10:00",
        "end_time": "13:00"
    })
}

#[tokio::test]
async fn booking_flow_with_payment_webhook() {
    let (app, config) = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        None,
        Some(booking("2099-06-03")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    let id = body["id"].as_i64().expect("id");

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/availability/slots?date=2099-06-03",
        None,
        None,
    )
    .await;
    assert_eq!(body["booked_slots"][0]["start_time"], "10:00");
    assert_eq!(body["booked_slots"][0]["end_time"], "13:00");

    let event = json!({ "reservation_id": id, "outcome": "succeeded", "payment_reference": "pi_123" });

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/webhooks/payment")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(event.to_string()))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/webhooks/payment")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-webhook-secret", config.payments.webhook_secret.as_str())
        .body(Body::from(event.to_string()))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["payment_reference"], "pi_123");

    let admin = token(&config, ROLE_ADMIN);
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/admin/bookings?status=confirmed",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/admin/bookings/{}/status", id),
        Some(&admin),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    // Cancelled reservations no longer show as booked
    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/availability/slots?date=2099-06-03",
        None,
        None,
    )
    .await;
    assert_eq!(body["booked_slots"], json!([]));
}

#[tokio::test]
async fn booking_rejected_on_closed_or_past_dates() {
    let (app, _) = app();

    // Sunday
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        None,
        Some(booking("2099-06-07")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/bookings",
        None,
        Some(booking("2000-01-05")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/admin/bookings/1",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_checks_the_secret_before_the_body() {
    let (app, config) = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/webhooks/payment")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/webhooks/payment")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-webhook-secret", config.payments.webhook_secret.as_str())
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
