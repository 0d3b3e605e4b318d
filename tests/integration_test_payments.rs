mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use common::TestApp;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use tower::ServiceExt;

async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn initiate(app: &TestApp, token: &str, court_id: &str, date: &str, slots: &[&str]) -> Response {
    let payload = json!({
        "courtId": court_id,
        "date": date,
        "slots": slots,
        "sport": "BEACH_TENNIS"
    });

    app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/payments/create-preference")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(payload.to_string()))
            .unwrap()
    ).await.unwrap()
}

async fn deliver_webhook(app: &TestApp, payment_id: &str) -> Response {
    let payload = json!({ "type": "payment", "data": { "id": payment_id } });

    app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/payments/webhook")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    ).await.unwrap()
}

async fn book_directly(app: &TestApp, token: &str, court_id: &str, date: &str, start: &str, end: &str) -> Response {
    let payload = json!({
        "courtId": court_id,
        "sport": "BEACH_TENNIS",
        "date": date,
        "startTime": start,
        "endTime": end
    });

    app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/bookings")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(payload.to_string()))
            .unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_create_preference_computes_total() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50).await;
    let token = app.register_and_login("Alice", "alice@test.com", "secret123").await;

    let res = initiate(&app, &token, &court.id, "2030-06-01", &["14:00", "15:00"]).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["initPoint"], "https://payments.test/checkout");
    let pending_id = body["pendingId"].as_str().unwrap();

    // 2 slots at 50/h.
    let checkouts = app.gateway.checkouts.lock().unwrap().clone();
    assert_eq!(checkouts, vec![(pending_id.to_string(), 100)]);

    let pending = app.state.payment_repo.find_by_id(pending_id).await.unwrap().unwrap();
    assert_eq!(pending.status, "PENDING");
    assert_eq!(pending.total_amount, 100);
    assert_eq!(pending.preference_id.as_deref(), Some(format!("pref-{}", pending_id).as_str()));
    assert_eq!(pending.slot_list(), vec!["14:00", "15:00"]);
}

#[tokio::test]
async fn test_create_preference_requires_auth() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50).await;

    let payload = json!({
        "courtId": court.id,
        "date": "2030-06-01",
        "slots": ["14:00"],
        "sport": "BEACH_TENNIS"
    });

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/payments/create-preference")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_preference_rejects_booked_slot() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50).await;
    let token = app.register_and_login("Alice", "alice@test.com", "secret123").await;

    assert_eq!(
        book_directly(&app, &token, &court.id, "2030-06-01", "14:00", "15:00").await.status(),
        StatusCode::CREATED
    );

    let res = initiate(&app, &token, &court.id, "2030-06-01", &["14:00", "16:00"]).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("14:00"));

    // The conflicting attempt never reached the processor.
    assert!(app.gateway.checkouts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_preference_rejects_duplicate_slots_in_request() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50).await;
    let token = app.register_and_login("Alice", "alice@test.com", "secret123").await;

    let res = initiate(&app, &token, &court.id, "2030-06-01", &["14:00", "14:00"]).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_preference_validations() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50).await;
    let token = app.register_and_login("Alice", "alice@test.com", "secret123").await;

    let res = initiate(&app, &token, &court.id, "2030-06-01", &[]).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = initiate(&app, &token, &court.id, "2030-06-01", &["2pm"]).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = initiate(&app, &token, "no-such-court", "2030-06-01", &["14:00"]).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_preference_rejects_free_court() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra Gratis", "BEACH_TENNIS", "DESCOBERTA", 0).await;
    let token = app.register_and_login("Alice", "alice@test.com", "secret123").await;

    let res = initiate(&app, &token, &court.id, "2030-06-01", &["14:00"]).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_processor_failure_rejects_the_order() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50).await;
    let token = app.register_and_login("Alice", "alice@test.com", "secret123").await;

    app.gateway.fail_checkout.store(true, Ordering::SeqCst);

    let res = initiate(&app, &token, &court.id, "2030-06-01", &["14:00"]).await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    // The order exists but is terminally rejected; a later webhook for it
    // must not create bookings.
    let orders = sqlx::query_as::<_, arena_backend::domain::models::payment::PendingPayment>(
        "SELECT * FROM pending_payments"
    ).fetch_all(&app.pool).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, "REJECTED");
}

#[tokio::test]
async fn test_approval_materializes_all_slots() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50).await;
    let token = app.register_and_login("Alice", "alice@test.com", "secret123").await;

    let body = parse_body(initiate(&app, &token, &court.id, "2030-06-01", &["14:00", "15:00"]).await).await;
    let pending_id = body["pendingId"].as_str().unwrap();

    app.gateway.approve("mp-1001", pending_id);
    let res = deliver_webhook(&app, "mp-1001").await;
    assert_eq!(res.status(), StatusCode::OK);

    let date = chrono::NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
    let bookings = app.state.booking_repo.list_active_by_court_date(&court.id, date).await.unwrap();
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].start_time.format("%H:%M").to_string(), "14:00");
    assert_eq!(bookings[0].end_time.format("%H:%M").to_string(), "15:00");
    assert_eq!(bookings[1].start_time.format("%H:%M").to_string(), "15:00");
    assert_eq!(bookings[1].end_time.format("%H:%M").to_string(), "16:00");

    let pending = app.state.payment_repo.find_by_id(pending_id).await.unwrap().unwrap();
    assert_eq!(pending.status, "APPROVED");
}

#[tokio::test]
async fn test_duplicate_webhook_is_idempotent() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50).await;
    let token = app.register_and_login("Alice", "alice@test.com", "secret123").await;

    let body = parse_body(initiate(&app, &token, &court.id, "2030-06-01", &["14:00", "15:00"]).await).await;
    let pending_id = body["pendingId"].as_str().unwrap();

    app.gateway.approve("mp-1001", pending_id);
    assert_eq!(deliver_webhook(&app, "mp-1001").await.status(), StatusCode::OK);
    assert_eq!(deliver_webhook(&app, "mp-1001").await.status(), StatusCode::OK);

    let date = chrono::NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
    let bookings = app.state.booking_repo.list_active_by_court_date(&court.id, date).await.unwrap();
    assert_eq!(bookings.len(), 2, "bookings must be created exactly once");
}

#[tokio::test]
async fn test_webhook_ignores_unapproved_payment() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50).await;
    let token = app.register_and_login("Alice", "alice@test.com", "secret123").await;

    let body = parse_body(initiate(&app, &token, &court.id, "2030-06-01", &["14:00"]).await).await;
    let pending_id = body["pendingId"].as_str().unwrap();

    app.gateway.set_payment("mp-1001", "in_process", Some(pending_id));
    assert_eq!(deliver_webhook(&app, "mp-1001").await.status(), StatusCode::OK);

    let date = chrono::NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
    let bookings = app.state.booking_repo.list_active_by_court_date(&court.id, date).await.unwrap();
    assert!(bookings.is_empty());

    let pending = app.state.payment_repo.find_by_id(pending_id).await.unwrap().unwrap();
    assert_eq!(pending.status, "PENDING");
}

#[tokio::test]
async fn test_webhook_ignores_unknown_payment_and_missing_id() {
    let app = TestApp::new().await;

    // Processor does not recognize the id.
    assert_eq!(deliver_webhook(&app, "mp-unknown").await.status(), StatusCode::OK);

    // No payment id at all.
    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/payments/webhook")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_accepts_query_parameter_id() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50).await;
    let token = app.register_and_login("Alice", "alice@test.com", "secret123").await;

    let body = parse_body(initiate(&app, &token, &court.id, "2030-06-01", &["14:00"]).await).await;
    let pending_id = body["pendingId"].as_str().unwrap();
    app.gateway.approve("mp-1001", pending_id);

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/payments/webhook?data.id=mp-1001&type=payment")
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let pending = app.state.payment_repo.find_by_id(pending_id).await.unwrap().unwrap();
    assert_eq!(pending.status, "APPROVED");
}

#[tokio::test]
async fn test_lost_slot_is_skipped_and_order_still_approves() {
    let app = TestApp::new().await;
    let court = app.create_court("Quadra 4", "BEACH_TENNIS", "DESCOBERTA", 50).await;
    let alice = app.register_and_login("Alice", "alice@test.com", "secret123").await;
    let bob = app.register_and_login("Bob", "bob@test.com", "secret123").await;

    let body = parse_body(initiate(&app, &alice, &court.id, "2030-06-01", &["14:00", "15:00"]).await).await;
    let pending_id = body["pendingId"].as_str().unwrap();

    // Bob snatches 14:00 while Alice is off paying.
    assert_eq!(
        book_directly(&app, &bob, &court.id, "2030-06-01", "14:00", "15:00").await.status(),
        StatusCode::CREATED
    );

    app.gateway.approve("mp-1001", pending_id);
    assert_eq!(deliver_webhook(&app, "mp-1001").await.status(), StatusCode::OK);

    // Partial fulfillment: Bob keeps 14:00, Alice gets 15:00, the order is
    // settled either way.
    let date = chrono::NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
    let bookings = app.state.booking_repo.list_active_by_court_date(&court.id, date).await.unwrap();
    assert_eq!(bookings.len(), 2);

    let pending = app.state.payment_repo.find_by_id(pending_id).await.unwrap().unwrap();
    assert_eq!(pending.status, "APPROVED");

    let alice_bookings: Vec<_> = bookings.iter()
        .filter(|b| b.start_time.format("%H:%M").to_string() == "15:00")
        .collect();
    assert_eq!(alice_bookings.len(), 1);
}
