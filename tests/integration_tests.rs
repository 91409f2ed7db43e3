use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use tower::ServiceExt;

use fixly::config::AppConfig;
use fixly::db;
use fixly::models::NotificationEvent;
use fixly::services::notify::store::StoreSink;
use fixly::services::notify::{NotificationSink, Notifier};
use fixly::state::AppState;

// ── Mock sink ──

struct CaptureSink {
    events: Arc<Mutex<Vec<NotificationEvent>>>,
}

#[async_trait]
impl NotificationSink for CaptureSink {
    async fn deliver(&self, event: &NotificationEvent) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_token: "test-token".to_string(),
        notify_webhook_url: "".to_string(),
        notify_webhook_secret: "".to_string(),
    }
}

fn test_state() -> (Arc<AppState>, Arc<Mutex<Vec<NotificationEvent>>>) {
    let conn = db::init_db(":memory:").unwrap();
    let db = Arc::new(Mutex::new(conn));
    let events = Arc::new(Mutex::new(vec![]));

    let sinks: Vec<Box<dyn NotificationSink>> = vec![
        Box::new(StoreSink::new(Arc::clone(&db))),
        Box::new(CaptureSink {
            events: Arc::clone(&events),
        }),
    ];

    let state = Arc::new(AppState {
        db,
        config: test_config(),
        notifier: Notifier::new(sinks),
    });
    (state, events)
}

fn request(
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (key, value) in headers {
        builder = builder.header(*key, *value);
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(
    state: &Arc<AppState>,
    req: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let res = fixly::router(Arc::clone(state)).oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn customer_headers(id: &str) -> [(&'static str, &str); 2] {
    [("x-actor-id", id), ("x-actor-role", "customer")]
}

fn worker_headers(id: &str) -> [(&'static str, &str); 2] {
    [("x-actor-id", id), ("x-actor-role", "worker")]
}

const ADMIN: [(&str, &str); 1] = [("authorization", "Bearer test-token")];

fn booking_body(worker_id: &str, price: f64) -> serde_json::Value {
    let tomorrow = (Utc::now().date_naive() + Duration::days(1)).to_string();
    serde_json::json!({
        "worker_id": worker_id,
        "service_category": "plumbing",
        "duration": "one-time",
        "scheduled_date": tomorrow,
        "scheduled_time": "10:00 AM",
        "address": {
            "street": "12 Main St",
            "city": "Pune",
            "state": "MH",
            "postal_code": "411001"
        },
        "notes": "leaky tap",
        "payment_method": "cash",
        "total_price": price
    })
}

/// Registers a worker profile for `user_id` and verifies it as admin.
/// Returns the worker id.
async fn verified_worker(state: &Arc<AppState>, user_id: &str) -> String {
    let (status, worker) = send(
        state,
        request(
            "POST",
            "/api/workers",
            &worker_headers(user_id),
            Some(serde_json::json!({
                "service_category": "plumbing",
                "experience_years": 3,
                "service_charges": 500.0,
                "skills": ["pipes", "fittings"]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let worker_id = worker["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        state,
        request(
            "PUT",
            &format!("/api/admin/workers/{worker_id}/verify"),
            &ADMIN,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    worker_id
}

/// Creates a pending booking for the customer and returns its id.
async fn place_booking(
    state: &Arc<AppState>,
    customer_id: &str,
    worker_id: &str,
    price: f64,
) -> String {
    let (status, booking) = send(
        state,
        request(
            "POST",
            "/api/bookings",
            &customer_headers(customer_id),
            Some(booking_body(worker_id, price)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "pending");
    booking["id"].as_str().unwrap().to_string()
}

async fn accept(state: &Arc<AppState>, worker_user: &str, booking_id: &str) {
    let (status, booking) = send(
        state,
        request(
            "PUT",
            &format!("/api/worker/bookings/{booking_id}/accept"),
            &worker_headers(worker_user),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "confirmed");
}

async fn check_in(state: &Arc<AppState>, worker_user: &str, booking_id: &str) {
    let (status, attendance) = send(
        state,
        request(
            "POST",
            "/api/worker/checkin",
            &worker_headers(worker_user),
            Some(serde_json::json!({"booking_id": booking_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(attendance["status"], "checked-in");
}

async fn check_out(
    state: &Arc<AppState>,
    worker_user: &str,
    booking_id: &str,
) -> (StatusCode, serde_json::Value) {
    send(
        state,
        request(
            "POST",
            "/api/worker/checkout",
            &worker_headers(worker_user),
            Some(serde_json::json!({"booking_id": booking_id})),
        ),
    )
    .await
}

// ── Basics ──

#[tokio::test]
async fn test_health() {
    let (state, _) = test_state();
    let (status, body) = send(&state, request("GET", "/health", &[], None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_booking_creation_requires_identity() {
    let (state, _) = test_state();
    let (status, _) = send(
        &state,
        request("POST", "/api/bookings", &[], Some(booking_body("w1", 100.0))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_requires_token() {
    let (state, _) = test_state();

    let (status, _) = send(&state, request("GET", "/api/admin/dashboard", &[], None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &state,
        request(
            "GET",
            "/api/admin/dashboard",
            &[("authorization", "Bearer wrong-token")],
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ── Booking creation ──

#[tokio::test]
async fn test_past_date_is_rejected_and_nothing_persisted() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;

    let mut body = booking_body(&worker_id, 700.0);
    body["scheduled_date"] =
        serde_json::json!((Utc::now().date_naive() - Duration::days(1)).to_string());

    let (status, error) = send(
        &state,
        request(
            "POST",
            "/api/bookings",
            &customer_headers("cust-1"),
            Some(body),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().contains("past"));

    let (status, bookings) =
        send(&state, request("GET", "/api/admin/bookings", &ADMIN, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(bookings.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_address_field_is_rejected() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;

    let mut body = booking_body(&worker_id, 700.0);
    body["address"]["city"] = serde_json::json!("");

    let (status, _) = send(
        &state,
        request(
            "POST",
            "/api/bookings",
            &customer_headers("cust-1"),
            Some(body),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_worker_is_not_found() {
    let (state, _) = test_state();
    let (status, _) = send(
        &state,
        request(
            "POST",
            "/api/bookings",
            &customer_headers("cust-1"),
            Some(booking_body("no-such-worker", 100.0)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unverified_worker_cannot_be_booked() {
    let (state, _) = test_state();

    // Registered but never verified by the admin.
    let (_, worker) = send(
        &state,
        request(
            "POST",
            "/api/workers",
            &worker_headers("user-w1"),
            Some(serde_json::json!({
                "service_category": "plumbing",
                "service_charges": 500.0
            })),
        ),
    )
    .await;
    let worker_id = worker["id"].as_str().unwrap();

    let (status, _) = send(
        &state,
        request(
            "POST",
            "/api/bookings",
            &customer_headers("cust-1"),
            Some(booking_body(worker_id, 100.0)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unavailable_worker_cannot_be_booked() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;

    let (status, _) = send(
        &state,
        request(
            "PUT",
            "/api/worker/profile",
            &worker_headers("user-w1"),
            Some(serde_json::json!({"is_available": false})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &state,
        request(
            "POST",
            "/api/bookings",
            &customer_headers("cust-1"),
            Some(booking_body(&worker_id, 100.0)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Lifecycle ──

#[tokio::test]
async fn test_booking_settlement_happy_path() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    accept(&state, "user-w1", &booking_id).await;
    check_in(&state, "user-w1", &booking_id).await;

    let (status, result) = check_out(&state, "user-w1", &booking_id).await;
    assert_eq!(status, StatusCode::OK);

    // Commission split at the default 10% rate.
    let payment = &result["payment"];
    assert_eq!(payment["amount"], 700.0);
    assert_eq!(payment["commission_rate"], 10.0);
    assert_eq!(payment["commission_amount"], 70.0);
    assert_eq!(payment["worker_earnings"], 630.0);
    assert_eq!(payment["payment_status"], "completed");

    let attendance = &result["attendance"];
    assert_eq!(attendance["status"], "checked-out");
    assert_eq!(attendance["duration_minutes"], 0);

    let (status, booking) = send(
        &state,
        request(
            "GET",
            &format!("/api/bookings/{booking_id}"),
            &customer_headers("cust-1"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "completed");

    // Worker stats and earnings reflect the settlement.
    let (_, workers) = send(&state, request("GET", "/api/admin/workers", &ADMIN, None)).await;
    let worker = workers
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["id"] == *worker_id)
        .unwrap();
    assert_eq!(worker["completed_jobs"], 1);

    let (_, earnings) = send(
        &state,
        request(
            "GET",
            "/api/worker/earnings",
            &worker_headers("user-w1"),
            None,
        ),
    )
    .await;
    assert_eq!(earnings["total_earnings"], 630.0);
    assert_eq!(earnings["total_commission"], 70.0);

    let (_, revenue) = send(&state, request("GET", "/api/admin/revenue", &ADMIN, None)).await;
    assert_eq!(revenue["total_revenue"], 70.0);
    assert_eq!(revenue["settled_bookings"], 1);
}

#[tokio::test]
async fn test_lifecycle_notifications() {
    let (state, events) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    accept(&state, "user-w1", &booking_id).await;
    check_in(&state, "user-w1", &booking_id).await;
    let (status, _) = check_out(&state, "user-w1", &booking_id).await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<String> = events
        .lock()
        .unwrap()
        .iter()
        .map(|e| e.title.clone())
        .collect();
    for expected in [
        "Booking Received",
        "New Booking Request",
        "Booking Confirmed",
        "Service Started",
        "Service Completed",
        "Payment Credited",
    ] {
        assert!(titles.iter().any(|t| t == expected), "missing {expected}");
    }
}

#[tokio::test]
async fn test_reject_with_reason_notifies_customer() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    let (status, booking) = send(
        &state,
        request(
            "PUT",
            &format!("/api/worker/bookings/{booking_id}/reject"),
            &worker_headers("user-w1"),
            Some(serde_json::json!({"reason": "fully booked"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "rejected");
    assert_eq!(booking["cancellation_reason"], "fully booked");

    let (_, notifications) = send(
        &state,
        request(
            "GET",
            "/api/notifications",
            &customer_headers("cust-1"),
            None,
        ),
    )
    .await;
    let rejected = notifications
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["title"] == "Booking Rejected")
        .expect("customer was not notified of the rejection");
    assert!(rejected["message"]
        .as_str()
        .unwrap()
        .contains("fully booked"));
}

#[tokio::test]
async fn test_customer_cancels_pending_booking() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    let (status, booking) = send(
        &state,
        request(
            "PUT",
            &format!("/api/bookings/{booking_id}/cancel"),
            &customer_headers("cust-1"),
            Some(serde_json::json!({"reason": "changed my mind"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "cancelled");
    assert_eq!(booking["cancellation_reason"], "changed my mind");

    // Terminal: the worker can no longer accept it.
    let (status, _) = send(
        &state,
        request(
            "PUT",
            &format!("/api/worker/bookings/{booking_id}/accept"),
            &worker_headers("user-w1"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_other_customers_cannot_cancel() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    let (status, _) = send(
        &state,
        request(
            "PUT",
            &format!("/api/bookings/{booking_id}/cancel"),
            &customer_headers("cust-2"),
            Some(serde_json::json!({"reason": "not mine"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_accept_twice_is_a_conflict() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    accept(&state, "user-w1", &booking_id).await;

    let (status, _) = send(
        &state,
        request(
            "PUT",
            &format!("/api/worker/bookings/{booking_id}/accept"),
            &worker_headers("user-w1"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_checkout_without_checkin_creates_no_payment() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    accept(&state, "user-w1", &booking_id).await;

    let (status, _) = check_out(&state, "user-w1", &booking_id).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, revenue) = send(&state, request("GET", "/api/admin/revenue", &ADMIN, None)).await;
    assert_eq!(revenue["settled_bookings"], 0);
}

#[tokio::test]
async fn test_double_checkout_yields_exactly_one_payment() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    accept(&state, "user-w1", &booking_id).await;
    check_in(&state, "user-w1", &booking_id).await;

    let (status, _) = check_out(&state, "user-w1", &booking_id).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = check_out(&state, "user-w1", &booking_id).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, revenue) = send(&state, request("GET", "/api/admin/revenue", &ADMIN, None)).await;
    assert_eq!(revenue["settled_bookings"], 1);
    assert_eq!(revenue["total_revenue"], 70.0);

    // completed_jobs incremented exactly once.
    let (_, workers) = send(&state, request("GET", "/api/admin/workers", &ADMIN, None)).await;
    let worker = workers
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["id"] == *worker_id)
        .unwrap();
    assert_eq!(worker["completed_jobs"], 1);
}

#[tokio::test]
async fn test_checkin_requires_confirmed_booking() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    // Still pending.
    let (status, _) = send(
        &state,
        request(
            "POST",
            "/api/worker/checkin",
            &worker_headers("user-w1"),
            Some(serde_json::json!({"booking_id": booking_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_other_workers_cannot_act_on_booking() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    verified_worker(&state, "user-w2").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    let (status, _) = send(
        &state,
        request(
            "PUT",
            &format!("/api/worker/bookings/{booking_id}/accept"),
            &worker_headers("user-w2"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Reassignment ──

#[tokio::test]
async fn test_admin_reassigns_confirmed_booking() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let new_worker_id = verified_worker(&state, "user-w2").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    accept(&state, "user-w1", &booking_id).await;

    let (status, booking) = send(
        &state,
        request(
            "PUT",
            &format!("/api/admin/bookings/{booking_id}/reassign"),
            &ADMIN,
            Some(serde_json::json!({"worker_id": new_worker_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["worker_id"], *new_worker_id);
    assert_eq!(booking["status"], "confirmed");

    // Both the outgoing and the incoming worker are told.
    for (user, title) in [
        ("user-w1", "Booking Reassigned"),
        ("user-w2", "New Booking Assigned"),
    ] {
        let (_, notifications) = send(
            &state,
            request("GET", "/api/notifications", &worker_headers(user), None),
        )
        .await;
        assert!(
            notifications
                .as_array()
                .unwrap()
                .iter()
                .any(|n| n["title"] == title),
            "{user} missing '{title}'"
        );
    }

    // The new worker can run the visit to completion.
    check_in(&state, "user-w2", &booking_id).await;
    let (status, _) = check_out(&state, "user-w2", &booking_id).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_pending_booking_cannot_be_reassigned() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let new_worker_id = verified_worker(&state, "user-w2").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    let (status, _) = send(
        &state,
        request(
            "PUT",
            &format!("/api/admin/bookings/{booking_id}/reassign"),
            &ADMIN,
            Some(serde_json::json!({"worker_id": new_worker_id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ── Commission settings ──

#[tokio::test]
async fn test_commission_rate_is_snapshotted_per_settlement() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;

    // Booking A settles at the default 10%.
    let booking_a = place_booking(&state, "cust-1", &worker_id, 700.0).await;
    accept(&state, "user-w1", &booking_a).await;
    check_in(&state, "user-w1", &booking_a).await;
    let (_, settled_a) = check_out(&state, "user-w1", &booking_a).await;
    assert_eq!(settled_a["payment"]["commission_rate"], 10.0);
    assert_eq!(settled_a["payment"]["commission_amount"], 70.0);

    // Admin raises the platform rate to 20%.
    let (status, settings) = send(
        &state,
        request(
            "PUT",
            "/api/admin/settings/commission",
            &ADMIN,
            Some(serde_json::json!({"commission_rate": 20.0})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["commission_rate"], 20.0);

    // Booking B settles at the new rate.
    let booking_b = place_booking(&state, "cust-1", &worker_id, 700.0).await;
    accept(&state, "user-w1", &booking_b).await;
    check_in(&state, "user-w1", &booking_b).await;
    let (_, settled_b) = check_out(&state, "user-w1", &booking_b).await;
    assert_eq!(settled_b["payment"]["commission_rate"], 20.0);
    assert_eq!(settled_b["payment"]["commission_amount"], 140.0);

    // A's historical payment is untouched: total platform revenue is 70 + 140.
    let (_, revenue) = send(&state, request("GET", "/api/admin/revenue", &ADMIN, None)).await;
    assert_eq!(revenue["total_revenue"], 210.0);
}

#[tokio::test]
async fn test_commission_rate_bounds() {
    let (state, _) = test_state();

    for rate in [80.0, -5.0] {
        let (status, _) = send(
            &state,
            request(
                "PUT",
                "/api/admin/settings/commission",
                &ADMIN,
                Some(serde_json::json!({"commission_rate": rate})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, settings) = send(&state, request("GET", "/api/admin/settings", &ADMIN, None)).await;
    assert_eq!(settings["commission_rate"], 10.0);
}

// ── Reviews ──

#[tokio::test]
async fn test_review_flow_updates_worker_rating() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    accept(&state, "user-w1", &booking_id).await;
    check_in(&state, "user-w1", &booking_id).await;
    let (status, _) = check_out(&state, "user-w1", &booking_id).await;
    assert_eq!(status, StatusCode::OK);

    let (status, review) = send(
        &state,
        request(
            "POST",
            "/api/reviews",
            &customer_headers("cust-1"),
            Some(serde_json::json!({
                "booking_id": booking_id,
                "rating": 5,
                "comment": "spotless work"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, workers) = send(&state, request("GET", "/api/admin/workers", &ADMIN, None)).await;
    let worker = workers
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["id"] == *worker_id)
        .unwrap();
    assert_eq!(worker["rating"], 5.0);
    assert_eq!(worker["total_ratings"], 1);

    // Admin deletion recomputes the rating down to zero.
    let review_id = review["id"].as_str().unwrap();
    let (status, _) = send(
        &state,
        request(
            "DELETE",
            &format!("/api/admin/reviews/{review_id}"),
            &ADMIN,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, workers) = send(&state, request("GET", "/api/admin/workers", &ADMIN, None)).await;
    let worker = workers
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["id"] == *worker_id)
        .unwrap();
    assert_eq!(worker["rating"], 0.0);
    assert_eq!(worker["total_ratings"], 0);
}

#[tokio::test]
async fn test_incomplete_booking_cannot_be_reviewed() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    let (status, _) = send(
        &state,
        request(
            "POST",
            "/api/reviews",
            &customer_headers("cust-1"),
            Some(serde_json::json!({"booking_id": booking_id, "rating": 4})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Notifications & dashboards ──

#[tokio::test]
async fn test_notifications_mark_read() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    place_booking(&state, "cust-1", &worker_id, 700.0).await;

    let (_, notifications) = send(
        &state,
        request(
            "GET",
            "/api/notifications",
            &customer_headers("cust-1"),
            None,
        ),
    )
    .await;
    let first = &notifications.as_array().unwrap()[0];
    assert_eq!(first["is_read"], false);
    let id = first["id"].as_i64().unwrap();

    let (status, _) = send(
        &state,
        request(
            "POST",
            &format!("/api/notifications/{id}/read"),
            &customer_headers("cust-1"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Another recipient cannot mark it.
    let (status, _) = send(
        &state,
        request(
            "POST",
            &format!("/api/notifications/{id}/read"),
            &customer_headers("cust-2"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_dashboard_counts() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;
    place_booking(&state, "cust-2", &worker_id, 300.0).await;

    accept(&state, "user-w1", &booking_id).await;
    check_in(&state, "user-w1", &booking_id).await;
    let (status, _) = check_out(&state, "user-w1", &booking_id).await;
    assert_eq!(status, StatusCode::OK);

    let (status, dashboard) =
        send(&state, request("GET", "/api/admin/dashboard", &ADMIN, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_customers"], 2);
    assert_eq!(dashboard["total_workers"], 1);
    assert_eq!(dashboard["total_bookings"], 2);
    assert_eq!(dashboard["total_revenue"], 70.0);
    assert_eq!(dashboard["bookings_by_status"]["completed"], 1);
    assert_eq!(dashboard["bookings_by_status"]["pending"], 1);
}

#[tokio::test]
async fn test_customer_attendance_history() {
    let (state, _) = test_state();
    let worker_id = verified_worker(&state, "user-w1").await;
    let booking_id = place_booking(&state, "cust-1", &worker_id, 700.0).await;

    accept(&state, "user-w1", &booking_id).await;
    check_in(&state, "user-w1", &booking_id).await;
    let (status, _) = check_out(&state, "user-w1", &booking_id).await;
    assert_eq!(status, StatusCode::OK);

    let (status, history) = send(
        &state,
        request(
            "GET",
            "/api/customer/attendance",
            &customer_headers("cust-1"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["total_visits"], 1);
    assert_eq!(history["attendance"][0]["status"], "checked-out");
}
