use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::check_admin;
use crate::models::settings::{MAX_COMMISSION_RATE, MIN_COMMISSION_RATE};
use crate::models::{
    Booking, NotificationEvent, NotificationKind, Role, SystemSettings, VerificationStatus, Worker,
};
use crate::services::bookings;
use crate::services::reporting::{self, RevenueSummary};
use crate::services::reviews;
use crate::state::AppState;

// GET /api/admin/dashboard
#[derive(Serialize)]
pub struct DashboardResponse {
    pub total_customers: i64,
    pub total_workers: i64,
    pub total_bookings: i64,
    pub total_revenue: f64,
    pub bookings_by_status: std::collections::BTreeMap<&'static str, i64>,
    pub recent_bookings: Vec<Booking>,
}

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, AppError> {
    check_admin(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    let counts = queries::dashboard_counts(&db)?;
    let bookings = queries::list_bookings(&db, None, None, None)?;
    let bookings_by_status = reporting::count_by_status(&bookings);
    let recent_bookings = bookings.into_iter().take(10).collect();

    Ok(Json(DashboardResponse {
        total_customers: counts.total_customers,
        total_workers: counts.total_workers,
        total_bookings: counts.total_bookings,
        total_revenue: counts.total_revenue,
        bookings_by_status,
        recent_bookings,
    }))
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    check_admin(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    let bookings = queries::list_bookings(
        &db,
        query.status.as_deref(),
        query.start_date,
        query.end_date,
    )?;
    Ok(Json(bookings))
}

// PUT /api/admin/bookings/:id/reassign
#[derive(Deserialize)]
pub struct ReassignRequest {
    pub worker_id: String,
}

pub async fn reassign_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ReassignRequest>,
) -> Result<Json<Booking>, AppError> {
    check_admin(&headers, &state.config.admin_token)?;
    let booking = bookings::reassign_booking(&state, &id, &body.worker_id).await?;
    Ok(Json(booking))
}

// GET /api/admin/workers
pub async fn get_workers(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Worker>>, AppError> {
    check_admin(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    let workers = queries::list_workers(&db)?;
    Ok(Json(workers))
}

// PUT /api/admin/workers/:id/verify
pub async fn verify_worker(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Worker>, AppError> {
    check_admin(&headers, &state.config.admin_token)?;

    let (worker, event) = {
        let db = state.db.lock().unwrap();
        if !queries::set_worker_verification(&db, &id, VerificationStatus::Verified, None)? {
            return Err(AppError::NotFound(format!("worker {id} not found")));
        }
        let worker = queries::get_worker(&db, &id)?
            .ok_or_else(|| AppError::NotFound(format!("worker {id} not found")))?;

        let event = NotificationEvent {
            recipient_id: worker.user_id.clone(),
            recipient_role: Role::Worker,
            kind: NotificationKind::Announcement,
            title: "Verification Approved".to_string(),
            message: "Your profile has been verified. You can now receive bookings.".to_string(),
            related_id: Some(worker.id.clone()),
        };
        (worker, event)
    };

    state.notifier.dispatch(&[event]).await;
    Ok(Json(worker))
}

// PUT /api/admin/workers/:id/reject
#[derive(Deserialize)]
pub struct RejectWorkerRequest {
    pub reason: String,
}

pub async fn reject_worker(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<RejectWorkerRequest>,
) -> Result<Json<Worker>, AppError> {
    check_admin(&headers, &state.config.admin_token)?;

    let (worker, event) = {
        let db = state.db.lock().unwrap();
        if !queries::set_worker_verification(
            &db,
            &id,
            VerificationStatus::Rejected,
            Some(&body.reason),
        )? {
            return Err(AppError::NotFound(format!("worker {id} not found")));
        }
        let worker = queries::get_worker(&db, &id)?
            .ok_or_else(|| AppError::NotFound(format!("worker {id} not found")))?;

        let event = NotificationEvent {
            recipient_id: worker.user_id.clone(),
            recipient_role: Role::Worker,
            kind: NotificationKind::Announcement,
            title: "Verification Rejected".to_string(),
            message: format!("Your verification has been rejected. Reason: {}", body.reason),
            related_id: Some(worker.id.clone()),
        };
        (worker, event)
    };

    state.notifier.dispatch(&[event]).await;
    Ok(Json(worker))
}

// GET /api/admin/revenue
#[derive(Deserialize)]
pub struct RevenueQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn get_revenue(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<RevenueQuery>,
) -> Result<Json<RevenueSummary>, AppError> {
    check_admin(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    let summary = reporting::revenue_summary(&db, query.start_date, query.end_date)?;
    Ok(Json(summary))
}

// GET /api/admin/settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SystemSettings>, AppError> {
    check_admin(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    let settings = queries::get_settings(&db)?;
    Ok(Json(settings))
}

// PUT /api/admin/settings/commission
#[derive(Deserialize)]
pub struct CommissionRequest {
    pub commission_rate: f64,
}

pub async fn update_commission(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CommissionRequest>,
) -> Result<Json<SystemSettings>, AppError> {
    check_admin(&headers, &state.config.admin_token)?;

    if !body.commission_rate.is_finite()
        || !(MIN_COMMISSION_RATE..=MAX_COMMISSION_RATE).contains(&body.commission_rate)
    {
        return Err(AppError::Validation(format!(
            "commission rate must be between {MIN_COMMISSION_RATE} and {MAX_COMMISSION_RATE}"
        )));
    }

    let db = state.db.lock().unwrap();
    queries::set_commission_rate(&db, body.commission_rate)?;
    let settings = queries::get_settings(&db)?;
    Ok(Json(settings))
}

// DELETE /api/admin/reviews/:id
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_admin(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    reviews::delete_review(&db, &id)?;
    Ok(Json(serde_json::json!({"ok": true})))
}
