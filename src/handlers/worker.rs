use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, queries};
use crate::errors::AppError;
use crate::handlers::require_role;
use crate::models::{
    Attendance, Booking, Payment, Role, VerificationStatus, Worker,
};
use crate::services::reporting::{self, EarningsSummary};
use crate::services::{attendance, bookings};
use crate::state::AppState;

// POST /api/workers
#[derive(Deserialize)]
pub struct RegisterWorkerRequest {
    pub service_category: String,
    pub experience_years: Option<i32>,
    pub service_charges: f64,
    pub skills: Option<Vec<String>>,
}

pub async fn register_worker(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<RegisterWorkerRequest>,
) -> Result<Json<Worker>, AppError> {
    let actor = require_role(&headers, Role::Worker)?;

    if body.service_category.trim().is_empty() {
        return Err(AppError::Validation(
            "service category is required".to_string(),
        ));
    }
    if !body.service_charges.is_finite() || body.service_charges < 0.0 {
        return Err(AppError::Validation(
            "service charges must be a non-negative amount".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let worker = Worker {
        id: Uuid::new_v4().to_string(),
        user_id: actor.id.clone(),
        service_category: body.service_category,
        experience_years: body.experience_years.unwrap_or(0),
        service_charges: body.service_charges,
        skills: body.skills.unwrap_or_default(),
        verification_status: VerificationStatus::Pending,
        verification_date: None,
        rejection_reason: None,
        rating: 0.0,
        total_ratings: 0,
        completed_jobs: 0,
        is_available: true,
        created_at: now,
        updated_at: now,
    };

    let db = state.db.lock().unwrap();
    match queries::create_worker(&db, &worker) {
        Ok(()) => Ok(Json(worker)),
        Err(e) if db::is_unique_violation(&e) => Err(AppError::Conflict(
            "worker profile already exists for this user".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

// PUT /api/worker/profile
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub service_charges: Option<f64>,
    pub skills: Option<Vec<String>>,
    pub is_available: Option<bool>,
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Worker>, AppError> {
    let actor = require_role(&headers, Role::Worker)?;

    if let Some(charges) = body.service_charges {
        if !charges.is_finite() || charges < 0.0 {
            return Err(AppError::Validation(
                "service charges must be a non-negative amount".to_string(),
            ));
        }
    }

    let db = state.db.lock().unwrap();
    let worker = queries::get_worker_by_user(&db, &actor.id)?
        .ok_or_else(|| AppError::NotFound("worker profile not found".to_string()))?;

    queries::update_worker_profile(
        &db,
        &worker.id,
        body.service_charges,
        body.skills.as_deref(),
        body.is_available,
    )?;

    let worker = queries::get_worker(&db, &worker.id)?
        .ok_or_else(|| AppError::NotFound("worker profile not found".to_string()))?;
    Ok(Json(worker))
}

// GET /api/worker/bookings
pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Booking>>, AppError> {
    let actor = require_role(&headers, Role::Worker)?;

    let db = state.db.lock().unwrap();
    let worker = queries::get_worker_by_user(&db, &actor.id)?
        .ok_or_else(|| AppError::NotFound("worker profile not found".to_string()))?;
    let bookings = queries::bookings_for_worker(&db, &worker.id)?;
    Ok(Json(bookings))
}

// PUT /api/worker/bookings/:id/accept
pub async fn accept_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let actor = require_role(&headers, Role::Worker)?;
    let booking = bookings::accept_booking(&state, &actor.id, &id).await?;
    Ok(Json(booking))
}

// PUT /api/worker/bookings/:id/reject
#[derive(Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

pub async fn reject_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<RejectRequest>,
) -> Result<Json<Booking>, AppError> {
    let actor = require_role(&headers, Role::Worker)?;
    let booking = bookings::reject_booking(&state, &actor.id, &id, &body.reason).await?;
    Ok(Json(booking))
}

// POST /api/worker/checkin
#[derive(Deserialize)]
pub struct CheckInRequest {
    pub booking_id: String,
}

pub async fn check_in(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CheckInRequest>,
) -> Result<Json<Attendance>, AppError> {
    let actor = require_role(&headers, Role::Worker)?;
    let record = attendance::check_in(&state, &actor.id, &body.booking_id).await?;
    Ok(Json(record))
}

// POST /api/worker/checkout
#[derive(Deserialize)]
pub struct CheckOutRequest {
    pub booking_id: String,
}

#[derive(Serialize)]
pub struct CheckOutResponse {
    pub attendance: Attendance,
    pub payment: Payment,
}

pub async fn check_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CheckOutRequest>,
) -> Result<Json<CheckOutResponse>, AppError> {
    let actor = require_role(&headers, Role::Worker)?;
    let (attendance, payment) = attendance::check_out(&state, &actor.id, &body.booking_id).await?;
    Ok(Json(CheckOutResponse {
        attendance,
        payment,
    }))
}

// GET /api/worker/earnings
pub async fn get_earnings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<EarningsSummary>, AppError> {
    let actor = require_role(&headers, Role::Worker)?;

    let db = state.db.lock().unwrap();
    let worker = queries::get_worker_by_user(&db, &actor.id)?
        .ok_or_else(|| AppError::NotFound("worker profile not found".to_string()))?;
    let summary = reporting::earnings_summary(&db, &worker.id)?;
    Ok(Json(summary))
}
