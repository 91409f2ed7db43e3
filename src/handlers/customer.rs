use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::require_role;
use crate::models::{Attendance, AttendanceStatus, Booking, Role};
use crate::services::reviews::{self, AddReviewInput};
use crate::state::AppState;

// GET /api/customer/bookings
pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Booking>>, AppError> {
    let actor = require_role(&headers, Role::Customer)?;

    let db = state.db.lock().unwrap();
    let bookings = queries::bookings_for_customer(&db, &actor.id)?;
    Ok(Json(bookings))
}

// GET /api/customer/attendance
#[derive(Serialize)]
pub struct AttendanceHistory {
    pub attendance: Vec<Attendance>,
    pub total_visits: i64,
    pub total_minutes: i64,
}

pub async fn get_attendance(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<AttendanceHistory>, AppError> {
    let actor = require_role(&headers, Role::Customer)?;

    let db = state.db.lock().unwrap();
    let attendance = queries::attendance_for_customer(&db, &actor.id)?;

    let completed: Vec<&Attendance> = attendance
        .iter()
        .filter(|a| a.status == AttendanceStatus::CheckedOut)
        .collect();
    let total_visits = completed.len() as i64;
    let total_minutes = completed.iter().map(|a| a.duration_minutes).sum();

    Ok(Json(AttendanceHistory {
        attendance,
        total_visits,
        total_minutes,
    }))
}

// POST /api/reviews
pub async fn add_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<AddReviewInput>,
) -> Result<Json<crate::models::Review>, AppError> {
    let actor = require_role(&headers, Role::Customer)?;

    let db = state.db.lock().unwrap();
    let review = reviews::add_review(&db, &actor.id, input)?;
    Ok(Json(review))
}
