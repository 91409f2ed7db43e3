use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::{actor_from_headers, check_admin, require_role};
use crate::models::{Booking, Role};
use crate::services::bookings::{self, CreateBookingInput};
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<CreateBookingInput>,
) -> Result<Json<Booking>, AppError> {
    let actor = require_role(&headers, Role::Customer)?;
    let booking = bookings::create_booking(&state, &actor.id, input).await?;
    Ok(Json(booking))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let actor = actor_from_headers(&headers).or_else(|_| {
        check_admin(&headers, &state.config.admin_token).map(|_| super::Actor {
            id: "admin".to_string(),
            role: Role::Admin,
        })
    })?;

    let db = state.db.lock().unwrap();
    let booking = queries::get_booking(&db, &id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id} not found")))?;

    // Customers and workers only see their own bookings.
    let visible = match actor.role {
        Role::Admin => true,
        Role::Customer => booking.customer_id == actor.id,
        Role::Worker => queries::get_worker_by_user(&db, &actor.id)?
            .map(|w| w.id == booking.worker_id)
            .unwrap_or(false),
    };
    if !visible {
        return Err(AppError::NotFound(format!("booking {id} not found")));
    }

    Ok(Json(booking))
}

// PUT /api/bookings/:id/cancel
#[derive(Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<CancelRequest>,
) -> Result<Json<Booking>, AppError> {
    // Admin bearer token wins; otherwise the caller must be the customer.
    let actor = match check_admin(&headers, &state.config.admin_token) {
        Ok(()) => super::Actor {
            id: "admin".to_string(),
            role: Role::Admin,
        },
        Err(_) => require_role(&headers, Role::Customer)?,
    };

    let reason = body.reason.unwrap_or_else(|| "cancelled".to_string());
    let booking = bookings::cancel_booking(&state, &actor.id, actor.role, &id, &reason).await?;
    Ok(Json(booking))
}
