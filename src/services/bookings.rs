use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{self, queries};
use crate::errors::AppError;
use crate::models::{
    Address, Booking, BookingDuration, BookingStatus, PaymentMethod, Role, Worker,
};
use crate::services::transitions::{self, Action};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingInput {
    pub worker_id: String,
    pub service_category: String,
    pub duration: BookingDuration,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: String,
    pub address: Address,
    pub notes: Option<String>,
    pub payment_method: PaymentMethod,
    pub total_price: f64,
}

fn validate_input(input: &CreateBookingInput) -> Result<(), AppError> {
    for (field, value) in [
        ("street", &input.address.street),
        ("city", &input.address.city),
        ("state", &input.address.state),
        ("postal_code", &input.address.postal_code),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "address field '{field}' is required"
            )));
        }
    }
    if input.service_category.trim().is_empty() {
        return Err(AppError::Validation("service category is required".to_string()));
    }
    if !input.total_price.is_finite() || input.total_price < 0.0 {
        return Err(AppError::Validation(
            "total price must be a non-negative amount".to_string(),
        ));
    }
    if input.scheduled_date < Utc::now().date_naive() {
        return Err(AppError::Validation(
            "cannot book for past dates".to_string(),
        ));
    }
    Ok(())
}

/// Time-based code with a random suffix, e.g. BK1718031622000417. Collisions
/// are theoretically possible; creation retries on a duplicate key.
fn generate_code() -> String {
    let suffix = Uuid::new_v4().as_u128() % 1000;
    format!("BK{}{:03}", Utc::now().timestamp_millis(), suffix)
}

pub(crate) fn load_booking(db: &Connection, id: &str) -> Result<Booking, AppError> {
    queries::get_booking(db, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id} not found")))
}

pub(crate) fn load_worker_for_user(db: &Connection, user_id: &str) -> Result<Worker, AppError> {
    queries::get_worker_by_user(db, user_id)?
        .ok_or_else(|| AppError::NotFound("worker profile not found".to_string()))
}

fn assert_assigned(booking: &Booking, worker: &Worker) -> Result<(), AppError> {
    if booking.worker_id != worker.id {
        return Err(AppError::NotFound(format!(
            "booking {} not found",
            booking.id
        )));
    }
    Ok(())
}

/// Validates, persists and announces a new booking. The worker must exist,
/// be verified and be accepting work.
pub async fn create_booking(
    state: &Arc<AppState>,
    customer_id: &str,
    input: CreateBookingInput,
) -> Result<Booking, AppError> {
    validate_input(&input)?;

    let (booking, worker_user_id) = {
        let db = state.db.lock().unwrap();

        let worker = queries::get_worker(&db, &input.worker_id)?.ok_or_else(|| {
            AppError::NotFound(format!("worker {} not found", input.worker_id))
        })?;
        if !worker.can_take_bookings() {
            return Err(AppError::WorkerUnavailable(format!(
                "worker {} is not accepting bookings",
                worker.id
            )));
        }

        let now = Utc::now().naive_utc();
        let mut attempts = 0;
        loop {
            let booking = Booking {
                id: Uuid::new_v4().to_string(),
                code: generate_code(),
                customer_id: customer_id.to_string(),
                worker_id: input.worker_id.clone(),
                service_category: input.service_category.clone(),
                duration: input.duration,
                scheduled_date: input.scheduled_date,
                scheduled_time: input.scheduled_time.clone(),
                address: input.address.clone(),
                notes: input.notes.clone(),
                payment_method: input.payment_method,
                total_price: input.total_price,
                status: BookingStatus::Pending,
                cancellation_reason: None,
                created_at: now,
                updated_at: now,
            };

            match queries::create_booking(&db, &booking) {
                Ok(()) => break (booking, worker.user_id.clone()),
                Err(e) if db::is_unique_violation(&e) && attempts < 3 => {
                    attempts += 1;
                    tracing::warn!(code = %booking.code, "booking code collision, retrying");
                }
                Err(e) if db::is_unique_violation(&e) => {
                    return Err(AppError::Conflict(
                        "could not allocate a unique booking code".to_string(),
                    ))
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    tracing::info!(booking = %booking.id, code = %booking.code, "booking created");
    state
        .notifier
        .dispatch(&transitions::creation_events(&booking, &worker_user_id))
        .await;

    Ok(booking)
}

/// Worker accepts a pending booking assigned to them.
pub async fn accept_booking(
    state: &Arc<AppState>,
    worker_user_id: &str,
    booking_id: &str,
) -> Result<Booking, AppError> {
    let (booking, events) = {
        let db = state.db.lock().unwrap();
        let worker = load_worker_for_user(&db, worker_user_id)?;
        let booking = load_booking(&db, booking_id)?;
        assert_assigned(&booking, &worker)?;

        let next = transitions::next_status(booking.status, Action::Accept, Role::Worker)?;
        if !queries::cas_booking_status(&db, &booking.id, booking.status, next, None)? {
            return Err(AppError::Conflict("booking was updated concurrently".to_string()));
        }

        let booking = load_booking(&db, booking_id)?;
        let events = transitions::acceptance_events(&booking);
        (booking, events)
    };

    tracing::info!(booking = %booking.id, "booking accepted");
    state.notifier.dispatch(&events).await;
    Ok(booking)
}

/// Worker rejects a pending booking, with a reason passed to the customer.
pub async fn reject_booking(
    state: &Arc<AppState>,
    worker_user_id: &str,
    booking_id: &str,
    reason: &str,
) -> Result<Booking, AppError> {
    let (booking, events) = {
        let db = state.db.lock().unwrap();
        let worker = load_worker_for_user(&db, worker_user_id)?;
        let booking = load_booking(&db, booking_id)?;
        assert_assigned(&booking, &worker)?;

        let next = transitions::next_status(booking.status, Action::Reject, Role::Worker)?;
        if !queries::cas_booking_status(&db, &booking.id, booking.status, next, Some(reason))? {
            return Err(AppError::Conflict("booking was updated concurrently".to_string()));
        }

        let booking = load_booking(&db, booking_id)?;
        let events = transitions::rejection_events(&booking, reason);
        (booking, events)
    };

    tracing::info!(booking = %booking.id, "booking rejected");
    state.notifier.dispatch(&events).await;
    Ok(booking)
}

/// Cancellation by the booking's customer or by an admin, while the booking
/// is still pending or confirmed.
pub async fn cancel_booking(
    state: &Arc<AppState>,
    actor_id: &str,
    actor_role: Role,
    booking_id: &str,
    reason: &str,
) -> Result<Booking, AppError> {
    let (booking, events) = {
        let db = state.db.lock().unwrap();
        let booking = load_booking(&db, booking_id)?;

        if actor_role == Role::Customer && booking.customer_id != actor_id {
            return Err(AppError::NotFound(format!("booking {booking_id} not found")));
        }

        let next = transitions::next_status(booking.status, Action::Cancel, actor_role)?;
        if !queries::cas_booking_status(&db, &booking.id, booking.status, next, Some(reason))? {
            return Err(AppError::Conflict("booking was updated concurrently".to_string()));
        }

        let worker_user_id = queries::get_worker(&db, &booking.worker_id)?
            .map(|w| w.user_id)
            .unwrap_or_default();

        let booking = load_booking(&db, booking_id)?;
        let events = transitions::cancellation_events(&booking, actor_role, reason, &worker_user_id);
        (booking, events)
    };

    tracing::info!(booking = %booking.id, "booking cancelled");
    state.notifier.dispatch(&events).await;
    Ok(booking)
}

/// Admin moves a confirmed booking to a different worker. Both workers are
/// notified.
pub async fn reassign_booking(
    state: &Arc<AppState>,
    booking_id: &str,
    new_worker_id: &str,
) -> Result<Booking, AppError> {
    let (booking, events) = {
        let db = state.db.lock().unwrap();
        let booking = load_booking(&db, booking_id)?;

        let new_worker = queries::get_worker(&db, new_worker_id)?
            .ok_or_else(|| AppError::NotFound(format!("worker {new_worker_id} not found")))?;
        if !new_worker.can_take_bookings() {
            return Err(AppError::WorkerUnavailable(format!(
                "worker {} is not accepting bookings",
                new_worker.id
            )));
        }

        let old_worker_user_id = queries::get_worker(&db, &booking.worker_id)?
            .map(|w| w.user_id)
            .unwrap_or_default();

        transitions::next_status(booking.status, Action::Reassign, Role::Admin)?;
        if !queries::cas_booking_worker(&db, &booking.id, new_worker_id)? {
            return Err(AppError::Conflict("booking was updated concurrently".to_string()));
        }

        let booking = load_booking(&db, booking_id)?;
        let events =
            transitions::reassignment_events(&booking, &old_worker_user_id, &new_worker.user_id);
        (booking, events)
    };

    tracing::info!(booking = %booking.id, worker = %new_worker_id, "booking reassigned");
    state.notifier.dispatch(&events).await;
    Ok(booking)
}
