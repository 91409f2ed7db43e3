use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::{self, queries};
use crate::errors::AppError;
use crate::models::{Attendance, AttendanceStatus, BookingStatus, Payment, Role};
use crate::services::bookings::{load_booking, load_worker_for_user};
use crate::services::settlement;
use crate::services::transitions::{self, Action};
use crate::state::AppState;

/// Worker check-in. The first check-in drives the booking to in-progress and
/// creates the attendance record; a re-check-in overwrites the check-in time
/// on the existing record while the visit is still open.
pub async fn check_in(
    state: &Arc<AppState>,
    worker_user_id: &str,
    booking_id: &str,
) -> Result<Attendance, AppError> {
    let (attendance, events) = {
        let db = state.db.lock().unwrap();
        let worker = load_worker_for_user(&db, worker_user_id)?;
        let booking = load_booking(&db, booking_id)?;
        if booking.worker_id != worker.id {
            return Err(AppError::NotFound(format!("booking {booking_id} not found")));
        }

        match booking.status {
            BookingStatus::Confirmed => {
                let next = transitions::next_status(booking.status, Action::CheckIn, Role::Worker)?;
                if !queries::cas_booking_status(&db, &booking.id, booking.status, next, None)? {
                    return Err(AppError::Conflict(
                        "booking was updated concurrently".to_string(),
                    ));
                }
            }
            // Already on site once; allow the overwrite without a transition.
            BookingStatus::InProgress => {}
            other => return Err(AppError::invalid_transition(other, "check-in")),
        }

        let now = Utc::now().naive_utc();
        let attendance = Attendance {
            id: Uuid::new_v4().to_string(),
            booking_id: booking.id.clone(),
            worker_id: worker.id.clone(),
            customer_id: booking.customer_id.clone(),
            check_in_time: Some(now),
            check_out_time: None,
            duration_minutes: 0,
            status: AttendanceStatus::CheckedIn,
            created_at: now,
            updated_at: now,
        };
        queries::upsert_check_in(&db, &attendance)?;

        // Re-read: on a re-check-in the stored row keeps its original id.
        let attendance = queries::get_attendance_by_booking(&db, &booking.id)?
            .ok_or_else(|| AppError::NotFound("attendance record not found".to_string()))?;

        (attendance, transitions::check_in_events(&booking))
    };

    tracing::info!(booking = %booking_id, "worker checked in");
    state.notifier.dispatch(&events).await;
    Ok(attendance)
}

/// Worker check-out: finalizes the attendance record and settles the booking
/// in a single transaction. The booking can never be marked completed without
/// its payment row, and the UNIQUE key on payments.booking_id makes a second
/// settlement a conflict.
pub async fn check_out(
    state: &Arc<AppState>,
    worker_user_id: &str,
    booking_id: &str,
) -> Result<(Attendance, Payment), AppError> {
    let (attendance, payment, events) = {
        let mut db = state.db.lock().unwrap();
        let worker = load_worker_for_user(&db, worker_user_id)?;
        let booking = load_booking(&db, booking_id)?;
        if booking.worker_id != worker.id {
            return Err(AppError::NotFound(format!("booking {booking_id} not found")));
        }

        transitions::next_status(booking.status, Action::CheckOut, Role::Worker)?;

        let attendance = queries::get_attendance_by_booking(&db, &booking.id)?
            .ok_or_else(|| AppError::NotFound("check-in record not found".to_string()))?;
        if attendance.status != AttendanceStatus::CheckedIn {
            return Err(AppError::invalid_transition(booking.status, "check-out"));
        }
        let check_in_time = attendance
            .check_in_time
            .ok_or_else(|| AppError::Settlement("attendance has no check-in time".to_string()))?;

        let now = Utc::now().naive_utc();
        if now < check_in_time {
            return Err(AppError::Validation(
                "check-out time precedes check-in time".to_string(),
            ));
        }
        let duration_minutes = (now - check_in_time).num_minutes();

        let commission_rate = queries::get_settings(&db)?.commission_rate;
        let payment = settlement::settle(&booking, commission_rate, now)?;

        let tx = db.transaction()?;
        if !queries::finalize_check_out(&tx, &booking.id, &now, duration_minutes)? {
            return Err(AppError::Conflict(
                "attendance was updated concurrently".to_string(),
            ));
        }
        match queries::insert_payment(&tx, &payment) {
            Ok(()) => {}
            Err(e) if db::is_unique_violation(&e) => {
                return Err(AppError::Conflict(format!(
                    "booking {} is already settled",
                    booking.id
                )))
            }
            Err(e) => return Err(AppError::Settlement(e.to_string())),
        }
        if !queries::cas_booking_status(
            &tx,
            &booking.id,
            BookingStatus::InProgress,
            BookingStatus::Completed,
            None,
        )? {
            return Err(AppError::Conflict(
                "booking was updated concurrently".to_string(),
            ));
        }
        queries::increment_completed_jobs(&tx, &worker.id)?;
        tx.commit()?;

        let attendance = queries::get_attendance_by_booking(&db, &booking.id)?
            .ok_or_else(|| AppError::NotFound("attendance record not found".to_string()))?;
        let booking = load_booking(&db, &booking.id)?;
        let events = transitions::settlement_events(&booking, &payment, worker_user_id);

        (attendance, payment, events)
    };

    tracing::info!(
        booking = %booking_id,
        earnings = payment.worker_earnings,
        commission = payment.commission_amount,
        "worker checked out, booking settled"
    );
    state.notifier.dispatch(&events).await;
    Ok((attendance, payment))
}
