use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, NotificationEvent, NotificationKind, Payment, Role};

/// Actions that drive the booking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Accept,
    Reject,
    Cancel,
    Reassign,
    CheckIn,
    CheckOut,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Accept => "accept",
            Action::Reject => "reject",
            Action::Cancel => "cancel",
            Action::Reassign => "reassign",
            Action::CheckIn => "check-in",
            Action::CheckOut => "check-out",
        }
    }
}

/// The booking state machine. Every status mutation in the crate goes through
/// this function; anything not listed is an invalid transition, including
/// legal actions attempted by the wrong role and any action on a terminal
/// status.
///
/// pending -> confirmed | rejected | cancelled
/// confirmed -> in-progress | cancelled | confirmed (reassign)
/// in-progress -> completed
pub fn next_status(
    current: BookingStatus,
    action: Action,
    actor: Role,
) -> Result<BookingStatus, AppError> {
    use BookingStatus::*;

    let next = match (action, actor, current) {
        (Action::Accept, Role::Worker, Pending) => Confirmed,
        (Action::Reject, Role::Worker, Pending) => Rejected,
        (Action::Cancel, Role::Customer | Role::Admin, Pending | Confirmed) => Cancelled,
        (Action::Reassign, Role::Admin, Confirmed) => Confirmed,
        (Action::CheckIn, Role::Worker, Confirmed) => InProgress,
        (Action::CheckOut, Role::Worker, InProgress) => Completed,
        _ => return Err(AppError::invalid_transition(current, action.as_str())),
    };
    Ok(next)
}

// ── Notification events ──
//
// Each transition produces its events here; dispatch is the notifier's
// problem. Message wording keys off the human-readable booking code.

pub fn creation_events(booking: &Booking, worker_user_id: &str) -> Vec<NotificationEvent> {
    vec![
        NotificationEvent {
            recipient_id: booking.customer_id.clone(),
            recipient_role: Role::Customer,
            kind: NotificationKind::Booking,
            title: "Booking Received".to_string(),
            message: format!(
                "Your booking for {} has been placed. Booking ID: {}",
                booking.service_category, booking.code
            ),
            related_id: Some(booking.id.clone()),
        },
        NotificationEvent {
            recipient_id: worker_user_id.to_string(),
            recipient_role: Role::Worker,
            kind: NotificationKind::Booking,
            title: "New Booking Request".to_string(),
            message: format!(
                "You have a new booking request for {}. Booking ID: {}",
                booking.service_category, booking.code
            ),
            related_id: Some(booking.id.clone()),
        },
    ]
}

pub fn acceptance_events(booking: &Booking) -> Vec<NotificationEvent> {
    vec![NotificationEvent {
        recipient_id: booking.customer_id.clone(),
        recipient_role: Role::Customer,
        kind: NotificationKind::Booking,
        title: "Booking Confirmed".to_string(),
        message: format!(
            "Your booking {} has been confirmed by the worker.",
            booking.code
        ),
        related_id: Some(booking.id.clone()),
    }]
}

pub fn rejection_events(booking: &Booking, reason: &str) -> Vec<NotificationEvent> {
    vec![NotificationEvent {
        recipient_id: booking.customer_id.clone(),
        recipient_role: Role::Customer,
        kind: NotificationKind::Booking,
        title: "Booking Rejected".to_string(),
        message: format!(
            "Your booking {} has been rejected. Reason: {reason}",
            booking.code
        ),
        related_id: Some(booking.id.clone()),
    }]
}

/// Cancellation notifies every party except the one who cancelled.
pub fn cancellation_events(
    booking: &Booking,
    cancelled_by: Role,
    reason: &str,
    worker_user_id: &str,
) -> Vec<NotificationEvent> {
    let mut events = vec![];

    if cancelled_by != Role::Customer {
        events.push(NotificationEvent {
            recipient_id: booking.customer_id.clone(),
            recipient_role: Role::Customer,
            kind: NotificationKind::Booking,
            title: "Booking Cancelled".to_string(),
            message: format!(
                "Your booking {} has been cancelled. Reason: {reason}",
                booking.code
            ),
            related_id: Some(booking.id.clone()),
        });
    }

    events.push(NotificationEvent {
        recipient_id: worker_user_id.to_string(),
        recipient_role: Role::Worker,
        kind: NotificationKind::Booking,
        title: "Booking Cancelled".to_string(),
        message: format!(
            "Booking {} has been cancelled. Reason: {reason}",
            booking.code
        ),
        related_id: Some(booking.id.clone()),
    });

    events
}

/// Both the outgoing and the incoming worker hear about a reassignment.
pub fn reassignment_events(
    booking: &Booking,
    old_worker_user_id: &str,
    new_worker_user_id: &str,
) -> Vec<NotificationEvent> {
    vec![
        NotificationEvent {
            recipient_id: old_worker_user_id.to_string(),
            recipient_role: Role::Worker,
            kind: NotificationKind::Booking,
            title: "Booking Reassigned".to_string(),
            message: format!(
                "Booking {} has been reassigned to another worker.",
                booking.code
            ),
            related_id: Some(booking.id.clone()),
        },
        NotificationEvent {
            recipient_id: new_worker_user_id.to_string(),
            recipient_role: Role::Worker,
            kind: NotificationKind::Booking,
            title: "New Booking Assigned".to_string(),
            message: format!(
                "Booking {} for {} has been assigned to you.",
                booking.code, booking.service_category
            ),
            related_id: Some(booking.id.clone()),
        },
    ]
}

pub fn check_in_events(booking: &Booking) -> Vec<NotificationEvent> {
    vec![NotificationEvent {
        recipient_id: booking.customer_id.clone(),
        recipient_role: Role::Customer,
        kind: NotificationKind::Booking,
        title: "Service Started".to_string(),
        message: format!("Your worker has checked in for booking {}.", booking.code),
        related_id: Some(booking.id.clone()),
    }]
}

pub fn settlement_events(
    booking: &Booking,
    payment: &Payment,
    worker_user_id: &str,
) -> Vec<NotificationEvent> {
    vec![
        NotificationEvent {
            recipient_id: booking.customer_id.clone(),
            recipient_role: Role::Customer,
            kind: NotificationKind::Booking,
            title: "Service Completed".to_string(),
            message: format!("Your booking {} has been completed.", booking.code),
            related_id: Some(booking.id.clone()),
        },
        NotificationEvent {
            recipient_id: worker_user_id.to_string(),
            recipient_role: Role::Worker,
            kind: NotificationKind::Payment,
            title: "Payment Credited".to_string(),
            message: format!(
                "You earned {:.2} for booking {} (after {:.1}% commission).",
                payment.worker_earnings, booking.code, payment.commission_rate
            ),
            related_id: Some(payment.id.clone()),
        },
    ]
}
