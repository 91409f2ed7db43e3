pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route("/api/bookings/:id", get(handlers::bookings::get_booking))
        .route(
            "/api/bookings/:id/cancel",
            put(handlers::bookings::cancel_booking),
        )
        .route(
            "/api/customer/bookings",
            get(handlers::customer::get_bookings),
        )
        .route(
            "/api/customer/attendance",
            get(handlers::customer::get_attendance),
        )
        .route("/api/reviews", post(handlers::customer::add_review))
        .route("/api/workers", post(handlers::worker::register_worker))
        .route("/api/worker/profile", put(handlers::worker::update_profile))
        .route("/api/worker/bookings", get(handlers::worker::get_bookings))
        .route(
            "/api/worker/bookings/:id/accept",
            put(handlers::worker::accept_booking),
        )
        .route(
            "/api/worker/bookings/:id/reject",
            put(handlers::worker::reject_booking),
        )
        .route("/api/worker/checkin", post(handlers::worker::check_in))
        .route("/api/worker/checkout", post(handlers::worker::check_out))
        .route("/api/worker/earnings", get(handlers::worker::get_earnings))
        .route(
            "/api/notifications",
            get(handlers::notifications::get_notifications),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::notifications::mark_read),
        )
        .route("/api/admin/dashboard", get(handlers::admin::get_dashboard))
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/admin/bookings/:id/reassign",
            put(handlers::admin::reassign_booking),
        )
        .route("/api/admin/workers", get(handlers::admin::get_workers))
        .route(
            "/api/admin/workers/:id/verify",
            put(handlers::admin::verify_worker),
        )
        .route(
            "/api/admin/workers/:id/reject",
            put(handlers::admin::reject_worker),
        )
        .route("/api/admin/revenue", get(handlers::admin::get_revenue))
        .route("/api/admin/settings", get(handlers::admin::get_settings))
        .route(
            "/api/admin/settings/commission",
            put(handlers::admin::update_commission),
        )
        .route(
            "/api/admin/reviews/:id",
            delete(handlers::admin::delete_review),
        )
        .with_state(state)
}
