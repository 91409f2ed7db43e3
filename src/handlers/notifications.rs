use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::actor_from_headers;
use crate::models::Notification;
use crate::state::AppState;

// GET /api/notifications
#[derive(Deserialize)]
pub struct NotificationsQuery {
    pub limit: Option<i64>,
}

pub async fn get_notifications(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<NotificationsQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let actor = actor_from_headers(&headers)?;

    let db = state.db.lock().unwrap();
    let notifications =
        queries::notifications_for_recipient(&db, &actor.id, query.limit.unwrap_or(50))?;
    Ok(Json(notifications))
}

// POST /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let actor = actor_from_headers(&headers)?;

    let db = state.db.lock().unwrap();
    if !queries::mark_notification_read(&db, id, &actor.id)? {
        return Err(AppError::NotFound(format!("notification {id} not found")));
    }
    Ok(Json(serde_json::json!({"ok": true})))
}
