pub mod admin;
pub mod bookings;
pub mod customer;
pub mod health;
pub mod notifications;
pub mod worker;

use axum::http::HeaderMap;

use crate::errors::AppError;
use crate::models::Role;

/// Authenticated caller as supplied by the upstream identity layer. The core
/// trusts these headers; it only enforces role-appropriate transitions.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, AppError> {
    let id = headers
        .get("x-actor-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let role = headers
        .get("x-actor-role")
        .and_then(|v| v.to_str().ok())
        .and_then(Role::parse);

    match (id.is_empty(), role) {
        (false, Some(role)) => Ok(Actor { id, role }),
        _ => Err(AppError::Unauthorized),
    }
}

/// Actor that must carry the given role.
pub fn require_role(headers: &HeaderMap, role: Role) -> Result<Actor, AppError> {
    let actor = actor_from_headers(headers)?;
    if actor.role != role {
        return Err(AppError::Unauthorized);
    }
    Ok(actor)
}

pub fn check_admin(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}
