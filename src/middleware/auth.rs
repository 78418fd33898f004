//! Per-request authorization gate.
//!
//! Token verification alone is not enough to admit a request: the subject is
//! re-checked against live account state on every call, so deactivating or
//! deleting an account retroactively invalidates every outstanding token for
//! it without any server-side revocation list.

use std::str::FromStr;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::db::{AppState, queries};
use crate::error::AppError;
use crate::models::{Role, User};
use crate::util::extract_bearer_token;

/// Identity resolved by the gate, forwarded to downstream handlers.
#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
    /// Roles as carried by the token claims
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Run the full gate: bearer token present, signature and expiry valid,
/// subject still exists, subject still active.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, AppError> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("Missing authentication token".into()))?;

    let session = state
        .tokens
        .verify(token)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let conn = state.db.get()?;
    let user = queries::get_user_by_email(&conn, &session.subject)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !user.is_active {
        return Err(AppError::NotFound("Account not active".into()));
    }

    let roles = session
        .roles
        .iter()
        .filter_map(|name| Role::from_str(name).ok())
        .collect();

    Ok(CurrentUser { user, roles })
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let current = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let current = authenticate(&state, request.headers())?;
    if !current.has_role(Role::Admin) {
        return Err(AppError::Forbidden("Admin role required".into()));
    }
    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}
