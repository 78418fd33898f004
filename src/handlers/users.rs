//! Account endpoints behind the authorization gate.

use axum::{
    Router,
    extract::{Extension, State},
    middleware,
    routing::{get, put},
};

use crate::db::{AppState, queries};
use crate::error::Result;
use crate::extractors::Json;
use crate::middleware::{CurrentUser, require_admin, require_auth};
use crate::models::{UpdateAccountRequest, UserProfile};
use crate::response::ApiResponse;

/// GET /users/account
pub async fn get_account(
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiResponse<UserProfile>> {
    let profile = UserProfile::from_user(current.user, &current.roles);
    Ok(ApiResponse::with_data("success", profile))
}

/// PUT /users/account/update
///
/// Only name, phone number, and address are mutable. Present fields are
/// re-validated with the registration rules before anything is written.
pub async fn update_account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(changes): Json<UpdateAccountRequest>,
) -> Result<ApiResponse> {
    changes.validate()?;

    if !changes.is_empty() {
        let conn = state.db.get()?;
        queries::update_user_profile(&conn, &current.user.id, &changes)?;
        tracing::info!(user_id = %current.user.id, "account updated");
    }

    Ok(ApiResponse::ok("Account updated successfully"))
}

/// PUT|DELETE /users/account/deactivate
///
/// "Ensure inactive": repeating the call cannot fail differently. The
/// notification is fire-and-forget; delivery failure never rolls back the
/// flag.
pub async fn deactivate_account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiResponse> {
    let conn = state.db.get()?;
    queries::set_user_inactive(&conn, &current.user.id)?;
    tracing::info!(user_id = %current.user.id, "account deactivated");

    let email_service = state.email.clone();
    let (to, name) = (current.user.email.clone(), current.user.name.clone());
    tokio::spawn(async move {
        if let Err(e) = email_service.send_account_deactivated(&to, &name).await {
            tracing::warn!(error = %e, "Failed to send deactivation notification");
        }
    });

    Ok(ApiResponse::ok("Account deactivated successfully"))
}

/// GET /users/all (admin only)
pub async fn list_all_users(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<UserProfile>>> {
    let conn = state.db.get()?;

    let users = queries::list_users(&conn)?;
    let mut profiles = Vec::with_capacity(users.len());
    for user in users {
        let roles = queries::get_user_roles(&conn, &user.id)?;
        profiles.push(UserProfile::from_user(user, &roles));
    }

    Ok(ApiResponse::with_data(
        "All users retrieved successfully",
        profiles,
    ))
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/account", get(get_account))
        .route("/users/account/update", put(update_account))
        .route(
            "/users/account/deactivate",
            put(deactivate_account).delete(deactivate_account),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .merge(
            Router::new()
                .route("/users/all", get(list_all_users))
                .layer(middleware::from_fn_with_state(state, require_admin)),
        )
}
