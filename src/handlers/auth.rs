//! Registration and login.

use axum::{
    Router,
    extract::State,
    routing::post,
};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::{LoginData, LoginRequest, NewUser, RegisterRequest, Role};
use crate::response::ApiResponse;

/// POST /auth/register
///
/// Validation, the duplicate-email pre-check, and role resolution all run
/// before the password is hashed; a failure at any step leaves no trace.
/// The insert itself is transactional, so a role-link failure cannot leave
/// a partial user behind. No token is issued at registration.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> Result<ApiResponse> {
    let input = input.validate()?;

    let mut conn = state.db.get()?;
    if queries::get_user_by_email(&conn, &input.email)?.is_some() {
        return Err(AppError::BadRequest("Email already exists".into()));
    }

    let roles = Role::resolve_all(&input.roles)?;

    let password_hash = bcrypt::hash(&input.password, state.bcrypt_cost)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))?;

    let user = queries::create_user(
        &mut conn,
        &NewUser {
            name: input.name,
            email: input.email,
            password_hash,
            phone_number: input.phone_number,
            address: input.address,
            roles,
        },
    )?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(ApiResponse::ok("User Registered Successfully"))
}

/// POST /auth/login
///
/// An unknown email reports "Invalid Email" without revealing whether the
/// lookup or the password failed further along; an inactive account is a
/// 404 before the password is even checked.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<ApiResponse<LoginData>> {
    let input = input.validate()?;

    let conn = state.db.get()?;
    let user = queries::get_user_by_email(&conn, &input.email)?
        .ok_or_else(|| AppError::BadRequest("Invalid Email".into()))?;

    if !user.is_active {
        return Err(AppError::NotFound(
            "Account not active, Please contact support".into(),
        ));
    }

    let matches = bcrypt::verify(&input.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("password verification failed: {}", e)))?;
    if !matches {
        return Err(AppError::BadRequest("Invalid Password".into()));
    }

    let roles = queries::get_user_roles(&conn, &user.id)?;
    let token = state.tokens.issue(&user.email, &roles)?;

    tracing::info!(user_id = %user.id, "login successful");
    Ok(ApiResponse::with_data(
        "Login Successful",
        LoginData {
            token,
            roles: roles.iter().map(|r| r.as_ref().to_string()).collect(),
        },
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}
