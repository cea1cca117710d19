// routes/auth.rs
// Registration (admin only), login, caller introspection, and the one-time
// admin bootstrap.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{AuthUser, authorize, hash_password, issue_token, verify_password},
    error::ApiError,
    models::{PublicUser, UserRole},
    state::{AppState, admin_exists, create_user, find_user_by_username, find_user_by_username_or_email},
};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: PublicUser,
}

pub async fn register(
    caller: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    authorize(caller.role(), &[UserRole::Admin])?;

    if find_user_by_username_or_email(&state, &body.username, &body.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username or email already registered"));
    }

    let hashed = hash_password(&body.password)?;
    let user = create_user(
        &state,
        &body.username,
        &body.email,
        &body.full_name,
        body.role,
        &hashed,
    )
    .await?;
    Ok(Json(PublicUser::from(&user)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Unknown username and wrong password are deliberately indistinguishable.
    let user = find_user_by_username(&state, &body.username)
        .await?
        .filter(|user| verify_password(&body.password, &user.hashed_password))
        .ok_or(ApiError::Unauthenticated("Incorrect username or password"))?;

    let access_token = issue_token(&user.username, &state.auth)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: PublicUser::from(&user),
    }))
}

pub async fn me(caller: AuthUser) -> Json<PublicUser> {
    Json(PublicUser::from(caller.user()))
}

/// Idempotent bootstrap: creates the fixed default admin only when no
/// admin-role user exists. Unauthenticated on purpose, matching the legacy
/// deployment flow.
pub async fn init_admin(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if admin_exists(&state).await? {
        return Ok(Json(serde_json::json!({ "message": "Admin already exists" })));
    }

    let hashed = hash_password(DEFAULT_ADMIN_PASSWORD)?;
    create_user(
        &state,
        DEFAULT_ADMIN_USERNAME,
        "admin@shreekrishnanursery.com",
        "System Administrator",
        UserRole::Admin,
        &hashed,
    )
    .await?;
    tracing::info!("default admin account created");

    Ok(Json(serde_json::json!({
        "message": "Admin user created successfully",
        "username": DEFAULT_ADMIN_USERNAME,
        "password": DEFAULT_ADMIN_PASSWORD,
    })))
}
