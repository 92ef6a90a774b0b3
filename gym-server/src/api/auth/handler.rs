//! Authentication Handlers
//!
//! Handles login, current-user lookup and operator registration

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::User;
use crate::db::repository::user;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
use shared::models::UserRole;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login - 登录
///
/// Authenticates operator credentials and returns a JWT token. Failures use
/// one unified message so usernames cannot be enumerated.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let account = user::find_by_username(&state.pool, &req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match account {
        Some(a) => a,
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = account
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        tracing::warn!(username = %req.username, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .get_jwt_service()
        .generate_token(&account)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = %account.role.as_str(),
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: account.info(),
    }))
}

/// GET /api/auth/me - 当前用户信息
///
/// Reads fresh account data so a deleted operator's token stops working
/// for identity lookups.
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserInfo>> {
    let account = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(account.info()))
}

/// POST /api/auth/register - 新建操作员账号 (仅管理员)
pub async fn register(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<UserInfo>> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&req.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;
    let role: UserRole = req.role.parse()?;

    let password_hash = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let account = user::create(&state.pool, &req.name, &req.username, &password_hash, role).await?;

    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = %account.role.as_str(),
        created_by = %current_user.username,
        "Operator account created"
    );

    Ok(Json(account.info()))
}
