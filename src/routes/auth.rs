use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::db;
use crate::error::AppError;
use crate::middleware::auth::{bearer_token, hash_password, verify_password, AuthUser};
use crate::middleware::rate_limit::{check_login_attempt, clear_login_attempts};
use crate::models::member::normalize_access_code;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 4;
const MAX_PASSWORD_LEN: usize = 128;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub access_code: String,
    pub password: String,
}

/// Access code plus password. The first successful login for a member sets
/// the password; every later one must match it.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let access_code = normalize_access_code(&input.access_code);
    if access_code.is_empty() {
        return Err(AppError::BadRequest("access code is required".to_string()));
    }

    let password_len = input.password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&password_len) {
        return Err(AppError::BadRequest(format!(
            "password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }

    check_login_attempt(&state.login_attempts, &access_code)?;

    let member = db::members::find_by_access_code(&state.db, &access_code)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid access code".to_string()))?;

    let mut first_login = false;
    if member.password_hash.is_none() {
        let hash = hash_password(&input.password)?;
        first_login = db::members::set_initial_password(&state.db, &member.id, &hash).await?;
    }

    if !first_login {
        // Either a password was already set or a concurrent login won the bootstrap.
        let stored = db::members::get_password_hash(&state.db, &member.id)
            .await?
            .ok_or_else(|| AppError::Internal("password hash missing".to_string()))?;
        if !verify_password(&input.password, &stored)? {
            tracing::info!(member_id = %member.id, "login rejected: incorrect password");
            return Err(AppError::Unauthorized("incorrect password".to_string()));
        }
    }

    clear_login_attempts(&state.login_attempts, &access_code);
    let token = db::auth::issue_token(&state.db, &member.id, state.token_ttl_days).await?;
    let member = db::members::get_member(&state.db, &member.id).await?;
    tracing::info!(member_id = %member.id, first_login, "member logged in");

    Ok(Json(serde_json::json!({
        "data": {
            "member": member.to_self(),
            "token": token,
            "first_login": first_login
        }
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    _auth: AuthUser,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(token) = bearer_token(&headers) {
        db::auth::revoke_token(&state.db, token).await?;
    }

    Ok(Json(serde_json::json!({
        "data": { "ok": true }
    })))
}
