use axum::extract::{Path, State};
use axum::Json;

use crate::db;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::member::Member;
use crate::state::AppState;

pub async fn list_members(
    state: State<AppState>,
    _auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let members: Vec<Member> = db::members::list_members(&state.db)
        .await?
        .iter()
        .map(|row| row.to_public())
        .collect();
    Ok(Json(serde_json::json!({ "data": members })))
}

pub async fn get_current_member(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let row = db::members::get_member(&state.db, &auth.member_id).await?;
    Ok(Json(serde_json::json!({ "data": row.to_self() })))
}

pub async fn get_member(
    state: State<AppState>,
    Path(member_id): Path<String>,
    _auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let row = db::members::get_member(&state.db, &member_id).await?;
    Ok(Json(serde_json::json!({ "data": row.to_public() })))
}
