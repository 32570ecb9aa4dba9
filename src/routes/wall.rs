use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::db;
use crate::error::AppError;
use crate::gateway::events::{Audience, ChangeEvent};
use crate::middleware::auth::AuthUser;
use crate::models::wall::CreateWallMessage;
use crate::state::AppState;

pub const DEFAULT_WALL_LIMIT: i64 = 100;
const MAX_WALL_LIMIT: i64 = 500;
const MAX_BODY_LEN: usize = 500;

#[derive(Deserialize)]
pub struct ListWallQuery {
    pub limit: Option<i64>,
}

pub async fn list_messages(
    state: State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ListWallQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_WALL_LIMIT)
        .clamp(1, MAX_WALL_LIMIT);
    let messages = db::wall::list_messages(&state.db, limit).await?;
    Ok(Json(serde_json::json!({ "data": messages })))
}

pub async fn create_message(
    state: State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateWallMessage>,
) -> Result<Json<serde_json::Value>, AppError> {
    let body = input.body.trim();
    if body.is_empty() || body.chars().count() > MAX_BODY_LEN {
        return Err(AppError::BadRequest(format!(
            "message must be between 1 and {MAX_BODY_LEN} characters"
        )));
    }

    let message = db::wall::create_message(&state.db, &auth.member_id, body).await?;
    state
        .dispatcher
        .publish(Audience::Everyone, ChangeEvent::WallCreate(message.clone()));

    Ok(Json(serde_json::json!({ "data": message })))
}

pub async fn like_message(
    state: State<AppState>,
    Path(message_id): Path<String>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let message = db::wall::like_message(&state.db, &message_id, &auth.member_id).await?;
    state.dispatcher.publish(
        Audience::Everyone,
        ChangeEvent::WallLike {
            id: message.id.clone(),
            likes: message.likes,
        },
    );

    Ok(Json(serde_json::json!({ "data": message })))
}
