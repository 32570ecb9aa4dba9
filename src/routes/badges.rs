use axum::extract::State;
use axum::Json;

use crate::badges;
use crate::db;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::badge::BadgeWinner;
use crate::state::AppState;

pub async fn list_badges(
    state: State<AppState>,
    _auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let winners = badges::load_winners(&state.db).await?;
    Ok(Json(serde_json::json!({ "data": winners })))
}

pub async fn own_badges(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let connections: Vec<BadgeWinner> = badges::load_winners(&state.db)
        .await?
        .into_iter()
        .filter(|w| w.member_id == auth.member_id)
        .collect();
    let activity = db::activity::member_activity(&state.db, &auth.member_id).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "connections": connections,
            "achievements": badges::achievements_for(&activity)
        }
    })))
}
