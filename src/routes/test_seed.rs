use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::db;
use crate::error::AppError;
use crate::models::roster::RosterEntry;
use crate::state::AppState;

/// Replaces the game with the posted roster. Only mounted in test mode.
pub async fn seed(
    State(state): State<AppState>,
    Json(entries): Json<Vec<RosterEntry>>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.test_mode {
        return Err(AppError::NotFound("not found".to_string()));
    }

    let imported = db::roster::import_roster(&state.db, entries, true).await?;
    state.login_attempts.clear();

    Ok(Json(json!({ "data": { "imported": imported } })))
}
